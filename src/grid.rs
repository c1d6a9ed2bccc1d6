use core::fmt;
use std::error::Error;

use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::Cell;
use crate::point::{Dir, Point};
use crate::N_SMALLVEC_SIZE;

/// Failure to build a [Grid] from map text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The map text contained no cells.
    EmptyMap,
    /// A row's length differed from the first row's.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::EmptyMap => write!(f, "map text contains no cells"),
            GridError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "map row {} has {} cells, expected {}",
                row, found, expected
            ),
        }
    }
}

impl Error for GridError {}

/// Owns every [Cell] of a rectangular map and answers the neighbour, cost
/// and reachability queries the solvers are built on.
///
/// Movement is 8-directional: an orthogonal step costs
/// [CARDINAL_COST](crate::CARDINAL_COST), a diagonal step
/// [DIAGONAL_COST](crate::DIAGONAL_COST), and a diagonal step is rejected
/// unless both orthogonal cells flanking it are traversable, so no path
/// ever cuts a corner between two obstacles.
///
/// Connected components over a [UnionFind] let callers check
/// [reachable](Grid::reachable) before starting a search; the solvers
/// themselves never consult them.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    visited_cells: usize,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl Grid {
    /// An all-traversable grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Grid {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(Point::new(x as i32, y as i32), false));
            }
        }
        let mut grid = Grid {
            width,
            height,
            cells,
            visited_cells: 0,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    /// Builds a grid from a rectangular block of map text: one character
    /// per cell at `(column, row)`, with `.`, `G` and `S` traversable and
    /// every other character an obstacle. Line terminators are trimmed.
    ///
    /// ```
    /// use gridroute::Grid;
    ///
    /// let grid = Grid::from_map_str(".#.\n...").unwrap();
    /// assert_eq!((grid.width(), grid.height()), (3, 2));
    /// assert!(!grid.can_enter(1, 0));
    /// ```
    pub fn from_map_str(text: &str) -> Result<Grid, GridError> {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::new();
        for (row, line) in text.lines().enumerate() {
            let row_len = line.chars().count();
            let expected = *width.get_or_insert(row_len);
            if row_len != expected {
                return Err(GridError::RaggedRow {
                    row,
                    expected,
                    found: row_len,
                });
            }
            for (column, ch) in line.chars().enumerate() {
                let is_obstacle = !matches!(ch, '.' | 'G' | 'S');
                cells.push(Cell::new(Point::new(column as i32, row as i32), is_obstacle));
            }
            height = row + 1;
        }
        let width = width.unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(GridError::EmptyMap);
        }
        let mut grid = Grid {
            width,
            height,
            cells,
            visited_cells: 0,
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// True iff `(x, y)` is in bounds and not an obstacle.
    pub fn can_enter(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.cells[self.compute_ix(x, y)].is_obstacle
    }

    /// Whether a single step from `from` in `dir` is legal: the target must
    /// be enterable and a diagonal step additionally needs both flanking
    /// orthogonal cells open.
    pub fn can_step(&self, from: Point, dir: Dir) -> bool {
        let target = from + dir;
        if !self.can_enter(target.x, target.y) {
            return false;
        }
        !dir.diagonal()
            || (self.can_enter(from.x + dir.dx, from.y) && self.can_enter(from.x, from.y + dir.dy))
    }

    /// The legal moves out of `pos` with their edge costs, cardinals
    /// first. The corner-cutting rule of [can_step](Grid::can_step)
    /// applies, identically for every solver.
    pub fn neighbors_with_cost(&self, pos: Point) -> SmallVec<[(Point, f64); N_SMALLVEC_SIZE]> {
        Dir::ALL
            .iter()
            .filter(|dir| self.can_step(pos, **dir))
            .map(|dir| (pos + *dir, dir.step_cost()))
            .collect()
    }

    fn compute_ix(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    fn ix(&self, pos: Point) -> usize {
        debug_assert!(self.in_bounds(pos.x, pos.y));
        self.compute_ix(pos.x, pos.y)
    }

    /// The cell at `pos`. Panics if out of bounds.
    pub fn cell(&self, pos: Point) -> &Cell {
        &self.cells[self.ix(pos)]
    }

    pub(crate) fn cell_mut(&mut self, pos: Point) -> &mut Cell {
        let ix = self.ix(pos);
        &mut self.cells[ix]
    }

    /// The cell at `(x, y)`, or [None] when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.compute_ix(x, y)])
        } else {
            None
        }
    }

    /// Flags `pos` as visited and reports whether it was newly marked;
    /// the per-run visited counter only moves on the first marking.
    pub(crate) fn mark_visited(&mut self, pos: Point) -> bool {
        let ix = self.ix(pos);
        if self.cells[ix].visited {
            return false;
        }
        self.cells[ix].visited = true;
        self.visited_cells += 1;
        true
    }

    /// Cells marked visited since construction or the last
    /// [reset_all](Grid::reset_all).
    pub fn visited_count(&self) -> usize {
        self.visited_cells
    }

    /// Restores every cell to its initial search state. Must be called
    /// between independent runs sharing one grid; solvers do not reset
    /// implicitly.
    pub fn reset_all(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
        self.visited_cells = 0;
    }

    /// All non-obstacle cells in stable row-major order, e.g. for picking
    /// valid start and end points.
    pub fn traversable_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|cell| !cell.is_obstacle)
    }

    /// Places or removes an obstacle. Newly connected components are
    /// joined immediately; blocking a cell marks the components dirty
    /// until [update](Grid::update) or
    /// [generate_components](Grid::generate_components) runs.
    pub fn set_obstacle(&mut self, x: i32, y: i32, blocked: bool) {
        let pos = Point::new(x, y);
        let ix = self.ix(pos);
        if !self.cells[ix].is_obstacle && blocked {
            self.components_dirty = true;
        }
        self.cells[ix].is_obstacle = blocked;
        if !blocked {
            for dir in Dir::ALL {
                if self.can_step(pos, dir) {
                    let neighbor_ix = self.ix(pos + dir);
                    self.components.union(ix, neighbor_ix);
                }
            }
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Rebuilds the [UnionFind] of traversable components, joining cells
    /// connected by a legal step.
    pub fn generate_components(&mut self) {
        debug!("generating connected components");
        self.components = UnionFind::new(self.width * self.height);
        self.components_dirty = false;
        // East, south and the two forward diagonals cover every edge once.
        let forward = [
            Dir::new(1, 0),
            Dir::new(0, 1),
            Dir::new(1, 1),
            Dir::new(1, -1),
        ];
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = Point::new(x, y);
                if self.cells[self.compute_ix(x, y)].is_obstacle {
                    continue;
                }
                for dir in forward {
                    if self.can_step(pos, dir) {
                        let neighbor_ix = self.ix(pos + dir);
                        self.components.union(self.compute_ix(x, y), neighbor_ix);
                    }
                }
            }
        }
    }

    /// Checks whether start and goal are on the same component. Intended
    /// for validating endpoints before a search; out-of-bounds positions
    /// are never reachable.
    pub fn reachable(&self, start: Point, goal: Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks whether start and goal are on different components.
    pub fn unreachable(&self, start: Point, goal: Point) -> bool {
        if self.in_bounds(start.x, start.y) && self.in_bounds(goal.x, goal.y) {
            !self.components.equiv(self.ix(start), self.ix(goal))
        } else {
            true
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let ch = if self.cells[self.compute_ix(x, y)].is_obstacle {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_text_builds_a_rectangular_grid() {
        let grid = Grid::from_map_str("..#\n.#.\n...").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert!(grid.can_enter(0, 0));
        assert!(!grid.can_enter(2, 0));
        assert!(!grid.can_enter(1, 1));
        assert!(grid.cell(Point::new(1, 1)).is_obstacle);
    }

    #[test]
    fn ragged_map_text_is_rejected() {
        let err = Grid::from_map_str("...\n..").unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(Grid::from_map_str("").unwrap_err(), GridError::EmptyMap);
    }

    #[test]
    fn diagonal_neighbor_needs_both_flanking_cells_open() {
        // S#
        // #.
        let grid = Grid::from_map_str("S#\n#.").unwrap();
        let neighbors = grid.neighbors_with_cost(Point::new(0, 0));
        assert!(neighbors.is_empty());

        // With one flank open the diagonal is still excluded.
        let grid = Grid::from_map_str("S#\n..").unwrap();
        let neighbors = grid.neighbors_with_cost(Point::new(0, 0));
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].0, Point::new(0, 1));

        // Both flanks open: the diagonal costs sqrt(2).
        let grid = Grid::from_map_str("S.\n..").unwrap();
        let neighbors = grid.neighbors_with_cost(Point::new(0, 0));
        assert_eq!(neighbors.len(), 3);
        let diagonal = neighbors
            .iter()
            .find(|(p, _)| *p == Point::new(1, 1))
            .unwrap();
        assert!((diagonal.1 - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn components_separate_walled_off_regions() {
        let grid = Grid::from_map_str(".#.\n.#.\n.#.").unwrap();
        assert!(grid.unreachable(Point::new(0, 0), Point::new(2, 2)));
        assert!(grid.reachable(Point::new(0, 0), Point::new(0, 2)));
        // Out of bounds is never reachable.
        assert!(grid.unreachable(Point::new(0, 0), Point::new(5, 5)));
    }

    #[test]
    fn corner_gap_does_not_join_components() {
        // .#
        // #.
        let grid = Grid::from_map_str(".#\n#.").unwrap();
        assert!(grid.unreachable(Point::new(0, 0), Point::new(1, 1)));
    }

    #[test]
    fn unblocking_rejoins_components() {
        let mut grid = Grid::from_map_str(".#.\n.#.\n.#.").unwrap();
        grid.set_obstacle(1, 1, false);
        assert!(grid.reachable(Point::new(0, 0), Point::new(2, 2)));
    }

    #[test]
    fn blocking_marks_components_dirty_until_update() {
        let mut grid = Grid::from_map_str("...\n...\n...").unwrap();
        grid.set_obstacle(1, 0, true);
        grid.set_obstacle(1, 1, true);
        grid.set_obstacle(1, 2, true);
        grid.update();
        assert!(grid.unreachable(Point::new(0, 0), Point::new(2, 0)));
    }

    #[test]
    fn traversable_cells_are_row_major() {
        let grid = Grid::from_map_str("#.\n.#").unwrap();
        let cells: Vec<Point> = grid.traversable_cells().map(|c| c.pos).collect();
        assert_eq!(cells, vec![Point::new(1, 0), Point::new(0, 1)]);
    }

    #[test]
    fn reset_all_clears_search_state_and_counter() {
        let mut grid = Grid::from_map_str("...").unwrap();
        grid.mark_visited(Point::new(1, 0));
        grid.cell_mut(Point::new(1, 0)).cost = 1.0;
        assert_eq!(grid.visited_count(), 1);
        grid.reset_all();
        assert_eq!(grid.visited_count(), 0);
        assert!(!grid.cell(Point::new(1, 0)).visited);
        assert!(grid.cell(Point::new(1, 0)).cost.is_infinite());
    }
}
