use smallvec::SmallVec;

use crate::grid::Grid;
use crate::observer::ProgressObserver;
use crate::path::Path;
use crate::point::{Dir, Point};
use crate::solver::{
    log_run, octile_distance, run_search, GridSolver, SearchStats, StopToken, Successors,
};

/// Jump Point Search: the same frontier loop as A*, but successors are
/// jump points found by scanning along rays instead of raw neighbors,
/// which prunes the symmetric paths an open grid is full of. Reported
/// path cost always equals Dijkstra's and A*'s; the reconstructed path
/// runs through jump points, so expand it with
/// [waypoints_to_path](crate::waypoints_to_path) when a cell-by-cell
/// path is needed.
///
/// The pruning rules are the variant for grids where a diagonal step
/// requires both flanking orthogonal cells to be open: diagonal travel
/// has no forced neighbors, and straight travel stops where a side cell
/// is open but the cell diagonally behind it is blocked.
#[derive(Clone, Debug, Default)]
pub struct JpsSolver {
    stats: SearchStats,
    stop: StopToken,
}

impl JpsSolver {
    pub fn new() -> JpsSolver {
        JpsSolver::default()
    }
}

impl GridSolver for JpsSolver {
    fn name(&self) -> &'static str {
        "jps"
    }

    fn find_shortest_path(
        &mut self,
        grid: &mut Grid,
        start: Point,
        end: Point,
        observer: &mut dyn ProgressObserver,
    ) -> (Path, SearchStats) {
        self.stop.rearm();
        let (path, stats) = run_search(
            grid,
            start,
            end,
            observer,
            &self.stop,
            |grid, parent, node, observer| successors(grid, parent, node, start, end, observer),
            octile_distance,
        );
        log_run(self.name(), &stats);
        self.stats = stats.clone();
        (path, stats)
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }
}

/// Expands `node` into jump points: scan along every pruned direction and
/// relax whatever the scans return. Jump-segment edges run along a single
/// ray, so the octile distance is their exact cost.
fn successors(
    grid: &mut Grid,
    parent: Option<Point>,
    node: Point,
    start: Point,
    end: Point,
    observer: &mut dyn ProgressObserver,
) -> Successors {
    let dirs: SmallVec<[Dir; 8]> = match parent {
        // The start has no incoming direction to prune against.
        None => SmallVec::from_slice(&Dir::ALL),
        Some(parent) => pruned_directions(parent.dir_to(&node)),
    };
    let mut succ = Successors::new();
    for dir in dirs {
        if let Some(jump_point) = jump(grid, node, dir, start, end, observer) {
            grid.cell_mut(jump_point).is_jump_point = true;
            succ.push((jump_point, octile_distance(node, jump_point)));
        }
    }
    succ
}

/// The directions worth scanning from a cell entered along `dir`.
/// Candidates that are blocked or would cut a corner are rejected by the
/// scan's first step, so this only encodes the pruning table.
fn pruned_directions(dir: Dir) -> SmallVec<[Dir; 8]> {
    let mut dirs = SmallVec::new();
    if dir.diagonal() {
        // A diagonal step already requires both flanking orthogonals to
        // be open, so diagonal travel exposes no forced neighbors; the
        // two orthogonal continuations and the diagonal itself cover
        // every optimal continuation.
        dirs.push(dir.x_dir());
        dirs.push(dir.y_dir());
        dirs.push(dir);
    } else if dir.dx != 0 {
        dirs.push(dir);
        dirs.push(Dir::new(0, 1));
        dirs.push(Dir::new(0, -1));
        dirs.push(Dir::new(dir.dx, 1));
        dirs.push(Dir::new(dir.dx, -1));
    } else {
        dirs.push(dir);
        dirs.push(Dir::new(1, 0));
        dirs.push(Dir::new(-1, 0));
        dirs.push(Dir::new(1, dir.dy));
        dirs.push(Dir::new(-1, dir.dy));
    }
    dirs
}

/// Whether a straight scan travelling along `dir` must stop at `node`:
/// either a side cell is open while the cell diagonally behind it is
/// blocked (the scan just passed the end of a wall), or a side cell is
/// blocked while the cell diagonally ahead of it is open.
fn forced_straight(grid: &Grid, node: Point, dir: Dir) -> bool {
    let sides = if dir.dx != 0 {
        [Dir::new(0, 1), Dir::new(0, -1)]
    } else {
        [Dir::new(1, 0), Dir::new(-1, 0)]
    };
    for side in sides {
        let side_open = grid.can_enter(node.x + side.dx, node.y + side.dy);
        if side_open {
            let behind_blocked =
                !grid.can_enter(node.x + side.dx - dir.dx, node.y + side.dy - dir.dy);
            if behind_blocked {
                return true;
            }
        } else {
            let ahead_open = grid.can_enter(node.x + side.dx + dir.dx, node.y + side.dy + dir.dy);
            if ahead_open {
                return true;
            }
        }
    }
    false
}

/// Whether a diagonal scan must stop at `node` per the flanking rule: an
/// orthogonal cell behind the direction of travel is blocked while the
/// cell diagonally beyond it is open.
fn forced_diagonal(grid: &Grid, node: Point, dir: Dir) -> bool {
    (!grid.can_enter(node.x - dir.dx, node.y) && grid.can_enter(node.x - dir.dx, node.y + dir.dy))
        || (!grid.can_enter(node.x, node.y - dir.dy)
            && grid.can_enter(node.x + dir.dx, node.y - dir.dy))
}

/// Read-only straight-line lookahead launched at each step of a diagonal
/// scan: reports whether the goal or a forced cell lies along `dir`
/// without touching any search state. The cells it passes over are marked
/// later, if and when the jump point this turns up is actually expanded.
fn probe_straight(grid: &Grid, from: Point, dir: Dir, end: Point) -> bool {
    let mut current = from;
    loop {
        if !grid.can_step(current, dir) {
            return false;
        }
        current = current + dir;
        if current == end || forced_straight(grid, current, dir) {
            return true;
        }
    }
}

/// Scans from `from` along `dir` and returns the next jump point, if any:
/// the goal, a forced cell, or a diagonal cell from which a straight
/// probe finds either. Every cell the scan steps onto is marked visited,
/// given a predecessor and reported to the observer; cells another scan
/// already visited are stepped over untouched.
fn jump(
    grid: &mut Grid,
    from: Point,
    dir: Dir,
    start: Point,
    end: Point,
    observer: &mut dyn ProgressObserver,
) -> Option<Point> {
    if !grid.can_step(from, dir) {
        return None;
    }
    let next = from + dir;
    if grid.mark_visited(next) {
        grid.cell_mut(next).predecessor = Some(from);
        observer.on_visit(grid.cell(next), start, end, true);
    }
    if next == end {
        return Some(next);
    }
    if dir.diagonal() {
        if forced_diagonal(grid, next, dir) {
            return Some(next);
        }
        // A straight jump point on either axis makes this a turning point.
        if probe_straight(grid, next, dir.x_dir(), end)
            || probe_straight(grid, next, dir.y_dir(), end)
        {
            return Some(next);
        }
    } else if forced_straight(grid, next, dir) {
        return Some(next);
    }
    jump(grid, next, dir, start, end, observer)
}
