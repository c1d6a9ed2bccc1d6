use itertools::unfold;
use log::warn;

use crate::grid::Grid;
use crate::point::Point;

/// An ordered sequence of positions from start to end inclusive. An empty
/// sequence signals that no path was found.
pub type Path = Vec<Point>;

/// Walks predecessor links back from `goal` and returns the collected
/// sequence reversed, so index 0 is `start` and the last index is `goal`.
/// Returns an empty path if the chain does not terminate at `start`;
/// solvers only call this once a path is known to exist.
pub fn reconstruct_path(grid: &Grid, start: Point, goal: Point) -> Path {
    let mut path: Path = unfold(Some(goal), |state| {
        let point = (*state)?;
        *state = grid.cell(point).predecessor;
        Some(point)
    })
    .collect();
    path.reverse();
    if path.first() == Some(&start) {
        path
    } else {
        warn!("predecessor chain from {} does not reach {}", goal, start);
        Path::new()
    }
}

/// Expands a waypoint sequence (such as the jump points JPS reports) into
/// a path that can be followed step by step. Due to symmetry this is
/// typically one of many unit-step paths through the waypoints.
pub fn waypoints_to_path(waypoints: Path) -> Path {
    let mut waypoints = waypoints.into_iter();
    let Some(mut current) = waypoints.next() else {
        return Path::new();
    };
    let mut path = vec![current];
    for next in waypoints {
        while current.chebyshev_distance(&next) >= 1 {
            current = current + current.dir_to(&next);
            path.push(current);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruction_follows_predecessors_from_the_goal() {
        let mut grid = Grid::from_map_str("...").unwrap();
        grid.cell_mut(Point::new(1, 0)).predecessor = Some(Point::new(0, 0));
        grid.cell_mut(Point::new(2, 0)).predecessor = Some(Point::new(1, 0));
        let path = reconstruct_path(&grid, Point::new(0, 0), Point::new(2, 0));
        assert_eq!(
            path,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
        );
    }

    #[test]
    fn broken_chain_yields_an_empty_path() {
        let grid = Grid::from_map_str("...").unwrap();
        let path = reconstruct_path(&grid, Point::new(0, 0), Point::new(2, 0));
        assert!(path.is_empty());
    }

    #[test]
    fn waypoints_expand_to_unit_steps() {
        let waypoints = vec![Point::new(0, 0), Point::new(3, 3), Point::new(3, 5)];
        let path = waypoints_to_path(waypoints);
        assert_eq!(path.len(), 6);
        assert_eq!(path[0], Point::new(0, 0));
        assert_eq!(path[3], Point::new(3, 3));
        assert_eq!(path[5], Point::new(3, 5));
        for pair in path.windows(2) {
            assert_eq!(pair[0].chebyshev_distance(&pair[1]), 1);
        }
    }

    #[test]
    fn empty_waypoints_expand_to_an_empty_path() {
        assert!(waypoints_to_path(Path::new()).is_empty());
    }
}
