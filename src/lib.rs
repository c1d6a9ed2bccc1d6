//! # gridroute
//!
//! Shortest paths on a 2-D grid of traversable and obstacle cells, with
//! three interchangeable solvers sharing one [Grid], one [Frontier] and
//! one path reconstruction:
//!
//! - [DijkstraSolver]: uniform-cost search,
//! - [AstarSolver]: best-first with an octile or euclidean estimate,
//! - [JpsSolver]: [Jump Point Search](https://en.wikipedia.org/wiki/Jump_point_search),
//!   which prunes symmetric paths by scanning for jump points.
//!
//! Movement is 8-directional with orthogonal cost 1 and diagonal cost √2.
//! A diagonal step is rejected unless both flanking orthogonal cells are
//! open, so paths never cut a corner between two obstacles; the rule is
//! enforced in the [Grid] and is identical for all three solvers, which
//! therefore always agree on the total path cost and differ only in how
//! many cells they visit to find it.
//!
//! ```
//! use gridroute::{AstarSolver, Grid, GridSolver, NoopObserver, Point};
//!
//! let mut grid = Grid::from_map_str("...\n.#.\n...").unwrap();
//! let mut solver = AstarSolver::new();
//! let (path, stats) = solver.find_shortest_path(
//!     &mut grid,
//!     Point::new(0, 0),
//!     Point::new(2, 2),
//!     &mut NoopObserver,
//! );
//! assert!(stats.path_found);
//! assert_eq!(path.first(), Some(&Point::new(0, 0)));
//! assert_eq!(path.last(), Some(&Point::new(2, 2)));
//! ```
//!
//! Solvers assume valid endpoints (in bounds, not obstacles); validate
//! them first, e.g. with [Grid::can_enter] or [Grid::reachable]. Call
//! [Grid::reset_all] between runs that share a grid — solvers do not
//! reset it implicitly. A [ProgressObserver] receives every visited cell
//! as the search runs, and a [StopToken] cancels a run from another
//! thread or from inside an observer callback.

pub mod cell;
pub mod frontier;
pub mod grid;
pub mod observer;
pub mod path;
pub mod point;
pub mod solver;

pub use cell::Cell;
pub use frontier::Frontier;
pub use grid::{Grid, GridError};
pub use observer::{LogObserver, NoopObserver, ProgressObserver};
pub use path::{reconstruct_path, waypoints_to_path, Path};
pub use point::{Dir, Point};
pub use solver::astar::{AstarSolver, Heuristic};
pub use solver::dijkstra::DijkstraSolver;
pub use solver::jps::JpsSolver;
pub use solver::{euclidean_distance, octile_distance, GridSolver, SearchStats, StopToken};

/// Cost of a step in a cardinal direction.
pub const CARDINAL_COST: f64 = 1.0;
/// Cost of a diagonal step.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Inline capacity for neighbour and successor lists.
pub const N_SMALLVEC_SIZE: usize = 8;
