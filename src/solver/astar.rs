use crate::grid::Grid;
use crate::observer::ProgressObserver;
use crate::path::Path;
use crate::point::Point;
use crate::solver::{
    euclidean_distance, log_run, octile_distance, run_search, GridSolver, SearchStats, StopToken,
};

/// Which admissible cost-to-goal estimate A* runs with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Exact cost of an unobstructed 8-directional path; consistent with
    /// the movement metric and the default.
    #[default]
    Octile,
    /// Straight-line distance; admissible but looser, so more cells get
    /// visited.
    Euclidean,
}

impl Heuristic {
    pub fn estimate(&self, a: Point, b: Point) -> f64 {
        match self {
            Heuristic::Octile => octile_distance(a, b),
            Heuristic::Euclidean => euclidean_distance(a, b),
        }
    }
}

/// Best-first search ordered by cost-so-far plus an admissible estimate
/// of the remaining cost. The cost-so-far lives in the cells, separate
/// from the heuristic-inflated frontier priority, so the reported path
/// cost is exact.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver {
    pub heuristic: Heuristic,
    stats: SearchStats,
    stop: StopToken,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver::default()
    }

    pub fn with_heuristic(heuristic: Heuristic) -> AstarSolver {
        AstarSolver {
            heuristic,
            ..AstarSolver::default()
        }
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn find_shortest_path(
        &mut self,
        grid: &mut Grid,
        start: Point,
        end: Point,
        observer: &mut dyn ProgressObserver,
    ) -> (Path, SearchStats) {
        self.stop.rearm();
        let heuristic = self.heuristic;
        let (path, stats) = run_search(
            grid,
            start,
            end,
            observer,
            &self.stop,
            |grid, _parent, node, _observer| grid.neighbors_with_cost(node),
            |a, b| heuristic.estimate(a, b),
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
