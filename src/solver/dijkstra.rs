use crate::grid::Grid;
use crate::observer::ProgressObserver;
use crate::path::Path;
use crate::point::Point;
use crate::solver::{log_run, run_search, GridSolver, SearchStats, StopToken};

/// Uniform-cost search: the frontier is keyed by the raw cost from the
/// start, so cells are finalized in nondecreasing distance order and the
/// first pop of the end cell carries the optimal cost.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver {
    stats: SearchStats,
    stop: StopToken,
}

impl DijkstraSolver {
    pub fn new() -> DijkstraSolver {
        DijkstraSolver::default()
    }
}

impl GridSolver for DijkstraSolver {
    fn name(&self) -> &'static str {
        "dijkstra"
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
            |grid, _parent, node, _observer| grid.neighbors_with_cost(node),
            |_, _| 0.0,
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
