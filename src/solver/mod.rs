use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use smallvec::SmallVec;

use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::observer::ProgressObserver;
use crate::path::{reconstruct_path, Path};
use crate::point::Point;
use crate::{CARDINAL_COST, DIAGONAL_COST, N_SMALLVEC_SIZE};

pub mod astar;
pub mod dijkstra;
pub mod jps;

/// Successor lists stay small; eight entries covers a full neighborhood.
pub(crate) type Successors = SmallVec<[(Point, f64); N_SMALLVEC_SIZE]>;

/// What a single run did.
#[derive(Clone, Debug)]
pub struct SearchStats {
    /// Cells marked visited, including cells JPS stepped over while
    /// scanning between jump points.
    pub visited: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    pub path_found: bool,
    /// Total cost of the found path; [f64::INFINITY] when no path was
    /// found or the run was cancelled first.
    pub path_cost: f64,
}

impl Default for SearchStats {
    fn default() -> SearchStats {
        SearchStats {
            visited: 0,
            elapsed: Duration::ZERO,
            path_found: false,
            path_cost: f64::INFINITY,
        }
    }
}

impl SearchStats {
    /// The path cost rounded to one decimal place, as runs report it.
    pub fn reported_cost(&self) -> f64 {
        (self.path_cost * 10.0).round() / 10.0
    }
}

/// Shared continue-running flag. Cloned handles observe and trip the same
/// underlying flag, so a run can be stopped from another thread or from
/// inside an observer callback; the request takes effect at the next loop
/// check, not immediately. Starting a run re-arms the flag.
#[derive(Clone, Debug, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> StopToken {
        StopToken::default()
    }

    /// Asks the owning run to stop at its next check.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn rearm(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Octile distance: the exact cost of an unobstructed 8-directional path,
/// and therefore the tightest consistent estimate for this metric.
pub fn octile_distance(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x).abs() as f64;
    let dy = (a.y - b.y).abs() as f64;
    CARDINAL_COST * (dx + dy) + (DIAGONAL_COST - 2.0 * CARDINAL_COST) * dx.min(dy)
}

/// Straight-line distance; admissible for the 8-directional metric but
/// looser than [octile_distance].
pub fn euclidean_distance(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// A search strategy over a [Grid]. The three implementations share the
/// frontier loop and differ only in how they expand a cell and what they
/// use as a cost-to-goal estimate, so they are interchangeable behind
/// `&mut dyn GridSolver`.
pub trait GridSolver {
    /// Short name used in logs and comparison output.
    fn name(&self) -> &'static str;

    /// Runs the search and returns the path (empty when none was found)
    /// together with the run's statistics, which also stay available
    /// through the accessors below.
    ///
    /// The grid must be freshly built or [Grid::reset_all] must have been
    /// called since the previous run. Endpoints are assumed valid (in
    /// bounds and traversable); callers validate them, e.g. with
    /// [Grid::can_enter] or [Grid::reachable].
    fn find_shortest_path(
        &mut self,
        grid: &mut Grid,
        start: Point,
        end: Point,
        observer: &mut dyn ProgressObserver,
    ) -> (Path, SearchStats);

    /// Statistics of the most recent run.
    fn stats(&self) -> &SearchStats;

    /// Handle for cancelling a run from another thread or an observer
    /// callback.
    fn stop_token(&self) -> StopToken;

    fn visited_count(&self) -> usize {
        self.stats().visited
    }

    fn elapsed(&self) -> Duration {
        self.stats().elapsed
    }

    fn path_found(&self) -> bool {
        self.stats().path_found
    }

    /// Total path cost rounded to one decimal place.
    fn path_cost(&self) -> f64 {
        self.stats().reported_cost()
    }

    fn request_stop(&self) {
        self.stop_token().request_stop()
    }
}

/// Drives the frontier loop shared by all three solvers: pop the cheapest
/// open cell, finalize it, and relax whatever `successors` yields for it.
/// `successors` receives the expanded cell's predecessor so JPS can prune
/// by travel direction; Dijkstra and A* ignore it.
pub(crate) fn run_search<F, H>(
    grid: &mut Grid,
    start: Point,
    end: Point,
    observer: &mut dyn ProgressObserver,
    stop: &StopToken,
    mut successors: F,
    heuristic: H,
) -> (Path, SearchStats)
where
    F: FnMut(&mut Grid, Option<Point>, Point, &mut dyn ProgressObserver) -> Successors,
    H: Fn(Point, Point) -> f64,
{
    debug_assert!(grid.can_enter(start.x, start.y) && grid.can_enter(end.x, end.y));
    debug_assert!(
        !grid.cell(start).visited,
        "grid not reset since the previous run"
    );

    let timer = Instant::now();
    let visited_before = grid.visited_count();
    let mut stats = SearchStats::default();
    let mut frontier = Frontier::new();
    let mut found = false;

    grid.cell_mut(start).cost = 0.0;
    frontier.push(start, heuristic(start, end));

    'search: while let Some(current) = frontier.pop() {
        if stop.is_stopped() {
            break;
        }
        // Stale duplicate of an already expanded cell.
        if grid.cell(current).closed {
            continue;
        }
        grid.cell_mut(current).closed = true;
        if grid.mark_visited(current) {
            observer.on_visit(grid.cell(current), start, end, false);
        }
        if current == end {
            found = true;
            break;
        }
        let parent = grid.cell(current).predecessor;
        let cost_here = grid.cell(current).cost;
        for (next, edge_cost) in successors(grid, parent, current, observer) {
            if stop.is_stopped() {
                break 'search;
            }
            if grid.cell(next).closed {
                continue;
            }
            let tentative = cost_here + edge_cost;
            if tentative < grid.cell(next).cost {
                let cell = grid.cell_mut(next);
                cell.cost = tentative;
                cell.predecessor = Some(current);
                frontier.push(next, tentative + heuristic(next, end));
            }
        }
    }

    stats.path_found = found;
    if found {
        stats.path_cost = grid.cell(end).cost;
    }
    stats.visited = grid.visited_count() - visited_before;
    stats.elapsed = timer.elapsed();
    let path = if found {
        reconstruct_path(grid, start, end)
    } else {
        Path::new()
    };
    (path, stats)
}

/// One debug line per run, shared by the solver implementations.
pub(crate) fn log_run(name: &str, stats: &SearchStats) {
    if stats.path_found {
        debug!(
            "{}: path found, cost {:.1}, {} cells visited in {:?}",
            name,
            stats.reported_cost(),
            stats.visited,
            stats.elapsed
        );
    } else {
        debug!(
            "{}: no path, {} cells visited in {:?}",
            name, stats.visited, stats.elapsed
        );
    }
}
