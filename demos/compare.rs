use gridroute::{AstarSolver, Cell, DijkstraSolver, Grid, GridSolver, JpsSolver, Point};

// Runs all three solvers over the same map and prints their per-run
// statistics, which makes the pruning effect of JPS easy to see.
fn main() {
    let map = "\
S...........
.##########.
.#........#.
.#.######.#.
.#.#....#.#.
.#.#.##.#.#.
.#...##...#.
##########.G";
    let mut grid = Grid::from_map_str(map).expect("map text is rectangular");
    let start = Point::new(0, 0);
    let end = Point::new(11, 7);
    if grid.unreachable(start, end) {
        println!("End is not reachable from start.");
        return;
    }

    let solvers: Vec<Box<dyn GridSolver>> = vec![
        Box::new(DijkstraSolver::new()),
        Box::new(AstarSolver::new()),
        Box::new(JpsSolver::new()),
    ];
    for mut solver in solvers {
        grid.reset_all();
        let mut scanned = 0usize;
        let mut observer = |_: &Cell, _: Point, _: Point, jump_scan: bool| {
            if jump_scan {
                scanned += 1;
            }
        };
        let (_, stats) = solver.find_shortest_path(&mut grid, start, end, &mut observer);
        println!(
            "{:>8}: cost {:>5.1}, visited {:>3} cells ({:>3} during jump scans) in {:?}",
            solver.name(),
            solver.path_cost(),
            stats.visited,
            scanned,
            stats.elapsed
        );
    }
}
