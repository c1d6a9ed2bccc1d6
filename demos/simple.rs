use gridroute::{waypoints_to_path, Grid, GridSolver, JpsSolver, NoopObserver, Point};

// In this example a path is found on a grid with shape
// S . . . .
// . # # # .
// . . . . .
// . # # # .
// . . . . G
// S marks the start
// G marks the end
fn main() {
    let map = "S....\n.###.\n.....\n.###.\n....G";
    let mut grid = Grid::from_map_str(map).expect("map text is rectangular");
    let mut solver = JpsSolver::new();
    let (path, stats) = solver.find_shortest_path(
        &mut grid,
        Point::new(0, 0),
        Point::new(4, 4),
        &mut NoopObserver,
    );
    if stats.path_found {
        println!("A path has been found, cost {:.1}:", solver.path_cost());
        for point in waypoints_to_path(path) {
            println!("{}", point);
        }
    } else {
        println!("No path exists.");
    }
}
