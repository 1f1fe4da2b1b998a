use grid_astar::{Grid, PathFinder, Point, WallPolicy};

// In this example the start is sealed off by walls
//  ___
// |S# |
// |# #|
// | #E|
//  ___
// so honouring walls yields no path, while ignoring them walks straight through.
fn main() {
    env_logger::init();
    let mut grid = Grid::new(3, 3).unwrap();
    for (row, col) in [(0, 1), (1, 0), (1, 2), (2, 1)] {
        grid.set_wall(Point::new(col, row), true).unwrap();
    }
    grid.update();
    grid.set_start(Point::new(0, 0)).unwrap();
    grid.set_end(Point::new(2, 2)).unwrap();
    println!("{}\n", grid);

    for policy in [WallPolicy::Block, WallPolicy::Ignore] {
        let path = PathFinder::with_wall_policy(policy)
            .find_marked_path(&grid)
            .unwrap();
        if path.is_empty() {
            println!("{:?}: no path", policy);
        } else {
            println!("{:?}:\n{}\n", policy, grid.render_path(&path));
        }
    }
}
