use grid_astar::{Grid, PathFinder};

// In this example a path is found on the default 10x10 grid, from the start marker in the
// top-left corner to the end marker in the bottom-right corner.
fn main() {
    env_logger::init();
    let grid = Grid::default();
    let path = PathFinder::new().find_marked_path(&grid).unwrap();
    println!("Path with {} moves:", path.len() - 1);
    for p in &path {
        println!("{:?}", p);
    }
    println!("{}", grid.render_path(&path));
}
