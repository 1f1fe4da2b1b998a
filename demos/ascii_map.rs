use grid_astar::{Grid, PathFinder};
use std::io::Read;

// Reads an ASCII map from stdin ('.' open, '#' wall, 'S' start, 'E' end) and prints the
// shortest path between the markers, e.g.
//   printf 'S..#\n.#..\n...E\n' | cargo run --example ascii_map
fn main() {
    env_logger::init();
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("Could not read map: {e}");
        std::process::exit(1);
    }
    let result = input
        .parse::<Grid>()
        .and_then(|grid| PathFinder::new().find_marked_path(&grid).map(|path| (grid, path)));
    match result {
        Ok((_, path)) if path.is_empty() => println!("No path"),
        Ok((grid, path)) => println!("{}", grid.render_path(&path)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
