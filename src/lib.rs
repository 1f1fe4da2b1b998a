//! # grid_astar
//!
//! Shortest paths on a rectangular grid using
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm). Movement is 4-directional with
//! unit cost per step and the heuristic is the Manhattan distance, which is admissible and
//! consistent on such grids so returned paths are optimal.
//!
//! A [Grid] is plain data: callers mutate it (walls, start and end markers) and hand it to a
//! [PathFinder], which never mutates it. An unreachable goal yields an empty path, while
//! malformed input fails with a [PathError].
//!
//! ```
//! use grid_astar::{Grid, PathFinder, Point};
//!
//! let grid: Grid = "S..\n.#.\n..E".parse().unwrap();
//! let path = PathFinder::new().find_marked_path(&grid).unwrap();
//! assert_eq!(path.len(), 5);
//! assert_eq!(path.first(), Some(&Point::new(0, 0)));
//! ```
pub mod astar;
mod error;
mod grid;
mod path_finder;

pub use error::{PathError, Result};
pub use grid::{Cell, Grid};
pub use grid_util::point::Point;
pub use path_finder::{PathFinder, WallPolicy};

use itertools::Itertools;

/// Rows of the default grid.
pub const DEFAULT_ROWS: usize = 10;
/// Columns of the default grid.
pub const DEFAULT_COLS: usize = 10;
/// Cost of a single move between adjacent cells.
pub const STEP_COST: i32 = 1;

/// `|x1 - x2| + |y1 - y2|`, the length of a shortest path on an open 4-connected grid.
pub fn manhattan_distance(p1: &Point, p2: &Point) -> i32 {
    (p1.x - p2.x).abs() + (p1.y - p2.y).abs()
}

/// Checks that every consecutive pair of points in `path` is one orthogonal step apart.
/// Empty and single-point paths are contiguous.
pub fn path_is_contiguous(path: &[Point]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| manhattan_distance(a, b) == 1)
}
