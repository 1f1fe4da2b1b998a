//! Error types for grid construction and path queries.
//!
//! An unreachable goal is not an error: searches report it with an empty path.

use grid_util::point::Point;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("{point} lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        point: Point,
        rows: usize,
        cols: usize,
    },

    #[error("no {0} cell is marked on the grid")]
    MissingEndpoint(&'static str),

    #[error("unknown tile {tile:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, tile: char },
}

pub type Result<T> = std::result::Result<T, PathError>;
