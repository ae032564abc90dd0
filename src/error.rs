use thiserror::Error;

use crate::cell::Cell;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("{cell} is outside the {rows}x{cols} grid")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },
    #[error("{0} is occupied by an obstacle")]
    OccupiedByObstacle(Cell),
    #[error("malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("expected a matrix of {expected:?} (rows, cols), found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("a search needs both a start and a goal")]
    InvalidStartOrGoal,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
