use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("A matrix must have at least one row.")]
    EmptyMatrix,

    /// Sorted distinct row lengths.
    #[error("A matrix can only have one column size, but the rows have {0:?} entries.")]
    RaggedRows(Vec<usize>),

    #[error("Cannot add rows of lengths {left} and {right}.")]
    LengthMismatch { left: usize, right: usize },

    #[error("Division by zero")]
    DivideByZero,

    #[error("Cannot get the determinant of a non-square matrix (was {0:?}).")]
    NotSquare((usize, usize)),

    #[error("Index {index} out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("{0} has no exact rational value")]
    InexactNumber(f64),

    #[error("Invalid number: {0:?}")]
    ParseNumber(String),

    #[error("Verbosity must be 0, 1 or 2 (was {0})")]
    InvalidVerbosity(u8),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
