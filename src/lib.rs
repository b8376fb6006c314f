//! Exact Gaussian elimination over rationals: determinant, row-echelon and
//! reduced row-echelon forms, with an optional trace of every row operation.

pub mod error;

pub mod matrix {
    pub mod matrix;
    pub mod row;
    pub mod trace;
}
pub mod rings {
    pub mod fraction;
}

#[cfg(feature = "python")]
pub mod python;

mod proptests;

pub use error::{MatrixError, Result};
pub use matrix::matrix::Matrix;
pub use matrix::row::Row;
pub use matrix::trace::{LogSink, PrintSink, TraceEvent, TraceSink, Verbosity};
pub use rings::fraction::Fraction;

/// The exact number every row and matrix is built from.
pub type Number = Fraction;
