//! Error types for minreal-rs

use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Result type alias using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the polynomial and realization routines.
///
/// Numerical ambiguity (near-singular pencils, borderline ranks) is never
/// reported here; those cases are resolved by thresholding.
#[derive(Error, Debug)]
pub enum Error {
    /// An argument has the wrong kind of content (empty list, empty or
    /// non-finite polynomial)
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// An array cannot be read as the required shape
    #[error("Invalid shape for '{arg}': expected {expected}, got {got:?}")]
    InvalidShape {
        /// The argument name
        arg: &'static str,
        /// Human readable description of the accepted shape
        expected: String,
        /// The shape that was supplied
        got: Vec<usize>,
    },

    /// Polynomial division with a divisor that cannot be deconvolved
    #[error("Dimension mismatch: {reason}")]
    DimensionMismatch {
        /// Description of the mismatch
        reason: String,
    },

    /// Failure reported by ndarray-linalg
    #[error("Linear algebra failure: {0}")]
    Linalg(#[from] LinalgError),

    /// Failure while reshaping an ndarray buffer
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// A raw LAPACK routine rejected its arguments
    #[error("LAPACK routine {routine} failed with INFO={info}")]
    Lapack {
        /// Routine name
        routine: &'static str,
        /// The INFO code returned
        info: i32,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub(crate) fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::InvalidShape`]
    pub(crate) fn invalid_shape(arg: &'static str, expected: impl Into<String>, got: &[usize]) -> Self {
        Error::InvalidShape {
            arg,
            expected: expected.into(),
            got: got.to_vec(),
        }
    }
}
