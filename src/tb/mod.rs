//! Transformation Routines (Chapter TB)
//!
//! Orthogonal transformations of state-space triples `(A, B, C)` that
//! expose their controllable and observable parts, and the minimal
//! realization built on top of them.
//!
//! - [`staircase`]: controller/observer Hessenberg form with block sizes
//! - [`minimal_realization`]: removes uncontrollable and unobservable modes
//! - [`StateSpace`] and [`concatenate_state_matrices`]: model container and
//!   the `[[A, B], [C, D]]` system matrix

use ndarray::ArrayView2;

use crate::error::{Error, Result};

mod minreal;
mod staircase;
mod state;

pub use minreal::{minimal_realization, minimal_realization_with_rng, MinimalRealizationOptions};
pub use staircase::{staircase, Staircase, StaircaseForm, StaircaseOptions};
pub use state::{concatenate_state_matrices, stack_blocks, StateSpace};

/// Checks that `A` is n×n, `B` has n rows and `C` has n columns.
pub(crate) fn validate_triple(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    c: &ArrayView2<f64>,
) -> Result<()> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(Error::invalid_shape("a", "a square matrix", a.shape()));
    }
    if b.nrows() != n {
        return Err(Error::invalid_shape(
            "b",
            format!("a matrix with {} rows", n),
            b.shape(),
        ));
    }
    if c.ncols() != n {
        return Err(Error::invalid_shape(
            "c",
            format!("a matrix with {} columns", n),
            c.shape(),
        ));
    }
    Ok(())
}
