//! State-space model container.

use ndarray::{concatenate, s, Array2, ArrayView2, Axis};

use super::minreal::{minimal_realization, MinimalRealizationOptions};
use super::validate_triple;
use crate::error::{Error, Result};

/// Continuous or discrete LTI model `(A, B, C, D)` with `n` states, `m`
/// inputs and `p` outputs.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSpace {
    a: Array2<f64>,
    b: Array2<f64>,
    c: Array2<f64>,
    d: Array2<f64>,
}

impl StateSpace {
    /// Builds a model after checking that `A` is n×n, `B` is n×m, `C` is
    /// p×n and `D` is p×m.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::arr2;
    /// use minreal_rs::tb::StateSpace;
    ///
    /// let sys = StateSpace::new(
    ///     arr2(&[[-1.0]]),
    ///     arr2(&[[1.0]]),
    ///     arr2(&[[2.0]]),
    ///     arr2(&[[0.0]]),
    /// ).unwrap();
    /// assert_eq!(sys.order(), 1);
    /// ```
    pub fn new(a: Array2<f64>, b: Array2<f64>, c: Array2<f64>, d: Array2<f64>) -> Result<Self> {
        validate_triple(&a.view(), &b.view(), &c.view())?;
        if d.dim() != (c.nrows(), b.ncols()) {
            return Err(Error::invalid_shape(
                "d",
                format!("a {}×{} matrix", c.nrows(), b.ncols()),
                d.shape(),
            ));
        }
        Ok(StateSpace { a, b, c, d })
    }

    /// State matrix
    pub fn a(&self) -> ArrayView2<f64> {
        self.a.view()
    }

    /// Input matrix
    pub fn b(&self) -> ArrayView2<f64> {
        self.b.view()
    }

    /// Output matrix
    pub fn c(&self) -> ArrayView2<f64> {
        self.c.view()
    }

    /// Feedthrough matrix
    pub fn d(&self) -> ArrayView2<f64> {
        self.d.view()
    }

    /// Number of states
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// `(inputs, outputs)`
    pub fn io_dims(&self) -> (usize, usize) {
        (self.b.ncols(), self.c.nrows())
    }

    /// Minimal realization of this model; `D` is carried over unchanged.
    pub fn minimal(&self, options: &MinimalRealizationOptions) -> Result<StateSpace> {
        let (a, b, c) = minimal_realization(&self.a.view(), &self.b.view(), &self.c.view(), options)?;
        Ok(StateSpace {
            a,
            b,
            c,
            d: self.d.clone(),
        })
    }
}

/// Assembles the system matrix
///
/// ```text
/// ( A  B )
/// ( C  D )
/// ```
///
/// of size `(n + p) × (n + m)`.
pub fn concatenate_state_matrices(sys: &StateSpace) -> Array2<f64> {
    let (n, (m, p)) = (sys.order(), sys.io_dims());
    let mut out = Array2::zeros((n + p, n + m));
    out.slice_mut(s![..n, ..n]).assign(&sys.a);
    out.slice_mut(s![..n, n..]).assign(&sys.b);
    out.slice_mut(s![n.., ..n]).assign(&sys.c);
    out.slice_mut(s![n.., n..]).assign(&sys.d);
    out
}

/// Stacks `[A B; C D]` from loose blocks without building a [`StateSpace`].
///
/// # Errors
///
/// [`Error::Shape`] if the blocks do not line up.
pub fn stack_blocks(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    c: &ArrayView2<f64>,
    d: &ArrayView2<f64>,
) -> Result<Array2<f64>> {
    let top = concatenate(Axis(1), &[a.view(), b.view()])?;
    let bottom = concatenate(Axis(1), &[c.view(), d.view()])?;
    Ok(concatenate(Axis(0), &[top.view(), bottom.view()])?)
}
