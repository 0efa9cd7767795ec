//! Controller and observer staircase (Hessenberg) forms.

use log::trace;
use ndarray::{s, Array2, ArrayView2};
use ndarray_linalg::OperationNorm;

use super::validate_triple;
use crate::error::Result;
use crate::mb::{block_diag, matrix_slice, snap_to_zero, svd_rank};

/// Which side of the system is compressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaircaseForm {
    /// Compress `B`; the controllable part sits in the leading states.
    #[default]
    Controller,
    /// Compress `C` by working on the dual `(Aᵀ, Cᵀ, Bᵀ)`.
    Observer,
}

/// Options for [`staircase`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaircaseOptions {
    /// Accumulate the orthogonal transformation `T`.
    pub compute_transform: bool,
    /// Controller or observer form.
    pub form: StaircaseForm,
    /// Reverse the state ordering, so the compressed rows end up at the
    /// bottom (controller form) or the compressed columns at the right
    /// (observer form).
    pub invert: bool,
    /// Report the block sizes found during the sweep.
    pub block_indices: bool,
    /// Rank tolerance for the subdiagonal blocks. If `None`, uses
    /// `n · ‖A‖₁ · ε`.
    pub rank_tol: Option<f64>,
}

/// Result of [`staircase`].
#[derive(Clone, Debug, PartialEq)]
pub struct Staircase {
    /// Transformed state matrix `T⁻¹ A T`
    pub a: Array2<f64>,
    /// Transformed input matrix `T⁻¹ B`
    pub b: Array2<f64>,
    /// Transformed output matrix `C T`
    pub c: Array2<f64>,
    /// Orthogonal transformation `T`, if requested
    pub transform: Option<Array2<f64>>,
    /// Sizes of the controllable (observable) blocks in discovery order, if
    /// requested. Their sum is the dimension of the controllable
    /// (observable) subspace.
    pub blocks: Option<Vec<usize>>,
}

/// Computes the controller- or observer-Hessenberg staircase form of
/// `(A, B, C)`.
///
/// In controller form the result has the block structure
///
/// ```text
///     ( x x x x x | x )
///     ( x x x x x | 0 )
///     ( 0 x x x x | 0 )
///     ( 0 0 x x x | 0 )
///     ( 0 0 0 x x | 0 )
///     ( ----------+-- )
///     ( x x x x x |   )
/// ```
///
/// and a zero-rank subdiagonal block separates the controllable states
/// (leading) from the uncontrollable ones.
///
/// # Arguments
///
/// * `a` - State matrix (n×n)
/// * `b` - Input matrix (n×m)
/// * `c` - Output matrix (p×n)
/// * `options` - Form, inversion, transform and block reporting switches
///
/// # Returns
///
/// A [`Staircase`]. If `rank(B) = 0` the inputs come back unchanged with
/// blocks `[0]`; if `rank(B) ≥ n` they come back unchanged with blocks `[n]`.
/// In both cases the transform is the identity.
///
/// # Errors
///
/// [`Error::InvalidShape`](crate::Error::InvalidShape) for inconsistent
/// dimensions.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use minreal_rs::tb::{staircase, StaircaseOptions};
///
/// let a = arr2(&[[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]);
/// let b = arr2(&[[1.0], [1.0], [0.0]]);
/// let c = arr2(&[[1.0, 1.0, 1.0]]);
///
/// let options = StaircaseOptions { block_indices: true, ..Default::default() };
/// let result = staircase(&a.view(), &b.view(), &c.view(), &options).unwrap();
/// assert_eq!(result.blocks, Some(vec![1, 1]));
/// ```
///
/// # Algorithm
///
/// 1. Row-compress `B = U_b Σ_b V_bᵀ`: `A₀ = U_bᵀ A U_b`, `B₀ = Σ_b V_bᵀ`
///    (rows past `rank(B)` zeroed), `C₀ = C U_b`.
/// 2. Sweep down the diagonal. At each step the block below the current
///    diagonal block is compressed with its own SVD; a partial rank records
///    a new block and continues, full row rank records the last block and
///    stops, zero rank stops.
/// 3. Entries below `n · ‖A‖₁ · ε` are snapped to zero after every step.
pub fn staircase(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    c: &ArrayView2<f64>,
    options: &StaircaseOptions,
) -> Result<Staircase> {
    validate_triple(a, b, c)?;

    // The observer form is the controller form of the dual system
    let (a, b, c) = match options.form {
        StaircaseForm::Controller => (a.view(), b.view(), c.view()),
        StaircaseForm::Observer => (a.t(), c.t(), b.t()),
    };

    let n = a.nrows();
    let b_svd = svd_rank(&b, None)?;
    let m0 = b_svd.rank;

    if m0 == 0 || m0 >= n {
        let blocks = if m0 == 0 { vec![0] } else { vec![n] };
        trace!("staircase: trivial case, rank(B) = {}, n = {}", m0, n);
        let (a, b, c) = match options.form {
            StaircaseForm::Controller => (a.to_owned(), b.to_owned(), c.to_owned()),
            StaircaseForm::Observer => (a.t().to_owned(), c.t().to_owned(), b.t().to_owned()),
        };
        return Ok(Staircase {
            a,
            b,
            c,
            transform: options.compute_transform.then(|| Array2::eye(n)),
            blocks: options.block_indices.then_some(blocks),
        });
    }

    let ub = &b_svd.u;
    let mut a0 = ub.t().dot(&a).dot(ub);
    let mut b0 = b_svd.sigma.dot(&b_svd.vt);
    b0.slice_mut(s![m0.., ..]).fill(0.0);
    let mut c0 = c.dot(ub);
    let mut p = ub.t().to_owned();
    let mut blocks = vec![m0];

    let tol = match options.rank_tol {
        Some(tol) => tol,
        // opnorm needs a contiguous layout; sliced views are copied first
        None => n as f64 * a.as_standard_layout().opnorm_one()? * f64::EPSILON,
    };

    let mut start = 0;
    let mut size = 0;
    let mut m = m0;
    for _ in 0..n {
        start += size;
        size = m;

        let region = a0.slice(s![start.., start..]).to_owned();
        let region = region.view();
        let (_, _, h3, h4) = matrix_slice(&region, (size, size));
        let rows = h3.nrows();
        if rows == 0 {
            break;
        }

        let h3_svd = svd_rank(&h3, Some(tol))?;
        m = h3_svd.rank;

        if m == 0 {
            break;
        }
        blocks.push(m);
        if m == rows {
            break;
        }
        trace!("staircase: block of size {} at offset {}", m, start + size);

        let mut sigma = h3_svd.sigma;
        snap_to_zero(&mut sigma, tol);
        let lower_left = sigma.dot(&h3_svd.vt);
        let lower_right = h3_svd.u.t().dot(&h4);

        let split = start + size;
        a0.slice_mut(s![split.., start..split]).assign(&lower_left);
        a0.slice_mut(s![split.., split..]).assign(&lower_right);

        let embed = block_diag(&[Array2::eye(n - rows), h3_svd.u.clone()]);
        p = block_diag(&[Array2::eye(n - rows), h3_svd.u.t().to_owned()]).dot(&p);
        a0 = a0.dot(&embed);
        c0 = c0.dot(&embed);
        snap_to_zero(&mut a0, tol);
        snap_to_zero(&mut c0, tol);
    }

    if options.invert {
        a0 = a0.slice(s![..;-1, ..;-1]).to_owned();
        b0 = b0.slice(s![..;-1, ..]).to_owned();
        c0 = c0.slice(s![.., ..;-1]).to_owned();
        p = p.slice(s![..;-1, ..]).to_owned();
    }

    let (a0, b0, c0) = match options.form {
        StaircaseForm::Controller => (a0, b0, c0),
        StaircaseForm::Observer => (a0.reversed_axes(), c0.reversed_axes(), b0.reversed_axes()),
    };

    Ok(Staircase {
        a: a0,
        b: b0,
        c: c0,
        transform: options.compute_transform.then(|| p.reversed_axes()),
        blocks: options.block_indices.then_some(blocks),
    })
}
