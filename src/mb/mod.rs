//! Mathematical Routines - Basic Operations (Chapter MB)
//!
//! Low-level dense matrix helpers shared by the polynomial and realization
//! routines: a rank-revealing SVD with a configurable tolerance, numerical
//! rank, pseudo-inverse, a rectangular LU factorization, four-block slicing,
//! block-diagonal assembly and elementary basis vectors.

use std::ops::Range;

use ndarray::{s, Array1, Array2, ArrayView2};
use ndarray_linalg::SVD;

use crate::error::{Error, Result};

/// Full singular value decomposition together with its numerical rank.
#[derive(Clone, Debug)]
pub struct RankRevealingSvd {
    /// Left singular vectors (m×m, orthogonal)
    pub u: Array2<f64>,
    /// Singular values in non-increasing order (length min(m, n))
    pub singular_values: Array1<f64>,
    /// Σ laid out with the shape of the input (m×n)
    pub sigma: Array2<f64>,
    /// Transposed right singular vectors (n×n, orthogonal)
    pub vt: Array2<f64>,
    /// Number of singular values strictly above the tolerance
    pub rank: usize,
    /// Tolerance that was used to decide the rank
    pub tol: f64,
}

/// Default rank tolerance for a matrix with the given shape and largest
/// singular value: `max(m, n) * σ_max * ε`.
pub fn default_rank_tol(shape: (usize, usize), sigma_max: f64) -> f64 {
    (shape.0.max(shape.1) as f64) * sigma_max * f64::EPSILON
}

/// Computes a full SVD `A = U Σ Vᵀ` and the numerical rank of `A`.
///
/// # Arguments
///
/// * `a` - Input matrix (m×n), may be empty
/// * `tol` - Rank tolerance. If `None`, uses [`default_rank_tol`]
///
/// # Returns
///
/// A [`RankRevealingSvd`]. For empty inputs `U` and `Vᵀ` are identities,
/// `Σ` is an m×n zero matrix and the rank is 0.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use minreal_rs::mb::svd_rank;
///
/// let a = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
/// let svd = svd_rank(&a.view(), None).unwrap();
/// assert_eq!(svd.rank, 1);
/// ```
pub fn svd_rank(a: &ArrayView2<f64>, tol: Option<f64>) -> Result<RankRevealingSvd> {
    let (m, n) = a.dim();

    if m == 0 || n == 0 {
        return Ok(RankRevealingSvd {
            u: Array2::eye(m),
            singular_values: Array1::zeros(0),
            sigma: Array2::zeros((m, n)),
            vt: Array2::eye(n),
            rank: 0,
            tol: tol.unwrap_or(0.0),
        });
    }

    let (u, singular_values, vt) = a.svd(true, true)?;
    let (Some(u), Some(vt)) = (u, vt) else {
        return Err(Error::Lapack {
            routine: "gesvd",
            info: -1,
        });
    };

    let sigma_max = singular_values.iter().copied().fold(0.0, f64::max);
    let tol = tol.unwrap_or_else(|| default_rank_tol((m, n), sigma_max));
    let rank = singular_values.iter().filter(|&&sv| sv > tol).count();

    let mut sigma = Array2::zeros((m, n));
    for (i, &sv) in singular_values.iter().enumerate() {
        sigma[(i, i)] = sv;
    }

    Ok(RankRevealingSvd {
        u,
        singular_values,
        sigma,
        vt,
        rank,
        tol,
    })
}

/// Numerical rank of `a`, see [`svd_rank`] for the tolerance convention.
pub fn matrix_rank(a: &ArrayView2<f64>, tol: Option<f64>) -> Result<usize> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Ok(0);
    }

    let (_, singular_values, _) = a.svd(false, false)?;
    let sigma_max = singular_values.iter().copied().fold(0.0, f64::max);
    let tol = tol.unwrap_or_else(|| default_rank_tol((m, n), sigma_max));
    Ok(singular_values.iter().filter(|&&sv| sv > tol).count())
}

/// Moore-Penrose pseudo-inverse via the SVD.
///
/// Singular values at or below `1e-15 * σ_max` are treated as zero.
pub fn pinv(a: &ArrayView2<f64>) -> Result<Array2<f64>> {
    const RCOND: f64 = 1e-15;

    let (m, n) = a.dim();
    let svd = svd_rank(a, None)?;
    let sigma_max = svd.singular_values.iter().copied().fold(0.0, f64::max);
    let cutoff = RCOND * sigma_max;

    // pinv = V Σ⁺ Uᵀ
    let mut sigma_plus = Array2::zeros((n, m));
    for (i, &sv) in svd.singular_values.iter().enumerate() {
        if sv > cutoff {
            sigma_plus[(i, i)] = 1.0 / sv;
        }
    }

    Ok(svd.vt.t().dot(&sigma_plus).dot(&svd.u.t()))
}

/// Upper trapezoidal factor of `P A = L U` (partial pivoting).
///
/// Returns the `min(m, n) × n` matrix `U` computed by LAPACK's DGETRF. An
/// exactly singular factor is not an error here, callers inspect `U` for
/// zero rows themselves.
pub fn lu_upper(a: &ArrayView2<f64>) -> Result<Array2<f64>> {
    let (m, n) = a.dim();
    let k = m.min(n);

    if k == 0 {
        return Ok(Array2::zeros((k, n)));
    }

    // Column-major copy for LAPACK (Fortran convention)
    let mut col_major: Vec<f64> = a.t().iter().copied().collect();
    let mut ipiv = vec![0i32; k];
    let mut info: i32 = 0;
    let m_i32 = m as i32;
    let n_i32 = n as i32;

    unsafe {
        lapack_sys::dgetrf_(
            &m_i32,                 // M: number of rows
            &n_i32,                 // N: number of columns
            col_major.as_mut_ptr(), // A: matrix data (column-major)
            &m_i32,                 // LDA: leading dimension
            ipiv.as_mut_ptr(),      // IPIV: pivot indices
            &mut info,              // INFO: error flag
        );
    }

    // INFO > 0 only reports an exactly zero pivot
    if info < 0 {
        return Err(Error::Lapack {
            routine: "dgetrf",
            info,
        });
    }

    let lu = Array2::from_shape_vec((n, m), col_major)?.reversed_axes();
    let mut u = Array2::zeros((k, n));
    for i in 0..k {
        for j in i..n {
            u[(i, j)] = lu[(i, j)];
        }
    }

    Ok(u)
}

/// Splits `a` into four blocks at `(row, col)`:
///
/// ```text
/// ( a11  a12 )
/// ( a21  a22 )
/// ```
///
/// where `a11` is `row × col`. Either split index may equal the full
/// dimension, which yields empty blocks.
pub fn matrix_slice<'a>(
    a: &'a ArrayView2<'a, f64>,
    (row, col): (usize, usize),
) -> (
    ArrayView2<'a, f64>,
    ArrayView2<'a, f64>,
    ArrayView2<'a, f64>,
    ArrayView2<'a, f64>,
) {
    let row = row.min(a.nrows());
    let col = col.min(a.ncols());
    (
        a.slice(s![..row, ..col]),
        a.slice(s![..row, col..]),
        a.slice(s![row.., ..col]),
        a.slice(s![row.., col..]),
    )
}

/// Unit column vector `e_i` of length `n` as an `n × 1` matrix.
///
/// A negative index counts from the end, so `-1` is the last basis vector.
pub fn unit_column(n: usize, i: isize) -> Array2<f64> {
    let mut e = Array2::zeros((n, 1));
    if let Some(idx) = resolve_index(n, i) {
        e[(idx, 0)] = 1.0;
    }
    e
}

/// Unit row vector `e_iᵀ` of length `n` as a `1 × n` matrix.
pub fn unit_row(n: usize, i: isize) -> Array2<f64> {
    unit_column(n, i).reversed_axes()
}

/// Elementary projection `[e_r0, e_r0+1, ...]` for the given index range.
///
/// For `n = 4` and `0..2` this is the 4×2 matrix `[I₂; 0]`.
pub fn elementary_columns(n: usize, range: Range<usize>) -> Array2<f64> {
    let start = range.start.min(n);
    let end = range.end.min(n).max(start);
    let mut e = Array2::zeros((n, end - start));
    for (k, idx) in (start..end).enumerate() {
        e[(idx, k)] = 1.0;
    }
    e
}

fn resolve_index(n: usize, i: isize) -> Option<usize> {
    if i >= 0 {
        let idx = i as usize;
        (idx < n).then_some(idx)
    } else {
        let back = i.unsigned_abs();
        (back <= n).then(|| n - back)
    }
}

/// Block-diagonal matrix from the given (possibly rectangular) blocks.
pub fn block_diag(blocks: &[Array2<f64>]) -> Array2<f64> {
    let rows: usize = blocks.iter().map(|b| b.nrows()).sum();
    let cols: usize = blocks.iter().map(|b| b.ncols()).sum();
    let mut out = Array2::zeros((rows, cols));

    let (mut r, mut c) = (0, 0);
    for block in blocks {
        let (br, bc) = block.dim();
        out.slice_mut(s![r..r + br, c..c + bc]).assign(block);
        r += br;
        c += bc;
    }

    out
}

/// Sets every entry with magnitude strictly below `tol` to exactly zero.
pub fn snap_to_zero(a: &mut Array2<f64>, tol: f64) {
    a.mapv_inplace(|x| if x.abs() < tol { 0.0 } else { x });
}
