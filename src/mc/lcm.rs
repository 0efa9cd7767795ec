//! Least common multiple of real polynomials via a block-companion
//! realization and its controllability structure.

use log::trace;
use ndarray::{concatenate, s, Array2, Axis};
use ndarray_linalg::Solve;

use super::poly::{companion, trim_leading_zeros, validate_coefficients};
use super::polymatrix::PolyMatrix;
use crate::error::{Error, Result};
use crate::mb::{block_diag, matrix_rank, pinv, svd_rank, unit_row};

/// Options for [`lcm`].
#[derive(Clone, Debug, PartialEq)]
pub struct LcmOptions {
    /// Also compute the multipliers `m_i` with `p_i · m_i = lcm`.
    /// Default `true`.
    pub compute_multipliers: bool,
    /// Coefficients below this magnitude are snapped to zero in the LCM and
    /// the multipliers. Only applied when multipliers are computed; otherwise
    /// the LCM is returned as solved. Set to `0.0` to disable. Default `1e-9`.
    pub cleanup_threshold: f64,
    /// Rank tolerance for the controllability matrix. If `None`, uses
    /// [`default_rank_tol`](crate::mb::default_rank_tol).
    pub rank_tol: Option<f64>,
}

impl Default for LcmOptions {
    fn default() -> Self {
        LcmOptions {
            compute_multipliers: true,
            cleanup_threshold: 1e-9,
            rank_tol: None,
        }
    }
}

/// Least common multiple and, optionally, the per-argument multipliers.
#[derive(Clone, Debug, PartialEq)]
pub struct Lcm {
    /// Monic LCM coefficients in decreasing powers
    pub poly: Vec<f64>,
    /// `multipliers[i]` satisfies `polys[i] · multipliers[i] = poly` (up to
    /// the scaling of `polys[i]`). `None` when not requested.
    pub multipliers: Option<Vec<Vec<f64>>>,
}

/// Computes the numerical least common multiple of real polynomials.
///
/// # Arguments
///
/// * `polys` - One or more coefficient sequences in decreasing powers
/// * `options` - Multiplier switch, cleanup threshold and rank tolerance
///
/// # Returns
///
/// The monic LCM and, if requested, one multiplier per argument. A constant
/// argument carries no dynamics; its multiplier is reported as the LCM
/// itself.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for an empty list, empty polynomials or
/// non-finite coefficients.
///
/// # Examples
///
/// ```
/// use minreal_rs::mc::{lcm, LcmOptions};
///
/// let result = lcm(&[vec![1.0, 1.0], vec![1.0, 2.0]], &LcmOptions::default()).unwrap();
/// let expected = [1.0, 3.0, 2.0];
/// for (x, y) in result.poly.iter().zip(expected.iter()) {
///     assert!((x - y).abs() < 1e-9);
/// }
/// ```
///
/// # Algorithm
///
/// Following Karcanias and Mitrouli (Lin. Alg. Appl. 381, 2004):
///
/// 1. **Realization**: `A = diag(companion(p_i))`, `B` stacks the last unit
///    vector of every block, `C = diag(e_firstᵀ)`. The controllable subspace
///    of `(A, B)` has the LCM as its minimal polynomial.
/// 2. **Krylov growth**: append `AᵏB` until the numerical rank stops
///    increasing; with `r` the saturated rank the LCM has degree `r`.
/// 3. **Coefficients**: with `U Σ Vᵀ` the SVD of the Krylov matrix `K`,
///    solve `(ΣVᵀ)[:r,:r] x = -(ΣVᵀ)[:r,r]` and append the monic 1.
/// 4. **Multipliers**: restrict `(A, B, C)` to the controllable subspace
///    spanned by `K[:, :r]` and evaluate `C_l · adj(sI - A_l) · B_l` with the
///    closed-form adjugate of the companion matrix of the LCM.
pub fn lcm<P: AsRef<[f64]>>(polys: &[P], options: &LcmOptions) -> Result<Lcm> {
    if polys.is_empty() {
        return Err(Error::invalid_argument(
            "polys",
            "at least one polynomial is required for an LCM",
        ));
    }

    for p in polys {
        validate_coefficients("polys", p.as_ref())?;
    }

    let trimmed: Vec<Vec<f64>> = polys
        .iter()
        .map(|p| trim_leading_zeros(p.as_ref()))
        .collect();

    // Constants are set aside and get the LCM as placeholder multiplier
    let dynamic: Vec<&Vec<f64>> = trimmed.iter().filter(|p| p.len() > 1).collect();
    let is_constant: Vec<bool> = trimmed.iter().map(|p| p.len() == 1).collect();

    if dynamic.is_empty() {
        trace!("lcm: all arguments are constant");
        let poly = vec![1.0];
        let multipliers = options
            .compute_multipliers
            .then(|| vec![poly.clone(); trimmed.len()]);
        return Ok(Lcm { poly, multipliers });
    }

    let degrees: Vec<usize> = dynamic.iter().map(|p| p.len() - 1).collect();
    let a = block_diag(&dynamic.iter().map(|p| companion(p)).collect::<Vec<_>>());
    let n = a.nrows();

    let mut b = Array2::zeros((n, 1));
    let mut offset = 0;
    for &d in &degrees {
        b[(offset + d - 1, 0)] = 1.0;
        offset += d;
    }
    let c = block_diag(
        &degrees
            .iter()
            .map(|&d| unit_row(d, 0))
            .collect::<Vec<_>>(),
    );

    // Grow [B, AB, A²B, ...] until the rank stops increasing
    let mut krylov = b.clone();
    let mut power = b.clone();
    let mut i = 1;
    while i <= n && matrix_rank(&krylov.view(), options.rank_tol)? == krylov.ncols() {
        power = a.dot(&power);
        krylov = concatenate(Axis(1), &[krylov.view(), power.view()])?;
        i += 1;
    }
    let r = krylov.ncols() - 1;
    trace!("lcm: {} states, LCM degree {}", n, r);

    let svd = svd_rank(&krylov.view(), options.rank_tol)?;
    let reduced = svd.sigma.dot(&svd.vt);
    let lhs = reduced.slice(s![..r, ..r]).to_owned();
    let rhs = reduced.slice(s![..r, r]).mapv(|x| -x);
    let low_order = lhs.solve_into(rhs)?;

    let mut poly: Vec<f64> = low_order.to_vec();
    poly.push(1.0);
    poly.reverse();

    if !options.compute_multipliers {
        return Ok(Lcm {
            poly,
            multipliers: None,
        });
    }

    let basis = krylov.slice(s![.., ..r]);
    let b_lcm = pinv(&basis)?.dot(&b);
    let c_lcm = c.dot(&basis);

    // C_l · adj(sI - A_l) · B_l, carried out on polynomial entries
    let adjugate = companion_adjugate(&poly, r);
    let weighted = adjugate.scalar_left_mul(&b_lcm.t())?;
    let products = weighted.transpose().scalar_left_mul(&c_lcm.view())?;

    let mut dynamic_mults = (0..products.dim().0).map(|k| products.get(k, 0).to_vec());
    let mut multipliers = Vec::with_capacity(trimmed.len());
    for &constant in &is_constant {
        let mult = if constant {
            poly.clone()
        } else {
            dynamic_mults.next().unwrap_or_else(|| vec![0.0])
        };
        multipliers.push(mult);
    }

    snap_coefficients(&mut poly, options.cleanup_threshold);
    for m in multipliers.iter_mut() {
        snap_coefficients(m, options.cleanup_threshold);
        *m = trim_leading_zeros(m);
    }

    Ok(Lcm {
        poly,
        multipliers: Some(multipliers),
    })
}

fn snap_coefficients(p: &mut [f64], threshold: f64) {
    p.iter_mut()
        .filter(|c| c.abs() < threshold)
        .for_each(|c| *c = 0.0);
}

/// Polynomial adjugate of `(sI - A)` for `A` the companion matrix of the
/// monic polynomial `poly` of degree `n`.
///
/// Every entry is stored with `n` coefficients. Diagonal entry `(x, x)` is
/// the leading `n - x` coefficients of `poly`; entry `(y, x)` above the
/// diagonal is entry `(x, x)` shifted right by `x - y`; entry `(y, x)` below
/// the diagonal is the negated tail `poly[n-x..]` placed at offset `n - y`.
pub(crate) fn companion_adjugate(poly: &[f64], n: usize) -> PolyMatrix {
    let mut adj = PolyMatrix::zeros(n, n, n);

    for x in 0..n {
        let mut diagonal = vec![0.0; n];
        diagonal[..n - x].copy_from_slice(&poly[..n - x]);

        for y in 0..n {
            if y < x {
                let shift = x - y;
                let mut cell = vec![0.0; n];
                cell[shift..].copy_from_slice(&diagonal[..n - shift]);
                adj.set(y, x, cell);
            } else if y > x {
                let mut cell = vec![0.0; n];
                for (k, &coef) in poly[n - x..].iter().enumerate() {
                    cell[n - y + k] = -coef;
                }
                adj.set(y, x, cell);
            }
        }

        adj.set(x, x, diagonal);
    }

    adj
}
