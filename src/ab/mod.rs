//! Analysis Routines - Chapter AB
//!
//! Routines that analyze structural properties of a state-space model. The
//! central quantity here is the distance of a pencil `[F − pI | G]` to rank
//! deficiency, which measures how close `(F, G)` is to losing
//! controllability (or, applied to `(Aᵀ, Cᵀ)`, observability).

use std::cmp::Ordering;

use log::trace;
use ndarray::{concatenate, s, Array1, Array2, ArrayView2, Axis};
use ndarray_linalg::{Eig, QR, SVD};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::mb::elementary_columns;

/// Bounds on the distance of `[F − pI | G]` to rank deficiency.
#[derive(Clone, Debug, PartialEq)]
pub struct CancellationDistance {
    /// Tight upper bound: `σ_min([F − p*I | G])` at the critical eigenvalue
    pub upper: f64,
    /// Looser upper bound taken from the eigenvector partition
    pub upper_loose: f64,
    /// Lower bound `upper / (cond(V) + 1)`
    pub lower: f64,
    /// Complex frequency `p*` at which the pencil is closest to losing rank
    pub critical_eigenvalue: Complex64,
    /// The rank-deficient point lies within this distance of
    /// `critical_eigenvalue`
    pub radius: f64,
}

impl CancellationDistance {
    fn unbounded() -> Self {
        CancellationDistance {
            upper: f64::INFINITY,
            upper_loose: f64::INFINITY,
            lower: f64::INFINITY,
            critical_eigenvalue: Complex64::new(f64::NAN, f64::NAN),
            radius: f64::INFINITY,
        }
    }
}

/// Estimates how far the pencil `[F − pI | G]` is from rank deficiency.
///
/// The random orthogonal complement is drawn from a call-local generator
/// seeded by the operating system, so repeated calls on the same data can
/// differ in the last digits. Use [`cancellation_distance_with_rng`] for
/// reproducible results.
///
/// # Arguments
///
/// * `f` - Square matrix (n×n), typically the state matrix `A`
/// * `g` - Matrix with n rows, typically the input matrix `B`
///
/// # Errors
///
/// [`Error::InvalidShape`] if `f` is not square or `g` has a different
/// number of rows.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use minreal_rs::ab::cancellation_distance;
///
/// // The mode at -2 is not reachable from the input
/// let f = arr2(&[[-1.0, 0.0], [0.0, -2.0]]);
/// let g = arr2(&[[1.0], [0.0]]);
/// let dist = cancellation_distance(&f.view(), &g.view()).unwrap();
/// assert!(dist.upper < 1e-10);
/// assert!((dist.critical_eigenvalue.re + 2.0).abs() < 1e-8);
/// ```
pub fn cancellation_distance(
    f: &ArrayView2<f64>,
    g: &ArrayView2<f64>,
) -> Result<CancellationDistance> {
    let mut rng = StdRng::from_os_rng();
    cancellation_distance_with_rng(f, g, &mut rng)
}

/// [`cancellation_distance`] with an explicit source of randomness.
///
/// # Algorithm
///
/// Following Boley (SIAM J. Matrix Anal. Appl. 11(4), 1990):
///
/// 1. Form `A = [F | G]ᵀ` (N×M with `M = n`, `N = n + m`), `B = [I_M; 0]`,
///    `D = [0; I_(N−M)]` and `C` the orthonormal factor of a random N×(N−M)
///    matrix with entries uniform in `[-1, 1)`.
/// 2. Eigendecompose the square matrix `[A | C] = V Λ V⁻¹` and partition
///    every eigenvector as `(X_i; Y_i)` with `X_i` of length M.
/// 3. For every eigenvalue `λ_i` evaluate
///    `‖(C − λ_i D) Y_i‖ / ‖X_i‖`; the minimizer `λ_f` is the candidate
///    point of rank deficiency and its bound is `upper_loose`.
/// 4. Refine with `upper = σ_min(A − λ_f B)`, and derive
///    `lower = upper / (cond₂(V) + 1)` and `radius = upper · cond₂(V)`.
///
/// An empty `F` has no modes to cancel and yields infinite bounds.
pub fn cancellation_distance_with_rng<R: Rng + ?Sized>(
    f: &ArrayView2<f64>,
    g: &ArrayView2<f64>,
    rng: &mut R,
) -> Result<CancellationDistance> {
    let n = f.nrows();
    if f.ncols() != n {
        return Err(Error::invalid_shape("f", "a square matrix", f.shape()));
    }
    if g.nrows() != n {
        return Err(Error::invalid_shape(
            "g",
            format!("a matrix with {} rows", n),
            g.shape(),
        ));
    }
    if n == 0 {
        return Ok(CancellationDistance::unbounded());
    }

    let a = concatenate(Axis(1), &[f.view(), g.view()])?.reversed_axes();
    let (big_n, big_m) = a.dim();
    let b = elementary_columns(big_n, 0..big_m);
    let d = elementary_columns(big_n, big_m..big_n);
    let c = random_orthonormal(big_n, big_n - big_m, rng)?;

    let square = concatenate(Axis(1), &[a.view(), c.view()])?;
    let (evals, v) = square.eig()?;
    let k = condition_number(&v)?;

    let c_cplx = c.mapv(|x| Complex64::new(x, 0.0));
    let d_cplx = d.mapv(|x| Complex64::new(x, 0.0));

    let loose_bounds: Vec<f64> = evals
        .iter()
        .enumerate()
        .map(|(i, &lambda)| {
            let x = v.slice(s![..big_m, i]);
            let y = v.slice(s![big_m.., i]);
            let residual = (&c_cplx - &d_cplx.mapv(|e| e * lambda)).dot(&y);
            complex_norm(residual.iter()) / complex_norm(x.iter())
        })
        .collect();

    let (critical, upper_loose) = loose_bounds
        .iter()
        .copied()
        .enumerate()
        .map(|(i, bound)| (i, if bound.is_nan() { f64::INFINITY } else { bound }))
        .min_by(|x, y| x.1.partial_cmp(&y.1).unwrap_or(Ordering::Equal))
        .unwrap_or((0, f64::INFINITY));
    let e_f = evals[critical];

    let shifted = a.mapv(|x| Complex64::new(x, 0.0)) - b.mapv(|x| Complex64::new(x, 0.0) * e_f);
    let (_, singular_values, _) = shifted.svd(false, false)?;
    let upper = singular_values.iter().copied().fold(f64::INFINITY, f64::min);

    trace!(
        "cancellation distance: critical eigenvalue {}, upper {:e}, cond(V) {:e}",
        e_f,
        upper,
        k
    );

    Ok(CancellationDistance {
        upper,
        upper_loose,
        lower: upper / (k + 1.0),
        critical_eigenvalue: e_f,
        radius: upper * k,
    })
}

/// Orthonormal basis for the span of a random `rows × cols` matrix with
/// entries uniform in `[-1, 1)`.
fn random_orthonormal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Array2<f64>> {
    if cols == 0 {
        return Ok(Array2::zeros((rows, 0)));
    }
    let m = Array2::from_shape_simple_fn((rows, cols), || rng.random_range(-1.0..1.0));
    let (q, _) = m.qr()?;
    Ok(q)
}

/// 2-norm condition number `σ_max / σ_min` of a complex matrix.
fn condition_number(v: &Array2<Complex64>) -> Result<f64> {
    let (_, sv, _): (_, Array1<f64>, _) = v.svd(false, false)?;
    let smax = sv.iter().copied().fold(0.0, f64::max);
    let smin = sv.iter().copied().fold(f64::INFINITY, f64::min);
    Ok(if smin > 0.0 { smax / smin } else { f64::INFINITY })
}

fn complex_norm<'a>(values: impl Iterator<Item = &'a Complex64>) -> f64 {
    values.map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_uncontrollable_mode_detected() {
        let f = arr2(&[[-1.0, 0.0], [0.0, -2.0]]);
        let g = arr2(&[[1.0], [0.0]]);
        let dist = cancellation_distance_with_rng(&f.view(), &g.view(), &mut seeded()).unwrap();

        assert!(dist.upper < 1e-10, "upper = {:e}", dist.upper);
        assert_abs_diff_eq!(dist.critical_eigenvalue.re, -2.0, epsilon = 1e-8);
        assert_abs_diff_eq!(dist.critical_eigenvalue.im, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_controllable_pair_is_far() {
        let f = arr2(&[[-1.0, 0.0], [0.0, -2.0]]);
        let g = arr2(&[[1.0], [1.0]]);
        let dist = cancellation_distance_with_rng(&f.view(), &g.view(), &mut seeded()).unwrap();
        assert!(dist.upper > 1e-3, "upper = {:e}", dist.upper);
    }

    #[test]
    fn test_bound_ordering() {
        let f = arr2(&[[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [-6.0, -11.0, -6.0]]);
        let g = arr2(&[[0.0], [0.0], [1.0]]);
        let dist = cancellation_distance_with_rng(&f.view(), &g.view(), &mut seeded()).unwrap();

        assert!(dist.lower <= dist.upper);
        assert!(dist.upper <= dist.upper_loose * (1.0 + 1e-8) + 1e-12);
        assert!(dist.radius >= dist.upper);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let f = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let g = arr2(&[[1.0], [0.5]]);
        let first = cancellation_distance_with_rng(&f.view(), &g.view(), &mut seeded()).unwrap();
        let second = cancellation_distance_with_rng(&f.view(), &g.view(), &mut seeded()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_square_pencil_without_complement() {
        // G has no columns: every mode is trivially uncontrollable
        let f = arr2(&[[3.0]]);
        let g = Array2::<f64>::zeros((1, 0));
        let dist = cancellation_distance_with_rng(&f.view(), &g.view(), &mut seeded()).unwrap();
        assert_abs_diff_eq!(dist.upper, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dist.critical_eigenvalue.re, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_pencil_is_unbounded() {
        let f = Array2::<f64>::zeros((0, 0));
        let g = Array2::<f64>::zeros((0, 2));
        let dist = cancellation_distance(&f.view(), &g.view()).unwrap();
        assert!(dist.upper.is_infinite());
        assert!(dist.lower.is_infinite());
    }

    #[test]
    fn test_shape_validation() {
        let f = arr2(&[[1.0, 2.0]]);
        let g = arr2(&[[1.0]]);
        assert!(matches!(
            cancellation_distance(&f.view(), &g.view()),
            Err(Error::InvalidShape { arg: "f", .. })
        ));

        let f = arr2(&[[1.0]]);
        let g = arr2(&[[1.0], [2.0]]);
        assert!(matches!(
            cancellation_distance(&f.view(), &g.view()),
            Err(Error::InvalidShape { arg: "g", .. })
        ));
    }
}
