//! Greatest common divisor of real polynomials via the Sylvester matrix.

use log::trace;
use ndarray::Array2;

use super::poly::{is_zero_poly, trim_leading_zeros, validate_coefficients};
use crate::error::{Error, Result};
use crate::mb::{lu_upper, matrix_rank, snap_to_zero};

/// Tolerances for [`gcd_with`].
#[derive(Clone, Debug, PartialEq)]
pub struct GcdOptions {
    /// Entries of the LU factor below this magnitude are treated as zero.
    /// Default `1e-8`.
    pub lu_threshold: f64,
    /// Rank tolerance for the Sylvester matrix. If `None`, uses
    /// [`default_rank_tol`](crate::mb::default_rank_tol).
    pub rank_tol: Option<f64>,
}

impl Default for GcdOptions {
    fn default() -> Self {
        GcdOptions {
            lu_threshold: 1e-8,
            rank_tol: None,
        }
    }
}

/// Computes the numerical greatest common divisor of real polynomials with
/// default tolerances. See [`gcd_with`].
///
/// # Examples
///
/// ```
/// use minreal_rs::mc::gcd;
///
/// // (s + 1)(s + 2) and (s + 1)(s + 3) share s + 1
/// let g = gcd(&[vec![1.0, 3.0, 2.0], vec![1.0, 4.0, 3.0]]).unwrap();
/// assert!((g[0] - 1.0).abs() < 1e-10 && (g[1] - 1.0).abs() < 1e-10);
///
/// // Scalars are never cancelled
/// assert_eq!(gcd(&[vec![2.0], vec![2.0, 4.0]]).unwrap(), vec![1.0]);
/// ```
pub fn gcd<P: AsRef<[f64]>>(polys: &[P]) -> Result<Vec<f64>> {
    gcd_with(polys, &GcdOptions::default())
}

/// Computes the numerical greatest common divisor of real polynomials.
///
/// Polynomials are given in decreasing powers, e.g. `s² + 5` is
/// `[1, 0, 5]`. The result is monic, constants are never cancelled: the GCD
/// of `2` and `2s + 4` is `1`.
///
/// # Arguments
///
/// * `polys` - One or more coefficient sequences
/// * `options` - LU cleanup threshold and rank tolerance
///
/// # Returns
///
/// * A single polynomial is returned as given (trimmed)
/// * `[1]` if any polynomial is a nonzero constant or if the polynomials are
///   coprime
/// * Otherwise the monic GCD
///
/// # Errors
///
/// [`Error::InvalidArgument`] for an empty list, empty polynomials or
/// non-finite coefficients.
///
/// # Algorithm
///
/// 1. **Sylvester matrix**: with `n` the largest degree and `p` the largest
///    degree strictly below `n` (or `n` if all degrees agree), stack `p`
///    right-shifted copies of the maximal-degree polynomial and
///    `n + p - size + 1` shifted copies of each other polynomial, all padded
///    to `n + p` columns.
/// 2. **Coprimality**: full numerical rank means the GCD is `1`.
/// 3. **Elimination**: LU with partial pivoting (LAPACK DGETRF); the last
///    nonzero row of `U` (after snapping entries below `lu_threshold` to
///    zero) holds the GCD coefficients.
///
/// No certificate of exactness is computed; the result is a numerical
/// approximation.
pub fn gcd_with<P: AsRef<[f64]>>(polys: &[P], options: &GcdOptions) -> Result<Vec<f64>> {
    if polys.is_empty() {
        return Err(Error::invalid_argument(
            "polys",
            "at least one polynomial is required for a GCD",
        ));
    }

    for p in polys {
        validate_coefficients("polys", p.as_ref())?;
    }

    let mut regular: Vec<Vec<f64>> = polys
        .iter()
        .map(|p| trim_leading_zeros(p.as_ref()))
        .collect();

    if regular.len() == 1 {
        return Ok(regular.remove(0));
    }

    // gcd(0, p) = p
    regular.retain(|p| !is_zero_poly(p));

    if regular.is_empty() || regular.iter().any(|p| p.len() == 1) {
        trace!("gcd: constant argument present, returning 1");
        return Ok(vec![1.0]);
    }

    if regular.len() == 1 {
        trace!("gcd: single non-constant argument left after dropping zeros");
        return Ok(regular.remove(0));
    }

    let degrees: Vec<usize> = regular.iter().map(|p| p.len() - 1).collect();
    let n = degrees.iter().copied().max().unwrap_or(0);
    let max_index = degrees.iter().position(|&d| d == n).unwrap_or(0);
    let p = degrees.iter().copied().filter(|&d| d < n).max().unwrap_or(n);

    let leading = regular.remove(max_index);
    let sylvester = sylvester_matrix(&leading, &regular, n, p);
    let (rows, cols) = sylvester.dim();

    let rank = matrix_rank(&sylvester.view(), options.rank_tol)?;
    trace!(
        "gcd: Sylvester matrix {}×{} has numerical rank {}",
        rows,
        cols,
        rank
    );

    if rank == rows.min(cols) {
        return Ok(vec![1.0]);
    }

    let mut u = lu_upper(&sylvester.view())?;
    snap_to_zero(&mut u, options.lu_threshold);

    // Last nonzero row, never dropping row 0
    let last = (1..u.nrows())
        .rev()
        .find(|&r| u.row(r).iter().any(|&x| x != 0.0))
        .unwrap_or(0);

    let row: Vec<f64> = u.row(last).to_vec();
    let mut gcd = trim_leading_zeros(&row);
    let lead = gcd[0];
    if lead != 0.0 {
        gcd.iter_mut().for_each(|c| *c /= lead);
    }

    Ok(gcd)
}

/// Generalized Sylvester matrix with `n + p` columns.
fn sylvester_matrix(leading: &[f64], others: &[Vec<f64>], n: usize, p: usize) -> Array2<f64> {
    let cols = n + p;
    let total_rows = p + others.iter().map(|q| cols + 1 - q.len()).sum::<usize>();
    let mut s = Array2::zeros((total_rows, cols));

    let mut row = 0;
    for shift in 0..p {
        for (j, &c) in leading.iter().enumerate() {
            s[(row, j + shift)] = c;
        }
        row += 1;
    }

    for poly in others {
        for shift in 0..=(cols - poly.len()) {
            for (j, &c) in poly.iter().enumerate() {
                s[(row, j + shift)] = c;
            }
            row += 1;
        }
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::poly::poly_div;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    #[test]
    fn test_single_polynomial_identity() {
        assert_eq!(gcd(&[vec![1.0, 0.0, 5.0]]).unwrap(), vec![1.0, 0.0, 5.0]);
        assert_eq!(gcd(&[vec![0.0, 2.0, 1.0]]).unwrap(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_scalar_never_cancelled() {
        assert_eq!(gcd(&[vec![2.0], vec![2.0, 4.0]]).unwrap(), vec![1.0]);
        assert_eq!(
            gcd(&[vec![1.0, 3.0, 2.0], vec![1.0, 4.0, 3.0], vec![5.0]]).unwrap(),
            vec![1.0]
        );
    }

    #[test]
    fn test_all_constants() {
        assert_eq!(gcd(&[vec![3.0], vec![4.0]]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_zero_polynomial_is_neutral() {
        assert_eq!(
            gcd(&[vec![0.0, 0.0], vec![1.0, 2.0]]).unwrap(),
            vec![1.0, 2.0]
        );
    }

    #[test]
    fn test_coprime() {
        assert_eq!(gcd(&[vec![1.0, 1.0], vec![1.0, 2.0]]).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_common_linear_factor() {
        let g = gcd(&[vec![1.0, 3.0, 2.0], vec![1.0, 4.0, 3.0]]).unwrap();
        assert_eq!(g.len(), 2);
        assert_abs_diff_eq!(g[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_three_polynomials_mixed_degrees() {
        // (s+1)(s+2)(s+3), (s+2)(s+4), (s+2)(s+5)(s+6)
        let p1 = vec![1.0, 6.0, 11.0, 6.0];
        let p2 = vec![1.0, 6.0, 8.0];
        let p3 = vec![1.0, 13.0, 52.0, 60.0];
        let g = gcd(&[p1.clone(), p2.clone(), p3.clone()]).unwrap();
        assert_eq!(g.len(), 2);
        assert_abs_diff_eq!(g[1], 2.0, epsilon = 1e-8);

        for p in [p1, p2, p3] {
            let (_, r) = poly_div(&p, &g).unwrap();
            assert!(r.iter().all(|c| c.abs() < 1e-7), "remainder {:?}", r);
        }
    }

    #[test]
    fn test_quadratic_common_factor() {
        // (s² + 1)(s + 1) and (s² + 1)(s - 2)
        let p1 = vec![1.0, 1.0, 1.0, 1.0];
        let p2 = vec![1.0, -2.0, 1.0, -2.0];
        let g = gcd(&[p1, p2]).unwrap();
        assert_eq!(g.len(), 3);
        assert_abs_diff_eq!(g[1], 0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(g[2], 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_arguments() {
        let none: [Vec<f64>; 0] = [];
        assert!(matches!(gcd(&none), Err(Error::InvalidArgument { .. })));
        assert!(matches!(
            gcd(&[vec![1.0], vec![f64::INFINITY]]),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_sylvester_layout() {
        let s = sylvester_matrix(&[1.0, 3.0, 2.0], &[vec![1.0, 4.0, 3.0]], 2, 2);
        assert_eq!(
            s,
            arr2(&[
                [1.0, 3.0, 2.0, 0.0],
                [0.0, 1.0, 3.0, 2.0],
                [1.0, 4.0, 3.0, 0.0],
                [0.0, 1.0, 4.0, 3.0],
            ])
        );
    }

    #[test]
    fn test_sylvester_unequal_degrees() {
        let s = sylvester_matrix(&[1.0, 0.0, 0.0, 1.0], &[vec![1.0, 1.0]], 3, 1);
        // One copy of the cubic, four shifted copies of the linear factor
        assert_eq!(s.dim(), (4, 4));
        assert_eq!(s.row(3).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
    }
}
