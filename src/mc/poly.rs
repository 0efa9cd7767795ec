//! Coefficient-array utilities for polynomials in decreasing powers.

use ndarray::{Array2, ArrayViewD};
use num_complex::Complex64;
use num_traits::Zero;

use crate::error::{Error, Result};

/// Removes the leading (high-order) zero coefficients of `p`.
///
/// An all-zero or empty sequence collapses to the single coefficient `[0]`,
/// so the result is never empty. Trailing zeros are kept:
/// `[0, 0, 2, 3, 1, 0]` becomes `[2, 3, 1, 0]`.
///
/// # Examples
///
/// ```
/// use minreal_rs::mc::trim_leading_zeros;
///
/// assert_eq!(trim_leading_zeros(&[0.0, 0.0, 2.0, 3.0, 1.0, 0.0]), vec![2.0, 3.0, 1.0, 0.0]);
/// assert_eq!(trim_leading_zeros(&[0.0, 0.0]), vec![0.0]);
/// ```
pub fn trim_leading_zeros<T: Zero + Copy>(p: &[T]) -> Vec<T> {
    match p.iter().position(|c| !c.is_zero()) {
        Some(first) => p[first..].to_vec(),
        None => vec![T::zero()],
    }
}

/// Real parts of complex coefficients.
pub fn real_coefficients(p: &[Complex64]) -> Vec<f64> {
    p.iter().map(|c| c.re).collect()
}

/// Returns true if every coefficient is exactly zero.
pub fn is_zero_poly(p: &[f64]) -> bool {
    p.iter().all(|&c| c == 0.0)
}

/// Degree of `p` after trimming leading zeros (the zero polynomial has
/// degree 0).
pub fn degree(p: &[f64]) -> usize {
    trim_leading_zeros(p).len() - 1
}

/// Checks that `p` is a usable coefficient sequence: non-empty and finite.
pub(crate) fn validate_coefficients(arg: &'static str, p: &[f64]) -> Result<()> {
    if p.is_empty() {
        return Err(Error::invalid_argument(arg, "polynomial has no coefficients"));
    }
    if let Some(bad) = p.iter().find(|c| !c.is_finite()) {
        return Err(Error::invalid_argument(
            arg,
            format!("polynomial coefficients must be finite numbers, found {}", bad),
        ));
    }
    Ok(())
}

/// Flattens a coefficient array that is one-dimensional up to singleton axes.
///
/// Shapes such as `(n,)`, `(n, 1)` or `(1, n)` are accepted; anything with
/// more than one axis longer than 1 fails with [`Error::InvalidShape`].
pub fn squeeze_coefficients(a: &ArrayViewD<f64>) -> Result<Vec<f64>> {
    let long_axes = a.shape().iter().filter(|&&len| len > 1).count();
    if long_axes > 1 {
        return Err(Error::invalid_shape(
            "coefficients",
            "a 1D array or a 2D array with a singleton dimension",
            a.shape(),
        ));
    }
    Ok(a.iter().copied().collect())
}

/// Adds any number of polynomials.
///
/// Shorter polynomials are padded with zeros on the left (absent high-order
/// terms). With `trim_zeros` every argument is trimmed first; otherwise the
/// result keeps the length of the longest argument.
///
/// # Examples
///
/// ```
/// use minreal_rs::mc::poly_add;
///
/// let sum = poly_add(&[vec![1.0, 2.0, 3.0], vec![0.0, 1.0]], true).unwrap();
/// assert_eq!(sum, vec![1.0, 2.0, 4.0]);
/// ```
pub fn poly_add<P: AsRef<[f64]>>(polys: &[P], trim_zeros: bool) -> Result<Vec<f64>> {
    if polys.is_empty() {
        return Err(Error::invalid_argument(
            "polys",
            "at least one polynomial is required",
        ));
    }

    let args: Vec<Vec<f64>> = polys
        .iter()
        .map(|p| {
            if trim_zeros {
                trim_leading_zeros(p.as_ref())
            } else {
                p.as_ref().to_vec()
            }
        })
        .collect();

    Ok(padded_sum(args.iter().map(|p| p.as_slice())))
}

/// Complex counterpart of [`poly_add`]; imaginary remnants are discarded
/// and the sum is returned with real coefficients.
pub fn poly_add_complex<P: AsRef<[Complex64]>>(polys: &[P], trim_zeros: bool) -> Result<Vec<f64>> {
    if polys.is_empty() {
        return Err(Error::invalid_argument(
            "polys",
            "at least one polynomial is required",
        ));
    }

    let args: Vec<Vec<f64>> = polys
        .iter()
        .map(|p| {
            let p = if trim_zeros {
                trim_leading_zeros(p.as_ref())
            } else {
                p.as_ref().to_vec()
            };
            real_coefficients(&p)
        })
        .collect();

    Ok(padded_sum(args.iter().map(|p| p.as_slice())))
}

fn padded_sum<'a>(args: impl Iterator<Item = &'a [f64]> + Clone) -> Vec<f64> {
    let len = args.clone().map(<[f64]>::len).max().unwrap_or(0);
    let mut sum = vec![0.0; len];
    for p in args {
        let offset = len - p.len();
        for (s, &c) in sum[offset..].iter_mut().zip(p) {
            *s += c;
        }
    }
    sum
}

/// Multiplies any number of polynomials by successive convolution, reducing
/// left to right.
///
/// # Examples
///
/// ```
/// use minreal_rs::mc::poly_mul;
///
/// let p = poly_mul(&[vec![0.0, 2.0, 0.0], vec![0.0, 0.0, 0.0, 1.0, 3.0, 3.0, 1.0], vec![0.0, 0.5, 0.5]], true).unwrap();
/// assert_eq!(p, vec![1.0, 4.0, 6.0, 4.0, 1.0, 0.0]);
/// ```
pub fn poly_mul<P: AsRef<[f64]>>(polys: &[P], trim_zeros: bool) -> Result<Vec<f64>> {
    let mut factors = polys.iter().map(|p| {
        if trim_zeros {
            trim_leading_zeros(p.as_ref())
        } else {
            p.as_ref().to_vec()
        }
    });

    let first = factors.next().ok_or_else(|| {
        Error::invalid_argument("polys", "at least one polynomial is required")
    })?;

    factors.try_fold(first, |acc, factor| convolve(&acc, &factor))
}

/// Full discrete convolution of two coefficient sequences.
fn convolve(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::invalid_argument(
            "polys",
            "cannot multiply an empty coefficient sequence",
        ));
    }

    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    Ok(out)
}

/// Polynomial long division (deconvolution) of `dividend` by `divisor`.
///
/// # Returns
///
/// `(quotient, remainder)`, both trimmed of leading zeros. When the dividend
/// is shorter than the divisor the quotient is `[0]` and the remainder is
/// the (trimmed) dividend.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if the divisor is empty or its leading
/// coefficient is zero or not finite.
///
/// # Examples
///
/// ```
/// use minreal_rs::mc::poly_div;
///
/// // (s² + 3s + 2) / (s + 1) = s + 2
/// let (q, r) = poly_div(&[1.0, 3.0, 2.0], &[1.0, 1.0]).unwrap();
/// assert_eq!(q, vec![1.0, 2.0]);
/// assert_eq!(r, vec![0.0]);
/// ```
pub fn poly_div(dividend: &[f64], divisor: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let lead = match divisor.first() {
        Some(&lead) if lead != 0.0 && lead.is_finite() => lead,
        Some(&lead) => {
            return Err(Error::DimensionMismatch {
                reason: format!(
                    "divisor leading coefficient must be a nonzero finite number, got {}",
                    lead
                ),
            })
        }
        None => {
            return Err(Error::DimensionMismatch {
                reason: "divisor has no coefficients".to_string(),
            })
        }
    };

    if dividend.len() < divisor.len() {
        return Ok((vec![0.0], trim_leading_zeros(dividend)));
    }

    let mut remainder = dividend.to_vec();
    let mut quotient = vec![0.0; dividend.len() - divisor.len() + 1];

    for i in 0..quotient.len() {
        let q = remainder[i] / lead;
        quotient[i] = q;
        for (j, &d) in divisor.iter().enumerate().skip(1) {
            remainder[i + j] -= q * d;
        }
        remainder[i] = 0.0;
    }

    Ok((trim_leading_zeros(&quotient), trim_leading_zeros(&remainder)))
}

/// Expands a list of roots into the monic polynomial `Π (s - rᵢ)`.
///
/// Real and complex roots are both accepted. An empty list gives `[1]`.
///
/// # Examples
///
/// ```
/// use minreal_rs::mc::{poly_from_roots, real_coefficients};
///
/// let p = poly_from_roots([-1.0, -2.0]);
/// assert_eq!(real_coefficients(&p), vec![1.0, 3.0, 2.0]);
/// ```
pub fn poly_from_roots<I>(roots: I) -> Vec<Complex64>
where
    I: IntoIterator,
    I::Item: Into<Complex64>,
{
    let roots: Vec<Complex64> = roots.into_iter().map(Into::into).collect();

    let mut p = vec![Complex64::zero(); roots.len() + 1];
    p[0] = Complex64::new(1.0, 0.0);

    // Multiply the running product by (s - r), highest index first
    for (k, &r) in roots.iter().enumerate() {
        for i in (1..=k + 1).rev() {
            p[i] = p[i] - p[i - 1] * r;
        }
    }

    p
}

/// Companion matrix of the monic-normalized polynomial `p`.
///
/// The superdiagonal holds ones and the last row holds
/// `[-a_n, ..., -a_1]` for the monic polynomial `s^n + a_1 s^(n-1) + ... + a_n`.
/// A constant (or empty, or zero) polynomial gives a `0 × 0` matrix and a
/// first-order polynomial a `1 × 1` matrix.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use minreal_rs::mc::companion;
///
/// assert_eq!(companion(&[2.0, 4.0, 6.0]), arr2(&[[0.0, 1.0], [-3.0, -2.0]]));
/// assert_eq!(companion(&[1.0, 3.0]), arr2(&[[-3.0]]));
/// assert_eq!(companion(&[1.0]).dim(), (0, 0));
/// ```
pub fn companion(p: &[f64]) -> Array2<f64> {
    let trimmed = trim_leading_zeros(p);
    let lead = trimmed[0];
    let n = trimmed.len() - 1;

    if n == 0 || lead == 0.0 {
        return Array2::zeros((0, 0));
    }

    let mut c = Array2::zeros((n, n));
    for i in 0..n - 1 {
        c[(i, i + 1)] = 1.0;
    }
    for j in 0..n {
        c[(n - 1, j)] = -trimmed[n - j] / lead;
    }

    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2, Array2, IxDyn};

    #[test]
    fn test_trim_keeps_trailing_zeros() {
        assert_eq!(
            trim_leading_zeros(&[0.0, 0.0, 2.0, 3.0, 1.0, 0.0]),
            vec![2.0, 3.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_trim_all_zero_and_empty() {
        assert_eq!(trim_leading_zeros(&[0.0, 0.0, 0.0]), vec![0.0]);
        assert_eq!(trim_leading_zeros::<f64>(&[]), vec![0.0]);
    }

    #[test]
    fn test_trim_complex() {
        let p = [Complex64::zero(), Complex64::new(0.0, 1.0), Complex64::new(2.0, 0.0)];
        assert_eq!(trim_leading_zeros(&p).len(), 2);
    }

    #[test]
    fn test_degree() {
        assert_eq!(degree(&[0.0, 1.0, 2.0]), 1);
        assert_eq!(degree(&[0.0]), 0);
    }

    #[test]
    fn test_poly_add_pads_left() {
        let sum = poly_add(&[vec![1.0, 0.0, 5.0], vec![2.0, 1.0]], true).unwrap();
        assert_eq!(sum, vec![1.0, 2.0, 6.0]);
    }

    #[test]
    fn test_poly_add_untrimmed_keeps_length() {
        let sum = poly_add(&[vec![0.0, 0.0, 1.0], vec![1.0]], false).unwrap();
        assert_eq!(sum, vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_poly_add_empty_list() {
        let none: [Vec<f64>; 0] = [];
        assert!(matches!(
            poly_add(&none, true),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_poly_add_complex_discards_imaginary() {
        let a = vec![Complex64::new(1.0, 1e-17), Complex64::new(2.0, -3.0)];
        let b = vec![Complex64::new(1.0, 4.0)];
        assert_eq!(poly_add_complex(&[a, b], true).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_poly_mul_three_factors() {
        let p = poly_mul(&[vec![1.0, 1.0], vec![1.0, 2.0], vec![1.0, 3.0]], true).unwrap();
        assert_eq!(p, vec![1.0, 6.0, 11.0, 6.0]);
    }

    #[test]
    fn test_poly_mul_untrimmed_empty_factor() {
        let result = poly_mul(&[vec![1.0], vec![]], false);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_poly_div_with_remainder() {
        // s³ + 2s + 1 = (s + 1)(s² - s + 3) - 2
        let (q, r) = poly_div(&[1.0, 0.0, 2.0, 1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(q, vec![1.0, -1.0, 3.0]);
        assert_eq!(r, vec![-2.0]);
    }

    #[test]
    fn test_poly_div_short_dividend() {
        let (q, r) = poly_div(&[0.0, 2.0], &[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(q, vec![0.0]);
        assert_eq!(r, vec![2.0]);
    }

    #[test]
    fn test_poly_div_invalid_divisor() {
        assert!(matches!(
            poly_div(&[1.0, 2.0], &[0.0, 1.0]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            poly_div(&[1.0, 2.0], &[]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_poly_from_roots_complex_pair() {
        // (s - i)(s + i) = s² + 1
        let p = poly_from_roots([Complex64::new(0.0, 1.0), Complex64::new(0.0, -1.0)]);
        let re = real_coefficients(&p);
        assert_abs_diff_eq!(re[0], 1.0);
        assert_abs_diff_eq!(re[1], 0.0);
        assert_abs_diff_eq!(re[2], 1.0);
        assert!(p.iter().all(|c| c.im.abs() < 1e-15));
    }

    #[test]
    fn test_poly_from_roots_empty() {
        let p = poly_from_roots(Vec::<f64>::new());
        assert_eq!(p, vec![Complex64::new(1.0, 0.0)]);
    }

    #[test]
    fn test_squeeze_coefficients() {
        let col = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            squeeze_coefficients(&col.into_dyn().view()).unwrap(),
            vec![1.0, 2.0, 3.0]
        );

        let flat = arr1(&[4.0, 5.0]).into_dyn();
        assert_eq!(squeeze_coefficients(&flat.view()).unwrap(), vec![4.0, 5.0]);

        let square = Array2::<f64>::zeros((2, 2)).into_dyn();
        assert!(matches!(
            squeeze_coefficients(&square.view()),
            Err(Error::InvalidShape { .. })
        ));

        let cube = ndarray::ArrayD::<f64>::zeros(IxDyn(&[1, 3, 1]));
        assert_eq!(squeeze_coefficients(&cube.view()).unwrap().len(), 3);
    }

    #[test]
    fn test_validate_coefficients() {
        assert!(validate_coefficients("p", &[1.0, 2.0]).is_ok());
        assert!(validate_coefficients("p", &[]).is_err());
        assert!(validate_coefficients("p", &[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_companion_shapes() {
        assert_eq!(companion(&[1.0, 3.0]), arr2(&[[-3.0]]));
        assert_eq!(companion(&[1.0]).dim(), (0, 0));
        assert_eq!(companion(&[]).dim(), (0, 0));
        assert_eq!(companion(&[0.0, 0.0]).dim(), (0, 0));
    }

    #[test]
    fn test_companion_normalizes() {
        let c = companion(&[0.0, 2.0, 4.0, 6.0]);
        assert_eq!(c, arr2(&[[0.0, 1.0], [-3.0, -2.0]]));
    }

    #[test]
    fn test_companion_third_order() {
        // s³ - 6s² + 11s - 6
        let c = companion(&[1.0, -6.0, 11.0, -6.0]);
        assert_eq!(
            c,
            arr2(&[[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [6.0, -11.0, 6.0]])
        );
    }
}
