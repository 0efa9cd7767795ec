//! Mathematical Routines - Polynomials (Chapter MC)
//!
//! Real polynomials are stored as coefficient vectors in **decreasing**
//! powers, so `s³ + 2s + 5` is `[1.0, 0.0, 2.0, 5.0]`. The empty vector and
//! vectors with leading zeros are accepted where noted; [`trim_leading_zeros`]
//! gives the canonical form.
//!
//! # Routines
//!
//! - Arithmetic: [`poly_add`], [`poly_add_complex`], [`poly_mul`], [`poly_div`]
//! - Construction: [`poly_from_roots`], [`companion`], [`squeeze_coefficients`]
//! - Numerical GCD via the Sylvester matrix: [`gcd`], [`gcd_with`]
//! - Numerical LCM via a block-companion realization: [`lcm`]
//! - Polynomial matrices for the LCM multipliers: [`PolyMatrix`]
//!
//! # Example
//!
//! ```
//! use minreal_rs::mc::{poly_div, poly_mul};
//!
//! let p = poly_mul(&[vec![1.0, 1.0], vec![1.0, 2.0]], true).unwrap();
//! assert_eq!(p, vec![1.0, 3.0, 2.0]);
//!
//! let (q, r) = poly_div(&p, &[1.0, 1.0]).unwrap();
//! assert_eq!(q, vec![1.0, 2.0]);
//! assert_eq!(r, vec![0.0]);
//! ```

mod gcd;
mod lcm;
mod poly;
mod polymatrix;

pub use gcd::{gcd, gcd_with, GcdOptions};
pub use lcm::{lcm, Lcm, LcmOptions};
pub use poly::{
    companion, degree, is_zero_poly, poly_add, poly_add_complex, poly_div, poly_from_roots,
    poly_mul, real_coefficients, squeeze_coefficients, trim_leading_zeros,
};
pub use polymatrix::PolyMatrix;
