//! minreal-rs: polynomial GCD/LCM and minimal state-space realizations
//!
//! Numerical routines for linear time-invariant models: algebra on real
//! polynomials (with a Sylvester-matrix GCD and a realization-based LCM) and
//! the reduction of a state-space triple `(A, B, C)` to a minimal one by
//! removing uncontrollable and unobservable modes.
//!
//! # Organization
//!
//! Modules follow the SLICOT chapter naming:
//! - `mb`: Basic matrix operations (rank-revealing SVD, pseudo-inverse, LU)
//! - `mc`: Polynomial routines (arithmetic, companion matrix, GCD, LCM)
//! - `ab`: Analysis routines (distance to mode cancellation)
//! - `tb`: Transformation routines (staircase form, minimal realization)
//!
//! Logging goes through the [`log`] facade; install any logger to see the
//! minimal realization trace.
//!
//! # Example
//!
//! ```
//! use ndarray::arr2;
//! use minreal_rs::mc::gcd;
//! use minreal_rs::tb::{minimal_realization, MinimalRealizationOptions};
//!
//! // G(s) = (s + 1) / ((s + 1)(s + 2)) in controllable canonical form
//! let a = arr2(&[[0.0, 1.0], [-2.0, -3.0]]);
//! let b = arr2(&[[0.0], [1.0]]);
//! let c = arr2(&[[1.0, 1.0]]);
//!
//! let g = gcd(&[vec![1.0, 1.0], vec![1.0, 3.0, 2.0]]).unwrap();
//! assert_eq!(g.len(), 2);
//!
//! let (am, _, _) = minimal_realization(
//!     &a.view(), &b.view(), &c.view(), &MinimalRealizationOptions::default(),
//! ).unwrap();
//! assert_eq!(am.dim(), (1, 1));
//! assert!((am[(0, 0)] + 2.0).abs() < 1e-8);
//! ```

pub mod ab;
pub mod error;
pub mod mb;
pub mod mc;
pub mod tb;

pub use error::{Error, Result};
