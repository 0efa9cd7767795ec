//! Property-based tests for the polynomial arithmetic.
//!
//! Uses proptest to check the algebraic identities of trimming, addition,
//! multiplication and division over random coefficient vectors.

use proptest::prelude::*;

use minreal_rs::mc::{poly_add, poly_div, poly_mul, trim_leading_zeros};

fn coefficients(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-5.0f64..5.0, 1..=max_len)
}

/// Polynomial with a leading coefficient bounded away from zero.
fn divisor() -> impl Strategy<Value = Vec<f64>> {
    (1.0f64..5.0, prop::bool::ANY, coefficients(3)).prop_map(|(lead, negative, tail)| {
        let mut p = vec![if negative { -lead } else { lead }];
        p.extend(tail);
        p
    })
}

fn close(a: &[f64], b: &[f64], tol: f64) -> bool {
    let a = trim_leading_zeros(a);
    let b = trim_leading_zeros(b);
    let len = a.len().max(b.len());
    let pad = |p: &[f64]| {
        let mut v = vec![0.0; len - p.len()];
        v.extend_from_slice(p);
        v
    };
    let scale = a.iter().chain(b.iter()).fold(1.0f64, |m, c| m.max(c.abs()));
    pad(&a)
        .iter()
        .zip(pad(&b).iter())
        .all(|(x, y)| (x - y).abs() <= tol * scale)
}

// =============================================================================
// Trimming
// =============================================================================

proptest! {
    /// Trimming is idempotent and never yields an empty vector
    #[test]
    fn prop_trim_idempotent(p in prop::collection::vec(-2.0f64..2.0, 0..8), zeros in 0usize..4) {
        let mut padded = vec![0.0; zeros];
        padded.extend(p);
        let once = trim_leading_zeros(&padded);
        prop_assert!(!once.is_empty());
        prop_assert_eq!(trim_leading_zeros(&once), once);
    }

    /// All-zero input collapses to [0]
    #[test]
    fn prop_trim_all_zero(len in 0usize..10) {
        prop_assert_eq!(trim_leading_zeros(&vec![0.0; len]), vec![0.0]);
    }
}

// =============================================================================
// Addition and multiplication
// =============================================================================

proptest! {
    /// p + 0 = p
    #[test]
    fn prop_add_zero_identity(p in coefficients(6)) {
        let sum = poly_add(&[p.clone(), vec![0.0]], true).unwrap();
        prop_assert_eq!(sum, trim_leading_zeros(&p));
    }

    /// p · 1 = p
    #[test]
    fn prop_mul_one_identity(p in coefficients(6)) {
        let product = poly_mul(&[p.clone(), vec![1.0]], true).unwrap();
        prop_assert_eq!(product, trim_leading_zeros(&p));
    }

    /// Multiplication commutes
    #[test]
    fn prop_mul_commutative(p in coefficients(5), q in coefficients(5)) {
        let pq = poly_mul(&[p.clone(), q.clone()], true).unwrap();
        let qp = poly_mul(&[q, p], true).unwrap();
        prop_assert!(close(&pq, &qp, 1e-12));
    }

    /// Multiplication associates
    #[test]
    fn prop_mul_associative(p in coefficients(4), q in coefficients(4), r in coefficients(4)) {
        let left = poly_mul(&[poly_mul(&[p.clone(), q.clone()], true).unwrap(), r.clone()], true).unwrap();
        let right = poly_mul(&[p, poly_mul(&[q, r], true).unwrap()], true).unwrap();
        prop_assert!(close(&left, &right, 1e-10));
    }

    /// Addition commutes exactly
    #[test]
    fn prop_add_commutative(p in coefficients(6), q in coefficients(6)) {
        let pq = poly_add(&[p.clone(), q.clone()], true).unwrap();
        let qp = poly_add(&[q, p], true).unwrap();
        prop_assert_eq!(pq, qp);
    }
}

// =============================================================================
// Division
// =============================================================================

proptest! {
    /// dividend = quotient · divisor + remainder
    #[test]
    fn prop_division_round_trip(dividend in coefficients(8), divisor in divisor()) {
        let (q, r) = poly_div(&dividend, &divisor).unwrap();
        let product = poly_mul(&[q, divisor.clone()], true).unwrap();
        let rebuilt = poly_add(&[product, r.clone()], true).unwrap();
        prop_assert!(close(&rebuilt, &dividend, 1e-6), "rebuilt {:?} from {:?}", rebuilt, dividend);
        prop_assert!(r.len() < divisor.len());
    }

    /// Exact multiples leave no remainder
    #[test]
    fn prop_division_of_product(p in coefficients(5), divisor in divisor()) {
        let product = poly_mul(&[p.clone(), divisor.clone()], true).unwrap();
        let (_, r) = poly_div(&product, &divisor).unwrap();
        let scale = product.iter().fold(1.0f64, |m, c| m.max(c.abs()));
        prop_assert!(r.iter().all(|c| c.abs() <= 1e-9 * scale), "remainder {:?}", r);
    }
}
