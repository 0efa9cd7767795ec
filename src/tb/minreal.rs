//! Removal of uncontrollable and unobservable modes.

use log::debug;
use ndarray::{s, Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::staircase::{staircase, Staircase, StaircaseForm, StaircaseOptions};
use super::validate_triple;
use crate::ab::cancellation_distance_with_rng;
use crate::error::Result;

/// Options for [`minimal_realization`].
#[derive(Clone, Debug, PartialEq)]
pub struct MinimalRealizationOptions {
    /// A mode whose cancellation distance is at or below this value is
    /// removed. Default `1e-9`.
    pub mu_tol: f64,
}

impl Default for MinimalRealizationOptions {
    fn default() -> Self {
        MinimalRealizationOptions { mu_tol: 1e-9 }
    }
}

/// Which part of the system survives a reduction step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    /// Keep the leading controllable states of the controller form
    Controllable,
    /// Keep the trailing observable states of the inverted observer form
    Observable,
}

/// Computes a minimal realization of `(A, B, C)`.
///
/// Uncontrollable and unobservable modes are removed one reduction at a time
/// until both the controllability and the observability distance exceed
/// `mu_tol`.
///
/// # Arguments
///
/// * `a` - State matrix (n×n)
/// * `b` - Input matrix (n×m)
/// * `c` - Output matrix (p×n)
/// * `options` - Cancellation tolerance
///
/// # Returns
///
/// `(A_min, B_min, C_min)` with `k ≤ n` states. If every state is removed
/// the result has shapes `0×0`, `0×m` and `p×0`.
///
/// # Errors
///
/// [`Error::InvalidShape`](crate::Error::InvalidShape) for inconsistent
/// dimensions, or a linear algebra failure from the underlying
/// decompositions.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use minreal_rs::tb::{minimal_realization, MinimalRealizationOptions};
///
/// // The mode at -2 is not excited by the input
/// let a = arr2(&[[-1.0, 0.0], [0.0, -2.0]]);
/// let b = arr2(&[[1.0], [0.0]]);
/// let c = arr2(&[[1.0, 1.0]]);
///
/// let (am, bm, cm) = minimal_realization(
///     &a.view(), &b.view(), &c.view(), &MinimalRealizationOptions::default(),
/// ).unwrap();
/// assert_eq!(am.dim(), (1, 1));
/// assert!((am[(0, 0)] + 1.0).abs() < 1e-10);
/// assert!((bm[(0, 0)] * cm[(0, 0)] - 1.0).abs() < 1e-10);
/// ```
///
/// # Algorithm
///
/// Each pass:
///
/// 1. Compute `kc = dist(A, B)` and `ko = dist(Aᵀ, Cᵀ)` with
///    [`cancellation_distance`](crate::ab::cancellation_distance). If both
///    exceed `mu_tol` the system is minimal.
/// 2. Compute the controller staircase form and the inverted observer
///    staircase form with their block sizes.
/// 3. When a distance reports a cancellation that the staircase form misses
///    (its blocks cover every state), drop boundary states one at a time
///    until the recomputed distance exceeds `mu_tol`. The controllable side
///    is only corrected when `ko ≥ kc`.
/// 4. Keep the side with fewer surviving states; on a tie keep the
///    observable part when `kc ≥ ko`.
pub fn minimal_realization(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    c: &ArrayView2<f64>,
    options: &MinimalRealizationOptions,
) -> Result<(Array2<f64>, Array2<f64>, Array2<f64>)> {
    let mut rng = StdRng::from_os_rng();
    minimal_realization_with_rng(a, b, c, options, &mut rng)
}

/// [`minimal_realization`] with an explicit source of randomness for the
/// cancellation distance estimates.
pub fn minimal_realization_with_rng<R: Rng + ?Sized>(
    a: &ArrayView2<f64>,
    b: &ArrayView2<f64>,
    c: &ArrayView2<f64>,
    options: &MinimalRealizationOptions,
    rng: &mut R,
) -> Result<(Array2<f64>, Array2<f64>, Array2<f64>)> {
    validate_triple(a, b, c)?;

    let mu_tol = options.mu_tol;
    let (inputs, outputs) = (b.ncols(), c.nrows());
    let mut a = a.to_owned();
    let mut b = b.to_owned();
    let mut c = c.to_owned();

    loop {
        let n = a.nrows();
        if state_exhausted(n) {
            debug!("minimal realization: no states left");
            return Ok(empty_triple(inputs, outputs));
        }

        let mut kc = controllability_distance(&a.view(), &b.view(), rng)?;
        let mut ko = controllability_distance(&a.t(), &c.t(), rng)?;

        if no_cancelling_mode(kc, ko, mu_tol) {
            debug!(
                "minimal realization: {} states, kc = {:e}, ko = {:e}, minimal",
                n, kc, ko
            );
            return Ok((a, b, c));
        }

        let ctrb = staircase(
            &a.view(),
            &b.view(),
            &c.view(),
            &StaircaseOptions {
                block_indices: true,
                ..StaircaseOptions::default()
            },
        )?;
        let obsv = staircase(
            &a.view(),
            &b.view(),
            &c.view(),
            &StaircaseOptions {
                form: StaircaseForm::Observer,
                invert: true,
                block_indices: true,
                ..StaircaseOptions::default()
            },
        )?;

        let mut kept_c = block_total(&ctrb);
        let mut kept_o = block_total(&obsv);

        // Trust the distance over the staircase rank decision
        if ko >= kc && staircase_disagrees(kept_c, n, kc, mu_tol) {
            let (kept, dist) = shrink_while_cancelling(n, mu_tol, |k| {
                controllability_distance(
                    &ctrb.a.slice(s![..k, ..k]),
                    &ctrb.b.slice(s![..k, ..]),
                    rng,
                )
            })?;
            kept_c = kept;
            kc = dist;
        }
        if kept_c == 0 {
            return Ok(empty_triple(inputs, outputs));
        }

        if staircase_disagrees(kept_o, n, ko, mu_tol) {
            let (kept, dist) = shrink_while_cancelling(n, mu_tol, |k| {
                let first = n - k;
                controllability_distance(
                    &obsv.a.slice(s![first.., first..]).t(),
                    &obsv.c.slice(s![.., first..]).t(),
                    rng,
                )
            })?;
            kept_o = kept;
            ko = dist;
        }
        if kept_o == 0 {
            return Ok(empty_triple(inputs, outputs));
        }

        let side = select_side(kept_c, kept_o, kc, ko);
        debug!(
            "minimal realization: {} states, kc = {:e}, ko = {:e}, \
             controllable {}, observable {}, keeping {:?} part",
            n, kc, ko, kept_c, kept_o, side
        );

        (a, b, c) = match side {
            Side::Controllable => truncate_leading(&ctrb, kept_c),
            Side::Observable => truncate_trailing(&obsv, kept_o),
        };
    }
}

fn controllability_distance<R: Rng + ?Sized>(
    f: &ArrayView2<f64>,
    g: &ArrayView2<f64>,
    rng: &mut R,
) -> Result<f64> {
    Ok(cancellation_distance_with_rng(f, g, rng)?.upper)
}

fn state_exhausted(n: usize) -> bool {
    n == 0
}

fn no_cancelling_mode(kc: f64, ko: f64, mu_tol: f64) -> bool {
    kc.min(ko) > mu_tol
}

/// The distance reports a cancellation while the staircase keeps every state.
fn staircase_disagrees(kept: usize, n: usize, distance: f64, mu_tol: f64) -> bool {
    kept == n && distance <= mu_tol
}

fn block_total(form: &Staircase) -> usize {
    form.blocks.as_ref().map_or(0, |blocks| blocks.iter().sum())
}

/// Picks the part of the system to keep. The side with fewer surviving
/// states wins; on a tie the observable part is kept unless the
/// observability distance is strictly larger.
pub(crate) fn select_side(kept_c: usize, kept_o: usize, kc: f64, ko: f64) -> Side {
    if kept_c > kept_o {
        Side::Observable
    } else if kept_c < kept_o {
        Side::Controllable
    } else if kc >= ko {
        Side::Observable
    } else {
        Side::Controllable
    }
}

/// Removes one state at a time, starting from `n - 1` states, until
/// `distance(k)` exceeds `mu_tol`.
///
/// Returns the surviving state count and its distance; `(0, 0.0)` if every
/// state had to go. A complex pair of cancelling modes therefore takes two
/// steps, and the first step may cut through the pair.
pub(crate) fn shrink_while_cancelling<F>(n: usize, mu_tol: f64, mut distance: F) -> Result<(usize, f64)>
where
    F: FnMut(usize) -> Result<f64>,
{
    let mut kept = n;
    while kept > 0 {
        kept -= 1;
        if kept == 0 {
            break;
        }
        let dist = distance(kept)?;
        if dist > mu_tol {
            return Ok((kept, dist));
        }
    }
    Ok((0, 0.0))
}

fn truncate_leading(form: &Staircase, k: usize) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    (
        form.a.slice(s![..k, ..k]).to_owned(),
        form.b.slice(s![..k, ..]).to_owned(),
        form.c.slice(s![.., ..k]).to_owned(),
    )
}

fn truncate_trailing(form: &Staircase, k: usize) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    let first = form.a.nrows() - k;
    (
        form.a.slice(s![first.., first..]).to_owned(),
        form.b.slice(s![first.., ..]).to_owned(),
        form.c.slice(s![.., first..]).to_owned(),
    )
}

fn empty_triple(inputs: usize, outputs: usize) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
    (
        Array2::zeros((0, 0)),
        Array2::zeros((0, inputs)),
        Array2::zeros((outputs, 0)),
    )
}
