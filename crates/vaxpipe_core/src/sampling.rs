//! Random draws used by the simulation
//!
//! Phase durations come from an asymmetric triangular distribution described
//! by (low, likely, high) bounds. Success outcomes come from a correlated
//! Bernoulli draw so that candidates sharing a platform can fail or succeed
//! together.

use rand::Rng;
use rand_distr::{Distribution, Triangular};

use crate::error::InvalidRangeError;

/// Sample the triangular distribution on [`low`, `high`] peaking at `likely`.
///
/// Degenerates to a constant when the bounds coincide. Fails with
/// [`InvalidRangeError`] unless `low <= likely <= high` and all bounds are
/// finite.
pub fn sample_triangular<R: Rng + ?Sized>(
    rng: &mut R,
    low: f64,
    likely: f64,
    high: f64,
) -> Result<f64, InvalidRangeError> {
    if !low.is_finite() || !likely.is_finite() || !high.is_finite() || low > likely || likely > high
    {
        return Err(InvalidRangeError { low, likely, high });
    }
    Triangular::new(low, high, likely)
        .map(|dist| dist.sample(rng))
        .map_err(|_| InvalidRangeError { low, likely, high })
}

/// Analytic mean of the triangular distribution, for deterministic
/// cross-checks.
#[must_use]
#[inline]
pub fn triangular_mean(low: f64, likely: f64, high: f64) -> f64 {
    (low + likely + high) / 3.0
}

/// Correlated success draw.
///
/// `shared_draw` is the platform's per-run latent uniform; `independent_draw`
/// is this candidate's own uniform. With probability `2 * correlation` the
/// shared latent stands in for the candidate's uniform, otherwise the
/// independent draw is used (rescaled back onto the unit interval), and the
/// result is thresholded against `base_probability`.
///
/// The marginal success rate is exactly `base_probability` for every
/// correlation weight; `correlation = 0` is a plain independent Bernoulli
/// trial and at the maximum weight 0.5 all same-platform draws collapse onto
/// the shared latent.
#[must_use]
pub fn sample_correlated_bernoulli(
    base_probability: f64,
    correlation: f64,
    shared_draw: f64,
    independent_draw: f64,
) -> bool {
    let weight = (correlation * 2.0).clamp(0.0, 1.0);
    let uniform = if independent_draw < weight || weight >= 1.0 {
        shared_draw
    } else {
        (independent_draw - weight) / (1.0 - weight)
    };
    uniform < base_probability
}
