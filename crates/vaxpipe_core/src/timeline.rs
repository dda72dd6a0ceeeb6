//! Per-phase success and duration arithmetic
//!
//! Ties the configuration tables together into the two numbers each phase
//! attempt needs: a success probability and a duration in whole months.
//! The Approval phase reads its own regulator knobs and ignores the
//! platform and funding tables.

use rand::Rng;

use crate::config::PipelineConfig;
use crate::error::InvalidRangeError;
use crate::model::{FundingCategory, Phase, Platform};
use crate::sampling::{sample_triangular, triangular_mean};

/// Probability that one attempt at `phase` succeeds, clamped to [0, 1].
#[must_use]
pub fn success_probability(
    config: &PipelineConfig,
    phase: Phase,
    platform: Platform,
    funding: FundingCategory,
) -> f64 {
    let (_, pos_multiplier) = config.option_multipliers();
    let raw = match phase {
        Phase::Approval => config.phase_success[phase] * config.approval_pos,
        _ => {
            config.phase_success[phase]
                * config.funding_pos[funding]
                * config.platform_pos[platform]
                * config.funding_tech_failure[funding]
        }
    };
    (raw * pos_multiplier).clamp(0.0, 1.0)
}

/// Combined duration multiplier for `phase` before any Phase III slowdown.
#[must_use]
fn duration_multiplier(
    config: &PipelineConfig,
    phase: Phase,
    platform: Platform,
    funding: FundingCategory,
) -> f64 {
    let (timeline_multiplier, _) = config.option_multipliers();
    let table_factor = match phase {
        Phase::Approval => config.approval_timeline,
        _ => {
            config
                .timeline_factor_values
                .get(config.platform_timeline[platform])
                * config
                    .timeline_factor_values
                    .get(config.funding_timeline[funding])
        }
    };
    table_factor * timeline_multiplier
}

/// Sample the duration of one attempt at `phase`, in whole months.
///
/// `slowdown` stretches Phase III durations by the configured factor and
/// has no effect on other phases.
pub fn sample_duration<R: Rng + ?Sized>(
    config: &PipelineConfig,
    phase: Phase,
    platform: Platform,
    funding: FundingCategory,
    slowdown: bool,
    rng: &mut R,
) -> Result<u32, InvalidRangeError> {
    let raw = sample_triangular(
        rng,
        config.best_timeline[phase],
        config.likely_timeline[phase],
        config.worst_timeline[phase],
    )?;
    let mut months = raw * duration_multiplier(config, phase, platform, funding);
    if slowdown && phase == Phase::Phase3 {
        months *= config.phase3.slowdown_factor;
    }
    Ok(round_months(months))
}

/// Expected duration of `phase` in whole months, using the triangular mean
/// in place of a draw. Used by the deterministic cross-check.
#[must_use]
pub fn expected_duration(
    config: &PipelineConfig,
    phase: Phase,
    platform: Platform,
    funding: FundingCategory,
) -> u32 {
    let mean = triangular_mean(
        config.best_timeline[phase],
        config.likely_timeline[phase],
        config.worst_timeline[phase],
    );
    round_months(mean * duration_multiplier(config, phase, platform, funding))
}

/// Half-up rounding to whole months.
#[must_use]
#[inline]
fn round_months(months: f64) -> u32 {
    (months + 0.5) as u32
}
