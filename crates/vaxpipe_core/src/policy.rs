//! Funding-policy arithmetic for chaining phases
//!
//! A funding category's overlap tag decides how tightly its phases pack:
//! mid-pipeline phases can run concurrently (overlap) or sit idle between
//! each other (gap), while Phase I and Approval start a fixed offset after
//! the preceding phase ends. The buyout rule also lives here.

use rand::Rng;

use crate::config::PipelineConfig;
use crate::model::{FundingCategory, Phase};

/// Month a phase begins, given the start month and duration of the phase
/// before it in the same run.
///
/// Pre-Clinical is never chained into; it is listed for completeness and
/// behaves as strictly consecutive.
#[must_use]
pub fn phase_start_month(
    config: &PipelineConfig,
    phase: Phase,
    funding: FundingCategory,
    prev_start: u32,
    prev_duration: u32,
) -> u32 {
    let tag = config.funding_overlap[funding];
    let offset = match phase {
        Phase::PreClinical => f64::from(prev_duration),
        Phase::Phase1 => f64::from(prev_duration) + config.overlap.phase1_start.get(tag),
        Phase::Phase2 | Phase::Phase3 => {
            let overlap = config.overlap.phase_overlap.get(tag);
            let gap = config.overlap.phase_gap.get(tag);
            (f64::from(prev_duration) - overlap + gap).max(0.0)
        }
        Phase::Approval => f64::from(prev_duration) + config.overlap.approval_start.get(tag),
    };
    prev_start + (offset + 0.5) as u32
}

/// Roll the buyout rule after a Phase II success.
///
/// A Bio-tech/Academic vaccine that clears Phase II is acquired with
/// probability `buyout.fract` and runs its remaining phases under Large
/// Pharma funding. Returns the funding to use from here on and whether an
/// acquisition happened.
pub fn roll_buyout<R: Rng + ?Sized>(
    config: &PipelineConfig,
    funding: FundingCategory,
    rng: &mut R,
) -> (FundingCategory, bool) {
    if config.buyout.enabled
        && funding == FundingCategory::BiotechAcademic
        && rng.random::<f64>() < config.buyout.fract
    {
        (FundingCategory::LargePharma, true)
    } else {
        (funding, false)
    }
}
