//! Deterministic companion calculation to the stochastic forecast
//!
//! Replaces every random draw with its expectation: triangular durations
//! become their means and success draws become straight probability
//! products. Useful for spotting gross parameter errors, since a badly
//! scaled table shows up here without Monte Carlo noise on top.

use crate::config::PipelineConfig;
use crate::model::{CrossCheck, VaccineRecord};
use crate::policy::phase_start_month;
use crate::timeline::{expected_duration, success_probability};

/// Expected completion month and approval probability for every vaccine.
///
/// The buyout rule and the approval limiter are stochastic across vaccines
/// and are not modelled here; funding stays as registered.
#[must_use]
pub fn cross_check(config: &PipelineConfig, registry: &[VaccineRecord]) -> Vec<CrossCheck> {
    registry
        .iter()
        .map(|record| {
            let mut probability = 1.0;
            let mut start = 0u32;
            let mut end = 0u32;

            let mut phase = Some(record.phase);
            while let Some(current) = phase {
                probability *=
                    success_probability(config, current, record.platform, record.funding);
                let duration = expected_duration(config, current, record.platform, record.funding);
                end = start + duration;
                phase = current.next();
                if let Some(next) = phase {
                    start = phase_start_month(config, next, record.funding, start, duration);
                }
            }

            CrossCheck {
                id: record.id,
                name: record.name.clone(),
                expected_month: f64::from(end),
                approval_probability: probability,
            }
        })
        .collect()
}
