//! Dose-production projection for approved vaccines
//!
//! Turns one run's approval months into a global monthly dose curve. Each
//! approved vaccine gets a batch capacity sampled once for the run, scaled
//! by its platform's dose yield and its funding category's production
//! modifiers, then ramped from the pre-approval fraction to full rate.

use rand::Rng;

use crate::config::{PipelineConfig, RampUp};
use crate::error::InvalidRangeError;
use crate::model::{TrialRun, VaccineRecord};
use crate::sampling::sample_triangular;

/// One run's dose production curve and demand-target crossings.
#[derive(Debug, Clone)]
pub struct DoseProjection {
    /// Doses produced globally in each month, `0..=months`
    pub monthly_doses: Vec<f64>,
    /// First month cumulative output reaches each target, smallest first
    pub target_crossings: [Option<u32>; 4],
}

/// Project dose production for one run's approved vaccines.
///
/// `registry` must be the same slice the run was simulated from; vaccines
/// are matched positionally.
pub fn project_doses<R: Rng + ?Sized>(
    config: &PipelineConfig,
    registry: &[VaccineRecord],
    run: &TrialRun,
    rng: &mut R,
) -> Result<DoseProjection, InvalidRangeError> {
    let tables = &config.manufacturing;
    let mut monthly_doses = vec![0.0; config.months as usize + 1];

    for (record, trial) in registry.iter().zip(&run.vaccines) {
        let Some(approval_month) = trial.outcome.approval_month() else {
            continue;
        };
        let capacity = tables.batch_litres[record.platform];
        let litres = sample_triangular(rng, capacity.low, capacity.likely, capacity.high)?;
        // Post-buyout funding decides the production modifiers
        let production = tables.funding_timelines[trial.funding];
        let full_rate =
            litres * tables.doses_per_litre[record.platform] * production.capacity_factor;

        let start = approval_month + production.start_delay;
        for month in start..=config.months {
            let fraction = ramp_fraction(&tables.ramp_up, month - start);
            monthly_doses[month as usize] += full_rate * fraction;
        }
    }

    let mut target_crossings = [None; 4];
    let mut cumulative = 0.0;
    for (month, doses) in monthly_doses.iter().enumerate() {
        cumulative += doses;
        for (slot, target) in target_crossings.iter_mut().zip(&tables.targets) {
            if slot.is_none() && cumulative >= *target {
                *slot = Some(month as u32);
            }
        }
    }

    Ok(DoseProjection {
        monthly_doses,
        target_crossings,
    })
}

/// Fraction of full capacity available `elapsed` months after production
/// starts: `pre_approval` at month zero, rising linearly to 1.
fn ramp_fraction(ramp: &RampUp, elapsed: u32) -> f64 {
    if elapsed >= ramp.duration {
        return 1.0;
    }
    ramp.pre_approval + (1.0 - ramp.pre_approval) * f64::from(elapsed) / f64::from(ramp.duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_fraction_endpoints() {
        let ramp = RampUp {
            pre_approval: 0.2,
            duration: 8,
        };

        assert!((ramp_fraction(&ramp, 0) - 0.2).abs() < 1e-12);
        assert!((ramp_fraction(&ramp, 4) - 0.6).abs() < 1e-12);
        assert_eq!(ramp_fraction(&ramp, 8), 1.0);
        assert_eq!(ramp_fraction(&ramp, 30), 1.0);
    }
}
