//! Single-run trial simulator
//!
//! Walks every registry vaccine through its remaining pipeline phases for
//! one Monte Carlo iteration. Each phase attempt samples a duration and a
//! correlated success draw; failures stop the vaccine where it stands, and
//! an Approval success must still clear the monthly approval limiter.

use rand::Rng;

use crate::config::PipelineConfig;
use crate::error::InvalidRangeError;
use crate::model::{PerPhase, Phase, TrialRun, VaccineOutcome, VaccineRecord, VaccineTrial};
use crate::policy::{phase_start_month, roll_buyout};
use crate::sampling::sample_correlated_bernoulli;
use crate::timeline::{sample_duration, success_probability};
use crate::trial_state::TrialState;

/// Simulate one Monte Carlo iteration over the whole registry.
///
/// Vaccines are visited in registry order; the approval limiter hands out
/// completion slots in that same order. `slowdown` applies the Phase III
/// slowdown policy to every Phase III duration sampled in this run.
pub fn simulate_trial(
    config: &PipelineConfig,
    registry: &[VaccineRecord],
    slowdown: bool,
    seed: u64,
) -> Result<TrialRun, InvalidRangeError> {
    let mut state = TrialState::from_config(config, slowdown, seed);
    let mut vaccines = Vec::with_capacity(registry.len());
    let mut approvals_by_month = vec![0u32; config.months as usize + 1];
    let mut buyouts = 0;
    let mut phase3_exceeded = false;

    for record in registry {
        let trial = simulate_vaccine(config, &mut state, record)?;
        if let Some(month) = trial.outcome.approval_month() {
            approvals_by_month[month as usize] += 1;
        }
        if trial.bought_out {
            buyouts += 1;
        }
        if phase3_overran(config, &trial) {
            phase3_exceeded = true;
        }
        vaccines.push(trial);
    }

    Ok(TrialRun {
        vaccines,
        approvals_by_month,
        buyouts,
        phase3_exceeded,
    })
}

/// Whether this vaccine's Phase III span overran the slowdown limit.
/// Failed attempts count: a slow failure signals a crowded phase as much
/// as a slow success does.
fn phase3_overran(config: &PipelineConfig, trial: &VaccineTrial) -> bool {
    match (
        trial.phase_start[Phase::Phase3],
        trial.phase_end[Phase::Phase3],
    ) {
        (Some(start), Some(end)) => end - start > config.phase3.limit,
        _ => false,
    }
}

fn simulate_vaccine(
    config: &PipelineConfig,
    state: &mut TrialState,
    record: &VaccineRecord,
) -> Result<VaccineTrial, InvalidRangeError> {
    let mut funding = record.funding;
    let mut bought_out = false;
    let mut phase_start = PerPhase::splat(None);
    let mut phase_end = PerPhase::splat(None);

    // A recorded phase start still in the future delays the clock until
    // that calendar month
    let mut start = 0u32;
    if config.do_ignore_future_dates
        && let Some(date) = record.phase_start
    {
        let offset = config.month_offset(date);
        if offset > 0 {
            start = offset as u32;
        }
    }

    let mut phase = record.phase;
    let outcome = loop {
        if start > config.months {
            break VaccineOutcome::Incomplete;
        }
        phase_start[phase] = Some(start);

        let duration = sample_duration(
            config,
            phase,
            record.platform,
            funding,
            state.slowdown,
            &mut state.rng,
        )?;
        let end = start + duration;
        if end > config.months {
            // Resolves past the horizon; the phase stays open
            break VaccineOutcome::Incomplete;
        }

        let probability = success_probability(config, phase, record.platform, funding);
        let independent: f64 = state.rng.random();
        let succeeded = sample_correlated_bernoulli(
            probability,
            config.correlation_for(record.platform),
            state.platform_latents[record.platform],
            independent,
        );
        if !succeeded {
            phase_end[phase] = Some(end);
            break VaccineOutcome::Failed { phase, month: end };
        }

        match phase.next() {
            None => {
                // Approval cleared; the limiter assigns the completion month
                match state.limiter.schedule(end) {
                    Some(granted) => {
                        phase_end[phase] = Some(granted);
                        break VaccineOutcome::Approved { month: granted };
                    }
                    None => break VaccineOutcome::Incomplete,
                }
            }
            Some(next) => {
                phase_end[phase] = Some(end);
                if phase == Phase::Phase2 {
                    let (new_funding, bought) = roll_buyout(config, funding, &mut state.rng);
                    funding = new_funding;
                    bought_out |= bought;
                }
                // The buyout lands before the chain arithmetic so the new
                // category's overlap schedule governs the next phase
                let next_start = phase_start_month(config, next, funding, start, duration);
                phase = next;
                start = next_start;
            }
        }
    };

    Ok(VaccineTrial {
        id: record.id,
        outcome,
        phase_start,
        phase_end,
        funding,
        bought_out,
    })
}
