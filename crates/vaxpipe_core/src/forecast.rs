//! Monte Carlo forecast over the full vaccine registry
//!
//! Orchestrates the trial runs and folds them into the published output:
//! per-vaccine outcome tallies, the monthly approval distribution and
//! pipeline census, vaccine rankings, first-approval statistics, and the
//! averaged manufacturing projection. Runs execute in seeded batches;
//! batches go wide when the Phase III feedback rule is off and run in
//! order when it is on, since the slowdown decision for each run depends
//! on the runs completed before it.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis;
use crate::config::PipelineConfig;
use crate::error::{InvalidRangeError, ModelError};
use crate::manufacturing::{self, DoseProjection};
use crate::model::{
    FirstApprovalStats, ForecastOutput, ManufacturingSummary, MonthlyRow, PerPhase, Phase,
    PipelineState, RankedVaccine, TargetSummary, TrialLogRow, TrialRun, VaccineOutcome,
    VaccineRecord, VaccineSummary,
};
use crate::stats::{self, RunningStat, standard};
use crate::trial::simulate_trial;

const MAX_BATCH_SIZE: usize = 100;

/// Append-only record of Phase III overruns across completed runs.
///
/// Drives the slowdown feedback: once the overrun fraction passes the
/// configured threshold, every later run samples stretched Phase III
/// durations.
#[derive(Debug, Default)]
pub struct Phase3History {
    flags: Vec<bool>,
    exceeded: u32,
}

impl Phase3History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, exceeded: bool) {
        self.flags.push(exceeded);
        if exceeded {
            self.exceeded += 1;
        }
    }

    /// Runs recorded so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.flags.len()
    }

    /// Fraction of recorded runs that overran the Phase III limit.
    #[must_use]
    pub fn exceeded_fraction(&self) -> f64 {
        if self.flags.is_empty() {
            0.0
        } else {
            f64::from(self.exceeded) / self.flags.len() as f64
        }
    }
}

/// Run the full forecast: `tries` Monte Carlo iterations folded into one
/// output.
///
/// The configuration is validated eagerly; a bad parameter file reports
/// every problem at once before any run starts. Identical inputs and seed
/// produce identical output.
pub fn run_forecast(
    config: &PipelineConfig,
    registry: &[VaccineRecord],
    seed: u64,
) -> Result<ForecastOutput, ModelError> {
    config.validate(registry)?;

    let aggregate = if config.phase3.enabled {
        collect_sequential(config, registry, seed)?
    } else {
        collect_batched(config, registry, seed)?
    };

    Ok(summarize(config, registry, aggregate))
}

/// Batched collection with no cross-run feedback; batches are independent
/// and can run in parallel.
fn collect_batched(
    config: &PipelineConfig,
    registry: &[VaccineRecord],
    seed: u64,
) -> Result<Aggregate, InvalidRangeError> {
    let tries = config.tries as usize;
    let num_batches = tries.div_ceil(MAX_BATCH_SIZE);

    #[cfg(feature = "parallel")]
    let partials: Result<Vec<Aggregate>, InvalidRangeError> = (0..num_batches)
        .into_par_iter()
        .map(|batch| run_batch(config, registry, seed, batch, num_batches, None))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let partials: Result<Vec<Aggregate>, InvalidRangeError> = (0..num_batches)
        .map(|batch| run_batch(config, registry, seed, batch, num_batches, None))
        .collect();

    let mut merged = Aggregate::new(config, registry.len());
    for partial in partials? {
        merged.merge(partial);
    }
    Ok(merged)
}

/// Ordered collection with the Phase III feedback loop threaded through.
/// Batch seeding matches the parallel path, so enabling the policy only
/// changes results once the slowdown actually triggers.
fn collect_sequential(
    config: &PipelineConfig,
    registry: &[VaccineRecord],
    seed: u64,
) -> Result<Aggregate, InvalidRangeError> {
    let tries = config.tries as usize;
    let num_batches = tries.div_ceil(MAX_BATCH_SIZE);
    let mut history = Phase3History::new();

    let mut merged = Aggregate::new(config, registry.len());
    for batch in 0..num_batches {
        let partial = run_batch(config, registry, seed, batch, num_batches, Some(&mut history))?;
        merged.merge(partial);
    }
    Ok(merged)
}

fn run_batch(
    config: &PipelineConfig,
    registry: &[VaccineRecord],
    seed: u64,
    batch: usize,
    num_batches: usize,
    mut history: Option<&mut Phase3History>,
) -> Result<Aggregate, InvalidRangeError> {
    let tries = config.tries as usize;
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(batch as u64));

    let batch_size = if batch == num_batches - 1 {
        tries - batch * MAX_BATCH_SIZE
    } else {
        MAX_BATCH_SIZE
    };

    let mut aggregate = Aggregate::new(config, registry.len());
    for index_in_batch in 0..batch_size {
        let run_seed = rng.next_u64();
        let manufacturing_seed = rng.next_u64();

        let slowdown = history
            .as_deref()
            .is_some_and(|h| h.exceeded_fraction() > config.phase3.slowdown_fract);
        let run = simulate_trial(config, registry, slowdown, run_seed)?;
        if let Some(h) = history.as_deref_mut() {
            h.record(run.phase3_exceeded);
        }

        let projection = if config.do_manufacturing {
            let mut manufacturing_rng = SmallRng::seed_from_u64(manufacturing_seed);
            Some(manufacturing::project_doses(
                config,
                registry,
                &run,
                &mut manufacturing_rng,
            )?)
        } else {
            None
        };

        let try_index = (batch * MAX_BATCH_SIZE + index_in_batch) as u32 + 1;
        aggregate.absorb(config, &run, projection.as_ref(), try_index);
    }
    Ok(aggregate)
}

// ============================================================================
// Folding
// ============================================================================

/// Everything retained from the runs, before the final summary pass.
struct Aggregate {
    runs: u32,
    /// Cumulative-approval samples per month, one entry per run
    approved_samples: Vec<Vec<u32>>,
    /// Summed census occupancy per month and state
    census_sums: Vec<[f64; PipelineState::COUNT]>,
    tallies: Vec<VaccineTally>,
    /// First-approval month of each run that had one
    first_months: Vec<u32>,
    buyout_total: u64,
    doses: Option<DoseTally>,
    trial_log: Vec<TrialLogRow>,
}

#[derive(Clone)]
struct VaccineTally {
    approvals_by_month: Vec<u32>,
    approval_months: Vec<u32>,
    approved: u32,
    failed: u32,
    failed_by_phase: PerPhase<u32>,
    incomplete: u32,
}

struct DoseTally {
    monthly_sum: Vec<f64>,
    crossed: [u32; 4],
    crossing_month_sum: [f64; 4],
}

impl Aggregate {
    fn new(config: &PipelineConfig, vaccine_count: usize) -> Self {
        let months = config.months as usize;
        Self {
            runs: 0,
            approved_samples: vec![Vec::new(); months + 1],
            census_sums: vec![[0.0; PipelineState::COUNT]; months + 1],
            tallies: vec![
                VaccineTally {
                    approvals_by_month: vec![0; months + 1],
                    approval_months: Vec::new(),
                    approved: 0,
                    failed: 0,
                    failed_by_phase: PerPhase::splat(0),
                    incomplete: 0,
                };
                vaccine_count
            ],
            first_months: Vec::new(),
            buyout_total: 0,
            doses: config.do_manufacturing.then(|| DoseTally {
                monthly_sum: vec![0.0; months + 1],
                crossed: [0; 4],
                crossing_month_sum: [0.0; 4],
            }),
            trial_log: Vec::new(),
        }
    }

    fn absorb(
        &mut self,
        config: &PipelineConfig,
        run: &TrialRun,
        projection: Option<&DoseProjection>,
        try_index: u32,
    ) {
        self.runs += 1;

        let mut cumulative = 0;
        for (month, samples) in self.approved_samples.iter_mut().enumerate() {
            cumulative += run.approvals_by_month[month];
            samples.push(cumulative);
        }

        for (month, sums) in self.census_sums.iter_mut().enumerate() {
            for vaccine in &run.vaccines {
                for state in PipelineState::ALL {
                    if vaccine.counts_in(state, month as u32) {
                        sums[state.index()] += 1.0;
                    }
                }
            }
        }

        for (tally, vaccine) in self.tallies.iter_mut().zip(&run.vaccines) {
            match vaccine.outcome {
                VaccineOutcome::Approved { month } => {
                    tally.approved += 1;
                    tally.approvals_by_month[month as usize] += 1;
                    tally.approval_months.push(month);
                }
                VaccineOutcome::Failed { phase, .. } => {
                    tally.failed += 1;
                    tally.failed_by_phase[phase] += 1;
                }
                VaccineOutcome::Incomplete => tally.incomplete += 1,
            }
        }

        if let Some(month) = run.first_approval_month() {
            self.first_months.push(month);
        }
        self.buyout_total += u64::from(run.buyouts);

        if let (Some(doses), Some(projection)) = (self.doses.as_mut(), projection) {
            for (sum, value) in doses.monthly_sum.iter_mut().zip(&projection.monthly_doses) {
                *sum += value;
            }
            for (i, crossing) in projection.target_crossings.iter().enumerate() {
                if let Some(month) = crossing {
                    doses.crossed[i] += 1;
                    doses.crossing_month_sum[i] += f64::from(*month);
                }
            }
        }

        if config.collect_trials {
            for vaccine in &run.vaccines {
                // The log reports successful completions only, so the end
                // recorded for the phase the vaccine failed out of is blanked.
                let mut phase_end = vaccine.phase_end;
                if let Some(phase) = vaccine.outcome.failed_phase() {
                    phase_end[phase] = None;
                }
                let any_clinical = Phase::ALL[1..].iter().any(|&p| phase_end[p].is_some());
                if !any_clinical {
                    continue;
                }
                self.trial_log.push(TrialLogRow {
                    try_index,
                    vaccine: vaccine.id,
                    phase_end,
                });
            }
        }
    }

    fn merge(&mut self, other: Aggregate) {
        self.runs += other.runs;
        for (into, from) in self.approved_samples.iter_mut().zip(other.approved_samples) {
            into.extend(from);
        }
        for (into, from) in self.census_sums.iter_mut().zip(other.census_sums) {
            for (a, b) in into.iter_mut().zip(from) {
                *a += b;
            }
        }
        for (into, from) in self.tallies.iter_mut().zip(other.tallies) {
            for (a, b) in into
                .approvals_by_month
                .iter_mut()
                .zip(from.approvals_by_month)
            {
                *a += b;
            }
            into.approval_months.extend(from.approval_months);
            into.approved += from.approved;
            into.failed += from.failed;
            for phase in Phase::ALL {
                into.failed_by_phase[phase] += from.failed_by_phase[phase];
            }
            into.incomplete += from.incomplete;
        }
        self.first_months.extend(other.first_months);
        self.buyout_total += other.buyout_total;
        if let (Some(into), Some(from)) = (self.doses.as_mut(), other.doses) {
            for (a, b) in into.monthly_sum.iter_mut().zip(from.monthly_sum) {
                *a += b;
            }
            for i in 0..4 {
                into.crossed[i] += from.crossed[i];
                into.crossing_month_sum[i] += from.crossing_month_sum[i];
            }
        }
        self.trial_log.extend(other.trial_log);
    }
}

// ============================================================================
// Summary
// ============================================================================

fn summarize(
    config: &PipelineConfig,
    registry: &[VaccineRecord],
    mut aggregate: Aggregate,
) -> ForecastOutput {
    let tries = f64::from(config.tries);

    let vaccines: Vec<VaccineSummary> = registry
        .iter()
        .zip(aggregate.tallies)
        .map(|(record, mut tally)| {
            tally.approval_months.sort_unstable();
            let mean_approval_month = if tally.approval_months.is_empty() {
                None
            } else {
                let sum: u64 = tally.approval_months.iter().map(|&m| u64::from(m)).sum();
                Some(sum as f64 / tally.approval_months.len() as f64)
            };
            VaccineSummary {
                id: record.id,
                name: record.name.clone(),
                platform: record.platform,
                funding: record.funding,
                approvals_by_month: tally.approvals_by_month,
                approved: tally.approved,
                failed: tally.failed,
                failed_by_phase: tally.failed_by_phase,
                incomplete: tally.incomplete,
                approval_probability: f64::from(tally.approved) / tries,
                median_approval_month: stats::median_sorted(&tally.approval_months)
                    .map(|m| (m + 0.5) as u32),
                mean_approval_month,
            }
        })
        .collect();

    let mut monthly = Vec::new();
    let mut prob_at_least_one = Vec::with_capacity(config.months as usize + 1);
    for month in 0..=config.months {
        let samples = &mut aggregate.approved_samples[month as usize];
        samples.sort_unstable();

        let at_least: [f64; 5] = std::array::from_fn(|k| {
            let threshold = k as u32 + 1;
            samples.iter().filter(|&&count| count >= threshold).count() as f64 / tries
        });
        prob_at_least_one.push(at_least[0]);

        if month >= config.months_table_skip {
            let mut stat = RunningStat::new();
            for &count in samples.iter() {
                stat.push(f64::from(count));
            }
            let states: [f64; PipelineState::COUNT] =
                std::array::from_fn(|state| aggregate.census_sums[month as usize][state] / tries);
            monthly.push(MonthlyRow {
                month,
                mean_approved: stat.mean(),
                dev_approved: stat.deviation(),
                percentiles_approved: [
                    stats::percentile_sorted(samples, standard::P5),
                    stats::percentile_sorted(samples, standard::P50),
                    stats::percentile_sorted(samples, standard::P95),
                ],
                at_least,
                states,
            });
        }
    }

    let mut order: Vec<usize> = (0..vaccines.len()).collect();
    order.sort_by(|&a, &b| {
        vaccines[b]
            .approval_probability
            .partial_cmp(&vaccines[a].approval_probability)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                compare_medians(
                    vaccines[a].median_approval_month,
                    vaccines[b].median_approval_month,
                )
            })
    });
    let ranked_row = |rank: usize, index: usize| -> RankedVaccine {
        RankedVaccine {
            rank,
            id: vaccines[index].id,
            name: vaccines[index].name.clone(),
            approval_probability: vaccines[index].approval_probability,
            median_approval_month: vaccines[index].median_approval_month,
        }
    };
    let ranking: Vec<RankedVaccine> = order
        .iter()
        .enumerate()
        .take(config.rank_table_max)
        .map(|(i, &index)| ranked_row(i + 1, index))
        .collect();
    let best: Vec<RankedVaccine> = order
        .iter()
        .enumerate()
        .take(config.best_vaccines_max)
        .map(|(i, &index)| ranked_row(i + 1, index))
        .collect();

    let first_approval = {
        let mut stat = RunningStat::new();
        for &month in &aggregate.first_months {
            stat.push(f64::from(month));
        }
        FirstApprovalStats {
            mean_month: (stat.count() > 0).then(|| stat.mean()),
            dev_month: (stat.count() > 0).then(|| stat.deviation()),
            none_fraction: (tries - aggregate.first_months.len() as f64) / tries,
        }
    };

    let manufacturing = aggregate.doses.map(|doses| ManufacturingSummary {
        monthly_doses: doses.monthly_sum.iter().map(|sum| sum / tries).collect(),
        targets: std::array::from_fn(|i| TargetSummary {
            target_doses: config.manufacturing.targets[i],
            crossed_fraction: f64::from(doses.crossed[i]) / tries,
            mean_crossing_month: (doses.crossed[i] > 0)
                .then(|| doses.crossing_month_sum[i] / f64::from(doses.crossed[i])),
        }),
    });

    let cross_checks = if config.cross_check {
        analysis::cross_check(config, registry)
    } else {
        Vec::new()
    };

    ForecastOutput {
        tries: config.tries,
        months: config.months,
        vaccines,
        monthly,
        prob_at_least_one,
        ranking,
        best,
        first_approval,
        mean_buyouts: aggregate.buyout_total as f64 / tries,
        manufacturing,
        cross_checks,
        trial_log: aggregate.trial_log,
    }
}

/// Earlier medians rank higher; vaccines with no approvals sort last.
fn compare_medians(a: Option<u32>, b: Option<u32>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    }
}
