//! Trial-run and forecast result records
//!
//! A [`TrialRun`] is the output of one stochastic iteration; it is folded
//! into the aggregate [`ForecastOutput`] and then discarded. Everything here
//! derives serde so the reporting layer can serialize records unchanged.

use serde::{Deserialize, Serialize};

use super::funding::FundingCategory;
use super::phase::{PerPhase, Phase, PipelineState};
use super::platform::Platform;
use super::vaccine::VaccineId;

/// Terminal outcome of one vaccine in one trial run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VaccineOutcome {
    /// Completed the Approval phase at `month`
    Approved { month: u32 },
    /// Failed out of `phase` at `month`
    Failed { phase: Phase, month: u32 },
    /// Still in the pipeline when the run horizon elapsed
    Incomplete,
}

impl VaccineOutcome {
    #[must_use]
    #[inline]
    pub fn is_approved(self) -> bool {
        matches!(self, VaccineOutcome::Approved { .. })
    }

    #[must_use]
    pub fn approval_month(self) -> Option<u32> {
        match self {
            VaccineOutcome::Approved { month } => Some(month),
            _ => None,
        }
    }

    #[must_use]
    pub fn failed_phase(self) -> Option<Phase> {
        match self {
            VaccineOutcome::Failed { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

/// One vaccine's realized schedule within a single trial run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineTrial {
    pub id: VaccineId,
    pub outcome: VaccineOutcome,
    /// Month each phase was entered, for phases reached
    pub phase_start: PerPhase<Option<u32>>,
    /// Month each reached phase resolved, by success or by failure; `None`
    /// for a phase still open at the horizon
    pub phase_end: PerPhase<Option<u32>>,
    /// Funding category at the end of the run (differs from the registry
    /// record after a buyout)
    pub funding: FundingCategory,
    pub bought_out: bool,
}

impl VaccineTrial {
    /// Whether the vaccine occupies `phase` at `month`.
    ///
    /// A phase is occupied from its start month through its completion month
    /// inclusive (adjacent phases share the boundary month). A failed
    /// candidate occupies nothing from its failure month onward; a phase
    /// still unresolved at the horizon is occupied through the horizon.
    #[must_use]
    pub fn occupies(&self, phase: Phase, month: u32) -> bool {
        if let VaccineOutcome::Failed {
            month: failed_month,
            ..
        } = self.outcome
            && month >= failed_month
        {
            return false;
        }
        let Some(start) = self.phase_start[phase] else {
            return false;
        };
        if month < start {
            return false;
        }
        match self.phase_end[phase] {
            Some(end) => month <= end,
            None => true,
        }
    }

    /// Whether the vaccine counts in `state` for the month-`month` census.
    ///
    /// Census rows are not exclusive: a candidate in overlapped Phase I and
    /// Phase II counts in both single-phase rows and in the combined
    /// Phase I/II row.
    #[must_use]
    pub fn counts_in(&self, state: PipelineState, month: u32) -> bool {
        match state {
            PipelineState::PreClinical => self.occupies(Phase::PreClinical, month),
            PipelineState::Phase1 => self.occupies(Phase::Phase1, month),
            PipelineState::Phase1And2 => {
                self.occupies(Phase::Phase1, month)
                    && self.occupies(Phase::Phase2, month)
                    && !self.occupies(Phase::Phase3, month)
            }
            PipelineState::Phase2 => self.occupies(Phase::Phase2, month),
            PipelineState::Phase2And3 => {
                !self.occupies(Phase::Phase1, month)
                    && self.occupies(Phase::Phase2, month)
                    && self.occupies(Phase::Phase3, month)
            }
            PipelineState::Phase3 => self.occupies(Phase::Phase3, month),
            PipelineState::Approval => self.occupies(Phase::Approval, month),
            PipelineState::Approved => self
                .outcome
                .approval_month()
                .is_some_and(|approved| month >= approved),
            PipelineState::Failed => {
                matches!(self.outcome, VaccineOutcome::Failed { month: m, .. } if month >= m)
            }
        }
    }
}

/// The full set of vaccine schedules for one Monte Carlo iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRun {
    /// Per-vaccine results in registry order
    pub vaccines: Vec<VaccineTrial>,
    /// Count of vaccines completing Approval at each month, 0..=months
    pub approvals_by_month: Vec<u32>,
    /// Buyout events in this run
    pub buyouts: u32,
    /// Whether any vaccine spent more than the configured Phase III limit
    pub phase3_exceeded: bool,
}

impl TrialRun {
    /// Month of the first approval in this run, if any.
    #[must_use]
    pub fn first_approval_month(&self) -> Option<u32> {
        self.vaccines
            .iter()
            .filter_map(|v| v.outcome.approval_month())
            .min()
    }

    /// Cumulative approvals by the end of `month`.
    #[must_use]
    pub fn approved_by(&self, month: u32) -> u32 {
        self.approvals_by_month
            .iter()
            .take(month as usize + 1)
            .sum()
    }
}

/// Per-vaccine aggregate over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineSummary {
    pub id: VaccineId,
    pub name: String,
    pub platform: Platform,
    pub funding: FundingCategory,
    /// Runs approved at each month, 0..=months
    pub approvals_by_month: Vec<u32>,
    pub approved: u32,
    pub failed: u32,
    pub failed_by_phase: PerPhase<u32>,
    pub incomplete: u32,
    /// approved / tries
    pub approval_probability: f64,
    pub median_approval_month: Option<u32>,
    pub mean_approval_month: Option<f64>,
}

/// One row of the system-wide monthly summary table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub month: u32,
    /// Mean cumulative approvals by this month
    pub mean_approved: f64,
    /// Sample deviation of cumulative approvals
    pub dev_approved: f64,
    /// P5 / P50 / P95 of cumulative approvals across runs
    pub percentiles_approved: [f64; 3],
    /// P(at least k approvals by this month) for k = 1..=5
    pub at_least: [f64; 5],
    /// Mean number of vaccines in each census state this month
    pub states: [f64; PipelineState::COUNT],
}

/// One entry of the approval-probability ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedVaccine {
    pub rank: usize,
    pub id: VaccineId,
    pub name: String,
    pub approval_probability: f64,
    pub median_approval_month: Option<u32>,
}

/// First-approval timing across runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FirstApprovalStats {
    /// Mean first-approval month over runs with at least one approval
    pub mean_month: Option<f64>,
    pub dev_month: Option<f64>,
    /// Fraction of runs with no approval at all
    pub none_fraction: f64,
}

/// Aggregate crossing data for one demand threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetSummary {
    pub target_doses: f64,
    /// Fraction of runs where cumulative output reached the target within
    /// the horizon
    pub crossed_fraction: f64,
    /// Mean crossing month over the runs that crossed
    pub mean_crossing_month: Option<f64>,
}

/// Averaged manufacturing projection over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManufacturingSummary {
    /// Mean global dose output per month, 0..=months
    pub monthly_doses: Vec<f64>,
    pub targets: [TargetSummary; 4],
}

/// One row of the optional per-trial log (`collect_trials`)
///
/// Rows are kept only for vaccines that passed at least one clinical phase
/// in that run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialLogRow {
    /// 1-based run index
    pub try_index: u32,
    pub vaccine: VaccineId,
    /// Month each phase was passed; `None` where the vaccine failed out or
    /// never got that far
    pub phase_end: PerPhase<Option<u32>>,
}

/// Deterministic expectation for one vaccine (`cross_check`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossCheck {
    pub id: VaccineId,
    pub name: String,
    /// Expected approval month chaining analytic triangular means
    pub expected_month: f64,
    /// Product of the per-phase success probabilities
    pub approval_probability: f64,
}

/// Complete aggregate output of a forecast batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub tries: u32,
    pub months: u32,
    pub vaccines: Vec<VaccineSummary>,
    /// Rows from `months_table_skip` to `months` inclusive
    pub monthly: Vec<MonthlyRow>,
    /// P(at least one approval by month) for every month 0..=months; kept
    /// at full range so benchmark months can be located below the table skip
    pub prob_at_least_one: Vec<f64>,
    pub ranking: Vec<RankedVaccine>,
    pub best: Vec<RankedVaccine>,
    pub first_approval: FirstApprovalStats,
    pub mean_buyouts: f64,
    pub manufacturing: Option<ManufacturingSummary>,
    /// Empty unless the cross-check toggle is set
    pub cross_checks: Vec<CrossCheck>,
    /// Empty unless `collect_trials` is set
    pub trial_log: Vec<TrialLogRow>,
}

impl ForecastOutput {
    /// Aggregate record for a vaccine by id.
    #[must_use]
    pub fn vaccine(&self, id: VaccineId) -> Option<&VaccineSummary> {
        self.vaccines.iter().find(|v| v.id == id)
    }

    /// Approval probability for a vaccine by id.
    #[must_use]
    pub fn approval_probability(&self, id: VaccineId) -> Option<f64> {
        self.vaccine(id).map(|v| v.approval_probability)
    }

    /// First month at which P(at least one approval) reaches `probability`.
    #[must_use]
    pub fn month_reaching_probability(&self, probability: f64) -> Option<u32> {
        self.prob_at_least_one
            .iter()
            .position(|p| *p >= probability)
            .map(|m| m as u32)
    }

    /// Mean cumulative approvals at the run horizon.
    #[must_use]
    pub fn mean_approved_at_horizon(&self) -> f64 {
        self.monthly.last().map_or(0.0, |row| row.mean_approved)
    }

    /// P(at least one approval) at the run horizon.
    #[must_use]
    pub fn final_approval_probability(&self) -> f64 {
        self.prob_at_least_one.last().copied().unwrap_or(0.0)
    }
}
