//! Model configuration
//!
//! The main configuration type is `PipelineConfig`, which carries every
//! table the simulation reads: run shape, per-phase probabilities and
//! duration bounds, platform and funding tables, tag-to-number mappings,
//! policy knobs and the manufacturing sub-tables. Every field has a
//! baseline default so a partial parameter file still deserializes; eager
//! validation reports every out-of-range value before the first run.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigProblems, InvalidConfigurationError};
use crate::model::{
    CorrelationTag, CorrelationValues, OverlapTag, OverlapValues, PerFunding, PerPhase,
    PerPlatform, Platform, TimelineFactors, TimelineTag, VaccineRecord,
};

/// Global scenario selector.
///
/// Optimistic and Pessimistic scale every duration and success probability
/// by the configured `timeline_factor` / `pos_factor` scalars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioOption {
    Pessimistic,
    #[default]
    Normal,
    Optimistic,
}

impl ScenarioOption {
    /// Returns the (duration, success) multipliers for this scenario.
    #[must_use]
    pub fn multipliers(self, timeline_factor: f64, pos_factor: f64) -> (f64, f64) {
        match self {
            ScenarioOption::Normal => (1.0, 1.0),
            ScenarioOption::Optimistic => (1.0 / timeline_factor, pos_factor),
            ScenarioOption::Pessimistic => (timeline_factor, 1.0 / pos_factor),
        }
    }
}

/// The four per-overlap-tag tables used when chaining phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlapTables {
    /// Months between Pre-Clinical completion and Phase I start
    pub phase1_start: OverlapValues,
    /// Months between Phase III completion and Approval start
    pub approval_start: OverlapValues,
    /// Months of concurrency between adjacent mid-pipeline phases
    pub phase_overlap: OverlapValues,
    /// Months of idle time between adjacent mid-pipeline phases
    pub phase_gap: OverlapValues,
}

impl Default for OverlapTables {
    fn default() -> Self {
        Self {
            phase1_start: OverlapValues {
                simultaneous: 0.0,
                mostly_overlapped: 0.0,
                overlap_early: 1.0,
                overlap_late: 1.0,
                consecutive: 1.0,
                gapped: 2.0,
            },
            approval_start: OverlapValues {
                simultaneous: 0.0,
                mostly_overlapped: 0.0,
                overlap_early: 0.0,
                overlap_late: 0.0,
                consecutive: 1.0,
                gapped: 2.0,
            },
            phase_overlap: OverlapValues {
                simultaneous: 8.0,
                mostly_overlapped: 5.0,
                overlap_early: 3.0,
                overlap_late: 3.0,
                consecutive: 0.0,
                gapped: 0.0,
            },
            phase_gap: OverlapValues {
                simultaneous: 0.0,
                mostly_overlapped: 0.0,
                overlap_early: 1.0,
                overlap_late: 1.0,
                consecutive: 1.0,
                gapped: 6.0,
            },
        }
    }
}

/// The Phase III slowdown feedback rule.
///
/// When the fraction of completed runs that overran `limit` months in
/// Phase III exceeds `slowdown_fract`, later runs sample Phase III
/// durations stretched by `slowdown_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phase3Policy {
    pub enabled: bool,
    /// Phase III duration in months counted as an overrun
    pub limit: u32,
    pub slowdown_fract: f64,
    pub slowdown_factor: f64,
}

impl Default for Phase3Policy {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: 24,
            slowdown_fract: 0.25,
            slowdown_factor: 1.5,
        }
    }
}

/// The Bio-tech/Academic buyout rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyoutPolicy {
    pub enabled: bool,
    /// Probability of acquisition after a Phase II success
    pub fract: f64,
}

impl Default for BuyoutPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            fract: 0.3,
        }
    }
}

/// Production ramp after approval: `pre_approval` of full capacity is
/// available at the approval month, rising linearly to full capacity over
/// `duration` months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampUp {
    pub pre_approval: f64,
    pub duration: u32,
}

impl Default for RampUp {
    fn default() -> Self {
        Self {
            pre_approval: 0.1,
            duration: 6,
        }
    }
}

/// Monthly batch volume in litres, as triangular bounds from pessimistic
/// (`low`) to optimistic (`high`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchCapacity {
    pub low: f64,
    pub likely: f64,
    pub high: f64,
}

/// Per-funding production modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingProduction {
    /// Multiplier on the sampled dose rate
    pub capacity_factor: f64,
    /// Months between approval and the first production month
    pub start_delay: u32,
}

/// Manufacturing projection tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManufacturingConfig {
    pub ramp_up: RampUp,
    pub batch_litres: PerPlatform<BatchCapacity>,
    pub doses_per_litre: PerPlatform<f64>,
    pub funding_timelines: PerFunding<FundingProduction>,
    /// Cumulative global dose thresholds, smallest first
    pub targets: [f64; 4],
}

impl Default for ManufacturingConfig {
    fn default() -> Self {
        Self {
            ramp_up: RampUp::default(),
            batch_litres: PerPlatform([
                // DNA
                BatchCapacity {
                    low: 500.0,
                    likely: 1500.0,
                    high: 3000.0,
                },
                // Inactivated
                BatchCapacity {
                    low: 400.0,
                    likely: 1200.0,
                    high: 2500.0,
                },
                // Live Attenuated
                BatchCapacity {
                    low: 400.0,
                    likely: 1000.0,
                    high: 2000.0,
                },
                // Non-Replicating Vector
                BatchCapacity {
                    low: 500.0,
                    likely: 1600.0,
                    high: 3200.0,
                },
                // Protein Subunit
                BatchCapacity {
                    low: 600.0,
                    likely: 1800.0,
                    high: 3600.0,
                },
                // Replicating Vector
                BatchCapacity {
                    low: 400.0,
                    likely: 1200.0,
                    high: 2400.0,
                },
                // RNA
                BatchCapacity {
                    low: 800.0,
                    likely: 2000.0,
                    high: 4000.0,
                },
                // VLP
                BatchCapacity {
                    low: 400.0,
                    likely: 1200.0,
                    high: 2400.0,
                },
                // Other
                BatchCapacity {
                    low: 300.0,
                    likely: 900.0,
                    high: 1800.0,
                },
            ]),
            doses_per_litre: PerPlatform([
                4000.0, 2000.0, 3000.0, 2500.0, 3000.0, 2500.0, 10000.0, 3000.0, 2000.0,
            ]),
            funding_timelines: PerFunding([
                FundingProduction {
                    capacity_factor: 1.0,
                    start_delay: 1,
                },
                FundingProduction {
                    capacity_factor: 0.9,
                    start_delay: 2,
                },
                FundingProduction {
                    capacity_factor: 1.2,
                    start_delay: 0,
                },
                FundingProduction {
                    capacity_factor: 0.8,
                    start_delay: 2,
                },
                FundingProduction {
                    capacity_factor: 0.6,
                    start_delay: 4,
                },
            ]),
            targets: [
                250_000_000.0,
                500_000_000.0,
                1_000_000_000.0,
                2_000_000_000.0,
            ],
        }
    }
}

/// Complete model configuration
///
/// Deserializes from the parameter file; any missing field takes its
/// baseline default. Call [`PipelineConfig::validate`] before running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // === Run shape ===
    /// Number of Monte Carlo trial runs
    pub tries: u32,
    /// Run horizon in months
    pub months: u32,
    /// Calendar month the simulation clock starts at; `None` means today
    pub start_date: Option<jiff::civil::Date>,
    pub option: ScenarioOption,
    /// Success multiplier applied by the Optimistic/Pessimistic scenarios
    pub pos_factor: f64,
    /// Duration multiplier applied by the Optimistic/Pessimistic scenarios
    pub timeline_factor: f64,

    // === Phase tables ===
    pub phase_success: PerPhase<f64>,
    pub best_timeline: PerPhase<f64>,
    pub likely_timeline: PerPhase<f64>,
    pub worst_timeline: PerPhase<f64>,

    // === Platform tables ===
    pub platform_pos: PerPlatform<f64>,
    pub platform_timeline: PerPlatform<TimelineTag>,
    pub platform_correlation: PerPlatform<CorrelationTag>,

    // === Funding tables ===
    pub funding_pos: PerFunding<f64>,
    pub funding_timeline: PerFunding<TimelineTag>,
    pub funding_overlap: PerFunding<OverlapTag>,
    pub funding_tech_failure: PerFunding<f64>,

    // === Tag value tables ===
    pub timeline_factor_values: TimelineFactors,
    pub correlation_values: CorrelationValues,
    pub overlap: OverlapTables,

    // === Approval ===
    /// Maximum approvals completing in any one month; 0 blocks approval
    pub approval_limit: u32,
    pub approval_pos: f64,
    pub approval_timeline: f64,

    // === Policies ===
    pub phase3: Phase3Policy,
    pub buyout: BuyoutPolicy,

    // === Toggles ===
    /// Delay a vaccine's clock when its recorded phase start is in the future
    pub do_ignore_future_dates: bool,
    pub do_manufacturing: bool,
    pub cross_check: bool,
    /// Retain a per-(run, vaccine) phase-completion log in the output
    pub collect_trials: bool,

    // === Manufacturing ===
    pub manufacturing: ManufacturingConfig,

    // === Report shape ===
    pub months_table_skip: u32,
    pub rank_table_max: usize,
    pub best_vaccines_max: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tries: 1000,
            months: 36,
            start_date: None,
            option: ScenarioOption::Normal,
            pos_factor: 1.5,
            timeline_factor: 1.5,
            phase_success: PerPhase([0.66, 0.66, 0.58, 0.77, 0.9]),
            best_timeline: PerPhase([2.0, 2.0, 3.0, 5.0, 1.0]),
            likely_timeline: PerPhase([5.0, 4.0, 6.0, 9.0, 2.0]),
            worst_timeline: PerPhase([10.0, 8.0, 12.0, 18.0, 6.0]),
            platform_pos: PerPlatform([0.8, 1.0, 0.9, 0.95, 1.0, 0.9, 0.85, 0.9, 0.7]),
            platform_timeline: PerPlatform([
                TimelineTag::Faster,
                TimelineTag::Normal,
                TimelineTag::Slower,
                TimelineTag::SlightlyFaster,
                TimelineTag::Normal,
                TimelineTag::SlightlySlower,
                TimelineTag::MuchFaster,
                TimelineTag::SlightlySlower,
                TimelineTag::Slower,
            ]),
            platform_correlation: PerPlatform([
                CorrelationTag::Medium,
                CorrelationTag::Low,
                CorrelationTag::Low,
                CorrelationTag::Medium,
                CorrelationTag::Low,
                CorrelationTag::Medium,
                CorrelationTag::Strong,
                CorrelationTag::Medium,
                CorrelationTag::None,
            ]),
            funding_pos: PerFunding([1.2, 1.1, 1.3, 1.0, 0.8]),
            funding_timeline: PerFunding([
                TimelineTag::SlightlyFaster,
                TimelineTag::Normal,
                TimelineTag::Faster,
                TimelineTag::SlightlySlower,
                TimelineTag::Slower,
            ]),
            funding_overlap: PerFunding([
                OverlapTag::MostlyOverlapped,
                OverlapTag::OverlapEarly,
                OverlapTag::Simultaneous,
                OverlapTag::Consecutive,
                OverlapTag::Gapped,
            ]),
            funding_tech_failure: PerFunding([0.95, 0.95, 1.0, 0.9, 0.85]),
            timeline_factor_values: TimelineFactors::default(),
            correlation_values: CorrelationValues::default(),
            overlap: OverlapTables::default(),
            approval_limit: 3,
            approval_pos: 0.9,
            approval_timeline: 1.0,
            phase3: Phase3Policy::default(),
            buyout: BuyoutPolicy::default(),
            do_ignore_future_dates: true,
            do_manufacturing: true,
            cross_check: false,
            collect_trials: false,
            manufacturing: ManufacturingConfig::default(),
            months_table_skip: 0,
            rank_table_max: 10,
            best_vaccines_max: 5,
        }
    }
}

impl PipelineConfig {
    /// Create the baseline configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The calendar month the simulation clock starts at.
    #[must_use]
    pub fn resolved_start_date(&self) -> jiff::civil::Date {
        self.start_date
            .unwrap_or_else(|| jiff::Zoned::now().date())
    }

    /// Whole months between the simulation start and `date` (negative when
    /// `date` is in the past). Day-of-month is ignored.
    #[must_use]
    pub fn month_offset(&self, date: jiff::civil::Date) -> i32 {
        let start = self.resolved_start_date();
        (i32::from(date.year()) - i32::from(start.year())) * 12
            + (i32::from(date.month()) - i32::from(start.month()))
    }

    /// The (duration, success) multipliers of the selected scenario.
    #[must_use]
    pub fn option_multipliers(&self) -> (f64, f64) {
        self.option
            .multipliers(self.timeline_factor, self.pos_factor)
    }

    /// Correlation weight for a platform.
    #[must_use]
    pub fn correlation_for(&self, platform: Platform) -> f64 {
        self.correlation_values
            .get(self.platform_correlation[platform])
    }

    /// Check every table against the model's published limits.
    ///
    /// Collects all violations instead of stopping at the first so a bad
    /// parameter file can be fixed in one pass.
    pub fn validate(&self, registry: &[VaccineRecord]) -> Result<(), ConfigProblems> {
        let mut problems = Vec::new();

        check_range(&mut problems, "tries", f64::from(self.tries), 1.0, 50_000.0);
        check_range(&mut problems, "months", f64::from(self.months), 24.0, 240.0);
        check_range(&mut problems, "pos_factor", self.pos_factor, 1.0, 10.0);
        check_range(
            &mut problems,
            "timeline_factor",
            self.timeline_factor,
            1.0,
            10.0,
        );

        for (phase, value) in self.phase_success.iter() {
            check_range(
                &mut problems,
                format!("phase_success[{phase}]"),
                *value,
                0.0,
                1.0,
            );
        }
        for phase in crate::model::Phase::ALL {
            let (best, likely, worst) = (
                self.best_timeline[phase],
                self.likely_timeline[phase],
                self.worst_timeline[phase],
            );
            for (name, value) in [
                ("best_timeline", best),
                ("likely_timeline", likely),
                ("worst_timeline", worst),
            ] {
                check_range(
                    &mut problems,
                    format!("{name}[{phase}]"),
                    value,
                    1.0,
                    48.0,
                );
            }
            if !(best <= likely && likely <= worst) {
                problems.push(InvalidConfigurationError::BadTriangle {
                    parameter: format!("timeline[{phase}]"),
                    low: best,
                    likely,
                    high: worst,
                });
            }
        }

        for (platform, value) in self.platform_pos.iter() {
            check_range(
                &mut problems,
                format!("platform_pos[{platform}]"),
                *value,
                0.0,
                1.0,
            );
        }
        for (funding, value) in self.funding_pos.iter() {
            check_range(
                &mut problems,
                format!("funding_pos[{funding}]"),
                *value,
                0.0,
                10.0,
            );
        }
        for (funding, value) in self.funding_tech_failure.iter() {
            check_range(
                &mut problems,
                format!("funding_tech_failure[{funding}]"),
                *value,
                0.0,
                1.0,
            );
        }

        for (tag, value) in self.timeline_factor_values.iter() {
            check_range(
                &mut problems,
                format!("timeline_factor_values.{tag}"),
                value,
                0.0,
                10.0,
            );
        }
        for (tag, value) in self.correlation_values.iter() {
            check_range(
                &mut problems,
                format!("correlation_values.{tag}"),
                value,
                0.0,
                0.5,
            );
        }
        for (tag, value) in self.overlap.phase1_start.iter() {
            check_range(
                &mut problems,
                format!("overlap.phase1_start.{tag}"),
                value,
                0.0,
                10.0,
            );
        }
        for (tag, value) in self.overlap.approval_start.iter() {
            check_range(
                &mut problems,
                format!("overlap.approval_start.{tag}"),
                value,
                0.0,
                10.0,
            );
        }
        for (tag, value) in self.overlap.phase_overlap.iter() {
            check_range(
                &mut problems,
                format!("overlap.phase_overlap.{tag}"),
                value,
                0.0,
                10.0,
            );
        }
        for (tag, value) in self.overlap.phase_gap.iter() {
            check_range(
                &mut problems,
                format!("overlap.phase_gap.{tag}"),
                value,
                0.0,
                30.0,
            );
        }

        check_range(
            &mut problems,
            "approval_limit",
            f64::from(self.approval_limit),
            0.0,
            100.0,
        );
        check_range(&mut problems, "approval_pos", self.approval_pos, 0.0, 1.0);
        check_range(
            &mut problems,
            "approval_timeline",
            self.approval_timeline,
            1.0,
            10.0,
        );

        check_range(
            &mut problems,
            "phase3.limit",
            f64::from(self.phase3.limit),
            1.0,
            100.0,
        );
        check_range(
            &mut problems,
            "phase3.slowdown_fract",
            self.phase3.slowdown_fract,
            0.0,
            1.0,
        );
        check_range(
            &mut problems,
            "phase3.slowdown_factor",
            self.phase3.slowdown_factor,
            1.0,
            10.0,
        );
        check_range(&mut problems, "buyout.fract", self.buyout.fract, 0.0, 1.0);

        check_range(
            &mut problems,
            "manufacturing.ramp_up.pre_approval",
            self.manufacturing.ramp_up.pre_approval,
            0.0,
            1.0,
        );
        check_range(
            &mut problems,
            "manufacturing.ramp_up.duration",
            f64::from(self.manufacturing.ramp_up.duration),
            1.0,
            48.0,
        );
        for (platform, capacity) in self.manufacturing.batch_litres.iter() {
            if !(capacity.low <= capacity.likely && capacity.likely <= capacity.high) {
                problems.push(InvalidConfigurationError::BadTriangle {
                    parameter: format!("manufacturing.batch_litres[{platform}]"),
                    low: capacity.low,
                    likely: capacity.likely,
                    high: capacity.high,
                });
            }
            if capacity.low < 0.0 {
                problems.push(InvalidConfigurationError::OutOfRange {
                    parameter: format!("manufacturing.batch_litres[{platform}].low"),
                    value: capacity.low,
                    min: 0.0,
                    max: f64::MAX,
                });
            }
        }
        for (platform, value) in self.manufacturing.doses_per_litre.iter() {
            if *value < 0.0 {
                problems.push(InvalidConfigurationError::OutOfRange {
                    parameter: format!("manufacturing.doses_per_litre[{platform}]"),
                    value: *value,
                    min: 0.0,
                    max: f64::MAX,
                });
            }
        }
        for (funding, production) in self.manufacturing.funding_timelines.iter() {
            check_range(
                &mut problems,
                format!("manufacturing.funding_timelines[{funding}].capacity_factor"),
                production.capacity_factor,
                0.0,
                10.0,
            );
            check_range(
                &mut problems,
                format!("manufacturing.funding_timelines[{funding}].start_delay"),
                f64::from(production.start_delay),
                0.0,
                48.0,
            );
        }
        for (i, target) in self.manufacturing.targets.iter().enumerate() {
            if *target < 0.0 {
                problems.push(InvalidConfigurationError::OutOfRange {
                    parameter: format!("manufacturing.targets[{}]", i + 1),
                    value: *target,
                    min: 0.0,
                    max: f64::MAX,
                });
            }
        }

        if self.months_table_skip >= self.months {
            problems.push(InvalidConfigurationError::OutOfRange {
                parameter: "months_table_skip".to_string(),
                value: f64::from(self.months_table_skip),
                min: 0.0,
                max: f64::from(self.months) - 1.0,
            });
        }

        if registry.is_empty() {
            problems.push(InvalidConfigurationError::EmptyRegistry);
        }
        let mut seen_ids = FxHashSet::default();
        for record in registry {
            if !seen_ids.insert(record.id) {
                problems.push(InvalidConfigurationError::DuplicateVaccineId { id: record.id.0 });
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigProblems { problems })
        }
    }
}

fn check_range(
    problems: &mut Vec<InvalidConfigurationError>,
    parameter: impl Into<String>,
    value: f64,
    min: f64,
    max: f64,
) {
    if !(value >= min && value <= max) {
        problems.push(InvalidConfigurationError::OutOfRange {
            parameter: parameter.into(),
            value,
            min,
            max,
        });
    }
}
