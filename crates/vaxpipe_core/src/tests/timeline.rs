//! Tests for per-phase success and duration arithmetic
//!
//! Degenerate triangular bounds (best = likely = worst) make sampled
//! durations deterministic, so the multiplier chains can be checked
//! exactly.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{PipelineConfig, ScenarioOption};
use crate::model::{
    FundingCategory, PerFunding, PerPhase, PerPlatform, Phase, Platform, TimelineTag,
};
use crate::timeline::{expected_duration, sample_duration, success_probability};

/// Six months for every phase, all timeline tags neutral.
fn degenerate_config() -> PipelineConfig {
    PipelineConfig {
        best_timeline: PerPhase::splat(6.0),
        likely_timeline: PerPhase::splat(6.0),
        worst_timeline: PerPhase::splat(6.0),
        platform_timeline: PerPlatform::splat(TimelineTag::Normal),
        funding_timeline: PerFunding::splat(TimelineTag::Normal),
        approval_timeline: 1.0,
        ..PipelineConfig::default()
    }
}

#[test]
fn test_success_probability_multiplies_all_tables() {
    let mut config = PipelineConfig::default();
    config.phase_success[Phase::Phase1] = 0.5;
    config.funding_pos[FundingCategory::LargePharma] = 1.2;
    config.platform_pos[Platform::Rna] = 0.9;
    config.funding_tech_failure[FundingCategory::LargePharma] = 0.95;

    let p = success_probability(
        &config,
        Phase::Phase1,
        Platform::Rna,
        FundingCategory::LargePharma,
    );
    assert!(
        (p - 0.5 * 1.2 * 0.9 * 0.95).abs() < 1e-12,
        "expected 0.513, got {p}"
    );
}

#[test]
fn test_success_probability_clamps_to_one() {
    let mut config = PipelineConfig::default();
    config.phase_success[Phase::Phase2] = 0.9;
    config.funding_pos[FundingCategory::Government] = 5.0;
    config.platform_pos[Platform::Dna] = 1.0;
    config.funding_tech_failure[FundingCategory::Government] = 1.0;

    let p = success_probability(
        &config,
        Phase::Phase2,
        Platform::Dna,
        FundingCategory::Government,
    );
    assert_eq!(p, 1.0, "raw product 4.5 must clamp to 1");
}

#[test]
fn test_approval_success_ignores_platform_and_funding() {
    let mut config = PipelineConfig::default();
    config.phase_success[Phase::Approval] = 0.8;
    config.approval_pos = 0.75;
    config.platform_pos[Platform::Rna] = 0.0;
    config.funding_pos[FundingCategory::LargePharma] = 0.0;

    let p = success_probability(
        &config,
        Phase::Approval,
        Platform::Rna,
        FundingCategory::LargePharma,
    );
    assert!((p - 0.6).abs() < 1e-12, "zeroed tables must not touch Approval");

    let p1 = success_probability(
        &config,
        Phase::Phase1,
        Platform::Rna,
        FundingCategory::LargePharma,
    );
    assert_eq!(p1, 0.0, "earlier phases do read the zeroed tables");
}

#[test]
fn test_scenario_scales_success_probability() {
    let mut config = PipelineConfig {
        pos_factor: 1.5,
        ..PipelineConfig::default()
    };
    config.phase_success[Phase::Phase1] = 0.4;
    config.funding_pos = PerFunding::splat(1.0);
    config.platform_pos = PerPlatform::splat(1.0);
    config.funding_tech_failure = PerFunding::splat(1.0);

    let args = (Phase::Phase1, Platform::Rna, FundingCategory::Government);

    config.option = ScenarioOption::Normal;
    let normal = success_probability(&config, args.0, args.1, args.2);
    config.option = ScenarioOption::Optimistic;
    let optimistic = success_probability(&config, args.0, args.1, args.2);
    config.option = ScenarioOption::Pessimistic;
    let pessimistic = success_probability(&config, args.0, args.1, args.2);

    assert!((normal - 0.4).abs() < 1e-12);
    assert!((optimistic - 0.6).abs() < 1e-12);
    assert!((pessimistic - 0.4 / 1.5).abs() < 1e-12);
}

#[test]
fn test_duration_applies_platform_and_funding_tags() {
    let mut config = degenerate_config();
    config.platform_timeline[Platform::Rna] = TimelineTag::Slower;
    let mut rng = SmallRng::seed_from_u64(42);

    let neutral = sample_duration(
        &config,
        Phase::Phase2,
        Platform::Dna,
        FundingCategory::Government,
        false,
        &mut rng,
    )
    .unwrap();
    assert_eq!(neutral, 6);

    // Slower platform tag resolves to a 1.5x factor
    let slower = sample_duration(
        &config,
        Phase::Phase2,
        Platform::Rna,
        FundingCategory::Government,
        false,
        &mut rng,
    )
    .unwrap();
    assert_eq!(slower, 9);

    // Tags combine multiplicatively: 6 * 1.5 * 1.5 = 13.5, rounded half-up
    config.funding_timeline[FundingCategory::Government] = TimelineTag::Slower;
    let both = sample_duration(
        &config,
        Phase::Phase2,
        Platform::Rna,
        FundingCategory::Government,
        false,
        &mut rng,
    )
    .unwrap();
    assert_eq!(both, 14);
}

#[test]
fn test_optimistic_scenario_shortens_durations() {
    let mut config = degenerate_config();
    config.option = ScenarioOption::Optimistic;
    config.timeline_factor = 1.5;
    config.platform_timeline[Platform::Rna] = TimelineTag::Slower;
    let mut rng = SmallRng::seed_from_u64(42);

    // The 1.5x slower tag and the 1/1.5 scenario multiplier cancel
    let months = sample_duration(
        &config,
        Phase::Phase2,
        Platform::Rna,
        FundingCategory::Government,
        false,
        &mut rng,
    )
    .unwrap();
    assert_eq!(months, 6);
}

#[test]
fn test_slowdown_stretches_only_phase_three() {
    let mut config = degenerate_config();
    config.phase3.slowdown_factor = 2.0;
    let mut rng = SmallRng::seed_from_u64(42);

    let phase3 = sample_duration(
        &config,
        Phase::Phase3,
        Platform::Dna,
        FundingCategory::Government,
        true,
        &mut rng,
    )
    .unwrap();
    assert_eq!(phase3, 12, "slowdown doubles Phase III");

    let phase2 = sample_duration(
        &config,
        Phase::Phase2,
        Platform::Dna,
        FundingCategory::Government,
        true,
        &mut rng,
    )
    .unwrap();
    assert_eq!(phase2, 6, "slowdown must not touch other phases");
}

#[test]
fn test_approval_duration_uses_regulator_factor() {
    let mut config = degenerate_config();
    config.approval_timeline = 2.0;
    config.platform_timeline[Platform::Rna] = TimelineTag::Slower;
    let mut rng = SmallRng::seed_from_u64(42);

    let months = sample_duration(
        &config,
        Phase::Approval,
        Platform::Rna,
        FundingCategory::BiotechAcademic,
        false,
        &mut rng,
    )
    .unwrap();
    assert_eq!(months, 12, "Approval reads the regulator factor, not the tags");
}

#[test]
fn test_sample_duration_rejects_inverted_bounds() {
    let mut config = degenerate_config();
    config.best_timeline[Phase::Phase1] = 10.0;
    config.worst_timeline[Phase::Phase1] = 3.0;
    let mut rng = SmallRng::seed_from_u64(42);

    let result = sample_duration(
        &config,
        Phase::Phase1,
        Platform::Dna,
        FundingCategory::Government,
        false,
        &mut rng,
    );
    assert!(result.is_err());
}

#[test]
fn test_expected_duration_uses_triangular_mean() {
    let mut config = degenerate_config();
    config.best_timeline[Phase::Phase3] = 3.0;
    config.likely_timeline[Phase::Phase3] = 6.0;
    config.worst_timeline[Phase::Phase3] = 12.0;

    // Mean is (3 + 6 + 12) / 3 = 7
    let neutral = expected_duration(
        &config,
        Phase::Phase3,
        Platform::Dna,
        FundingCategory::Government,
    );
    assert_eq!(neutral, 7);

    config.platform_timeline[Platform::Dna] = TimelineTag::Slower;
    let slower = expected_duration(
        &config,
        Phase::Phase3,
        Platform::Dna,
        FundingCategory::Government,
    );
    assert_eq!(slower, 11, "7 * 1.5 = 10.5 rounds half-up");
}
