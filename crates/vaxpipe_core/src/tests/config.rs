//! Tests for configuration defaults, deserialization, and validation
//!
//! These tests verify that:
//! - An empty parameter file deserializes to the baseline defaults
//! - Partial files override only the fields they name
//! - Registry records parse with their published labels
//! - Validation reports every problem at once, not just the first

use crate::config::{PipelineConfig, ScenarioOption};
use crate::error::InvalidConfigurationError;
use crate::model::{FundingCategory, Phase, Platform, VaccineId, VaccineRecord};

fn minimal_registry() -> Vec<VaccineRecord> {
    vec![VaccineRecord {
        id: VaccineId(1),
        name: "candidate-1".to_string(),
        institutes: String::new(),
        platform: Platform::Rna,
        funding: FundingCategory::LargePharma,
        phase: Phase::Phase1,
        phase_start: None,
    }]
}

#[test]
fn test_empty_parameter_file_uses_defaults() {
    let config: PipelineConfig = serde_json::from_str("{}").unwrap();

    assert_eq!(config, PipelineConfig::default());
    assert_eq!(config.tries, 1000);
    assert_eq!(config.months, 36);
    assert_eq!(config.option, ScenarioOption::Normal);
}

#[test]
fn test_partial_parameter_file_overrides_named_fields() {
    let config: PipelineConfig = serde_json::from_str(
        r#"{
            "tries": 500,
            "option": "Optimistic",
            "approval_limit": 1,
            "phase3": { "enabled": true, "limit": 18 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.tries, 500);
    assert_eq!(config.option, ScenarioOption::Optimistic);
    assert_eq!(config.approval_limit, 1);
    assert!(config.phase3.enabled);
    assert_eq!(config.phase3.limit, 18);
    // Unnamed fields keep their defaults, including nested ones
    assert_eq!(config.months, 36);
    assert_eq!(config.phase3.slowdown_factor, 1.5);
}

#[test]
fn test_registry_record_parses_published_labels() {
    let record: VaccineRecord = serde_json::from_str(
        r#"{
            "id": 7,
            "name": "mRNA-Alpha",
            "institutes": "Example Institute",
            "platform": "RNA",
            "funding": "Bio-tech/Academic",
            "phase": "Phase II",
            "phase_start": "2025-03-01"
        }"#,
    )
    .unwrap();

    assert_eq!(record.id, VaccineId(7));
    assert_eq!(record.platform, Platform::Rna);
    assert_eq!(record.funding, FundingCategory::BiotechAcademic);
    assert_eq!(record.phase, Phase::Phase2);
    assert_eq!(record.phase_start, Some(jiff::civil::date(2025, 3, 1)));
}

#[test]
fn test_registry_record_rejects_unknown_platform() {
    let result: Result<VaccineRecord, _> = serde_json::from_str(
        r#"{
            "id": 1,
            "name": "x",
            "platform": "Nanobot",
            "funding": "Government",
            "phase": "Phase I"
        }"#,
    );
    assert!(result.is_err(), "unknown platform label must not parse");
}

#[test]
fn test_default_config_validates() {
    let config = PipelineConfig::default();
    assert!(config.validate(&minimal_registry()).is_ok());
}

#[test]
fn test_validation_collects_every_problem() {
    let config = PipelineConfig {
        tries: 0,
        months: 10,
        pos_factor: 99.0,
        approval_pos: 1.5,
        ..PipelineConfig::default()
    };

    let problems = config
        .validate(&minimal_registry())
        .unwrap_err()
        .problems;

    assert_eq!(problems.len(), 4, "all four violations must be reported");
    let parameters: Vec<&str> = problems
        .iter()
        .filter_map(|p| match p {
            InvalidConfigurationError::OutOfRange { parameter, .. } => Some(parameter.as_str()),
            _ => None,
        })
        .collect();
    assert!(parameters.contains(&"tries"));
    assert!(parameters.contains(&"months"));
    assert!(parameters.contains(&"pos_factor"));
    assert!(parameters.contains(&"approval_pos"));
}

#[test]
fn test_validation_checks_triangle_ordering() {
    let mut config = PipelineConfig::default();
    config.likely_timeline[Phase::Phase3] = 20.0;
    config.worst_timeline[Phase::Phase3] = 6.0;

    let problems = config
        .validate(&minimal_registry())
        .unwrap_err()
        .problems;

    assert!(
        problems
            .iter()
            .any(|p| matches!(p, InvalidConfigurationError::BadTriangle { .. })),
        "inverted bounds must surface as a triangle problem, got {problems:?}"
    );
}

#[test]
fn test_validation_rejects_empty_registry() {
    let config = PipelineConfig::default();
    let problems = config.validate(&[]).unwrap_err().problems;
    assert!(
        problems
            .iter()
            .any(|p| matches!(p, InvalidConfigurationError::EmptyRegistry))
    );
}

#[test]
fn test_validation_rejects_duplicate_ids() {
    let mut registry = minimal_registry();
    registry.push(registry[0].clone());

    let config = PipelineConfig::default();
    let problems = config.validate(&registry).unwrap_err().problems;
    assert!(
        problems
            .iter()
            .any(|p| matches!(p, InvalidConfigurationError::DuplicateVaccineId { id: 1 }))
    );
}

#[test]
fn test_validation_rejects_table_skip_past_horizon() {
    let config = PipelineConfig {
        months: 24,
        months_table_skip: 24,
        ..PipelineConfig::default()
    };

    assert!(config.validate(&minimal_registry()).is_err());
}

#[test]
fn test_month_offset_ignores_day_of_month() {
    let config = PipelineConfig {
        start_date: Some(jiff::civil::date(2025, 1, 15)),
        ..PipelineConfig::default()
    };

    assert_eq!(config.month_offset(jiff::civil::date(2025, 1, 1)), 0);
    assert_eq!(config.month_offset(jiff::civil::date(2025, 7, 1)), 6);
    assert_eq!(config.month_offset(jiff::civil::date(2026, 2, 28)), 13);
    assert_eq!(config.month_offset(jiff::civil::date(2024, 11, 30)), -2);
}

#[test]
fn test_scenario_multipliers() {
    let (duration, success) = ScenarioOption::Normal.multipliers(1.5, 2.0);
    assert_eq!((duration, success), (1.0, 1.0));

    let (duration, success) = ScenarioOption::Optimistic.multipliers(1.5, 2.0);
    assert!((duration - 1.0 / 1.5).abs() < 1e-12);
    assert_eq!(success, 2.0);

    let (duration, success) = ScenarioOption::Pessimistic.multipliers(1.5, 2.0);
    assert_eq!(duration, 1.5);
    assert_eq!(success, 0.5);
}
