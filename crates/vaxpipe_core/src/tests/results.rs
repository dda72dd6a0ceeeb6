//! Tests for trial-run records, census membership, and output helpers

use crate::model::{
    FirstApprovalStats, ForecastOutput, FundingCategory, PerPhase, Phase, PipelineState, TrialRun,
    VaccineId, VaccineOutcome, VaccineTrial,
};

fn trial(outcome: VaccineOutcome) -> VaccineTrial {
    VaccineTrial {
        id: VaccineId(1),
        outcome,
        phase_start: PerPhase::splat(None),
        phase_end: PerPhase::splat(None),
        funding: FundingCategory::Government,
        bought_out: false,
    }
}

#[test]
fn test_occupies_is_inclusive_of_both_endpoints() {
    let mut v = trial(VaccineOutcome::Incomplete);
    v.phase_start[Phase::Phase1] = Some(2);
    v.phase_end[Phase::Phase1] = Some(5);

    assert!(!v.occupies(Phase::Phase1, 1));
    assert!(v.occupies(Phase::Phase1, 2));
    assert!(v.occupies(Phase::Phase1, 5));
    assert!(!v.occupies(Phase::Phase1, 6));
}

#[test]
fn test_unresolved_phase_occupied_through_horizon() {
    let mut v = trial(VaccineOutcome::Incomplete);
    v.phase_start[Phase::Phase2] = Some(6);

    assert!(v.occupies(Phase::Phase2, 6));
    assert!(v.occupies(Phase::Phase2, 100));
    assert!(!v.occupies(Phase::Phase2, 5));
}

#[test]
fn test_failed_vaccine_vacates_from_failure_month() {
    let mut v = trial(VaccineOutcome::Failed {
        phase: Phase::Phase2,
        month: 9,
    });
    v.phase_start[Phase::Phase2] = Some(5);
    v.phase_end[Phase::Phase2] = Some(9);

    assert!(v.occupies(Phase::Phase2, 8));
    assert!(!v.occupies(Phase::Phase2, 9), "failure month is vacated");
    assert!(!v.counts_in(PipelineState::Failed, 8));
    assert!(v.counts_in(PipelineState::Failed, 9));
    assert!(v.counts_in(PipelineState::Failed, 30));
}

#[test]
fn test_combined_census_states() {
    let mut v = trial(VaccineOutcome::Incomplete);
    v.phase_start[Phase::Phase1] = Some(2);
    v.phase_end[Phase::Phase1] = Some(6);
    v.phase_start[Phase::Phase2] = Some(4);
    v.phase_end[Phase::Phase2] = Some(8);
    v.phase_start[Phase::Phase3] = Some(7);
    v.phase_end[Phase::Phase3] = Some(12);

    // Month 5: Phase I and II both running, III not yet started
    assert!(v.counts_in(PipelineState::Phase1, 5));
    assert!(v.counts_in(PipelineState::Phase2, 5));
    assert!(v.counts_in(PipelineState::Phase1And2, 5));
    assert!(!v.counts_in(PipelineState::Phase2And3, 5));

    // Month 7: Phase I over, II and III overlapped
    assert!(!v.counts_in(PipelineState::Phase1And2, 7));
    assert!(v.counts_in(PipelineState::Phase2And3, 7));

    // Month 10: only Phase III left
    assert!(v.counts_in(PipelineState::Phase3, 10));
    assert!(!v.counts_in(PipelineState::Phase2And3, 10));
}

#[test]
fn test_approved_state_is_cumulative() {
    let mut v = trial(VaccineOutcome::Approved { month: 20 });
    v.phase_start[Phase::Approval] = Some(15);
    v.phase_end[Phase::Approval] = Some(20);

    assert!(!v.counts_in(PipelineState::Approved, 19));
    assert!(v.counts_in(PipelineState::Approved, 20));
    assert!(v.counts_in(PipelineState::Approved, 36));
    assert!(v.counts_in(PipelineState::Approval, 20));
    assert!(!v.counts_in(PipelineState::Approval, 21));
}

#[test]
fn test_run_first_approval_and_cumulative_count() {
    let mut approvals_by_month = vec![0; 25];
    approvals_by_month[14] = 1;
    approvals_by_month[20] = 1;
    let run = TrialRun {
        vaccines: vec![
            trial(VaccineOutcome::Approved { month: 20 }),
            trial(VaccineOutcome::Approved { month: 14 }),
            trial(VaccineOutcome::Incomplete),
        ],
        approvals_by_month,
        buyouts: 0,
        phase3_exceeded: false,
    };

    assert_eq!(run.first_approval_month(), Some(14));
    assert_eq!(run.approved_by(13), 0);
    assert_eq!(run.approved_by(14), 1);
    assert_eq!(run.approved_by(24), 2);
}

#[test]
fn test_run_with_no_approvals() {
    let run = TrialRun {
        vaccines: vec![trial(VaccineOutcome::Incomplete)],
        approvals_by_month: vec![0; 25],
        buyouts: 0,
        phase3_exceeded: false,
    };
    assert_eq!(run.first_approval_month(), None);
    assert_eq!(run.approved_by(24), 0);
}

#[test]
fn test_output_probability_lookups() {
    let output = ForecastOutput {
        tries: 10,
        months: 3,
        vaccines: Vec::new(),
        monthly: Vec::new(),
        prob_at_least_one: vec![0.0, 0.3, 0.6, 0.9],
        ranking: Vec::new(),
        best: Vec::new(),
        first_approval: FirstApprovalStats {
            mean_month: None,
            dev_month: None,
            none_fraction: 1.0,
        },
        mean_buyouts: 0.0,
        manufacturing: None,
        cross_checks: Vec::new(),
        trial_log: Vec::new(),
    };

    assert_eq!(output.month_reaching_probability(0.5), Some(2));
    assert_eq!(output.month_reaching_probability(0.95), None);
    assert_eq!(output.final_approval_probability(), 0.9);
    assert_eq!(output.mean_approved_at_horizon(), 0.0);
    assert_eq!(output.vaccine(VaccineId(1)).map(|v| v.approved), None);
}
