//! Summary and trial-log renderings of a finished forecast

use vaxpipe_core::ForecastOutput;
use vaxpipe_core::model::Phase;

/// Header of the per-trial CSV export.
const CSV_HEADER: &str =
    "Try ID,Vaccine,Phase I (month),Phase II (month),Phase III (month),Approval (month)";

/// Benchmark summary array: the first month at which the probability of at
/// least one approval reaches 50% / 90% / 99% (null when never reached
/// within the horizon), then that probability at the horizon and the mean
/// approved count there.
pub fn summary(output: &ForecastOutput) -> String {
    let value = serde_json::json!([
        output.month_reaching_probability(0.5),
        output.month_reaching_probability(0.9),
        output.month_reaching_probability(0.99),
        output.final_approval_probability(),
        output.mean_approved_at_horizon(),
    ]);
    let mut rendered = value.to_string();
    rendered.push('\n');
    rendered
}

/// Per-trial phase-completion table, one row per (try, vaccine) that passed
/// at least one clinical phase. Pre-Clinical is not reported; a cell stays
/// empty when that phase was not passed.
pub fn trials_csv(output: &ForecastOutput) -> String {
    let mut csv = String::with_capacity((output.trial_log.len() + 1) * 24);
    csv.push_str(CSV_HEADER);
    csv.push('\n');
    for row in &output.trial_log {
        csv.push_str(&row.try_index.to_string());
        csv.push(',');
        csv.push_str(&row.vaccine.0.to_string());
        for &phase in &Phase::ALL[1..] {
            csv.push(',');
            if let Some(month) = row.phase_end[phase] {
                csv.push_str(&month.to_string());
            }
        }
        csv.push('\n');
    }
    csv
}

/// Error marker written to the output path on failure, so a supervisor
/// polling that file sees the failed run instead of a stale report.
pub fn error_marker(error: &color_eyre::Report) -> String {
    let value = serde_json::json!({ "error": format!("{error:#}") });
    let mut rendered = value.to_string();
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxpipe_core::model::{
        FirstApprovalStats, MonthlyRow, PerPhase, PipelineState, TrialLogRow, VaccineId,
    };

    fn output_shell() -> ForecastOutput {
        ForecastOutput {
            tries: 10,
            months: 3,
            vaccines: Vec::new(),
            monthly: Vec::new(),
            prob_at_least_one: Vec::new(),
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
        }
    }

    #[test]
    fn test_summary_reports_threshold_months_and_horizon() {
        let mut output = output_shell();
        output.prob_at_least_one = vec![0.0, 0.6, 0.95, 0.95];
        output.monthly = vec![MonthlyRow {
            month: 3,
            mean_approved: 2.5,
            dev_approved: 0.5,
            percentiles_approved: [1.0, 2.0, 4.0],
            at_least: [0.95, 0.8, 0.4, 0.1, 0.0],
            states: [0.0; PipelineState::COUNT],
        }];

        // 50% is first reached at month 1, 90% at month 2, 99% never
        assert_eq!(summary(&output), "[1,2,null,0.95,2.5]\n");
    }

    #[test]
    fn test_trials_csv_leaves_unpassed_phases_blank() {
        let mut output = output_shell();
        let mut first = PerPhase::splat(None);
        first[Phase::PreClinical] = Some(0);
        first[Phase::Phase1] = Some(2);
        first[Phase::Phase3] = Some(9);
        let mut second = PerPhase::splat(None);
        second[Phase::Approval] = Some(14);
        output.trial_log = vec![
            TrialLogRow {
                try_index: 1,
                vaccine: VaccineId(7),
                phase_end: first,
            },
            TrialLogRow {
                try_index: 2,
                vaccine: VaccineId(30),
                phase_end: second,
            },
        ];

        let csv = trials_csv(&output);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Try ID,Vaccine,Phase I (month),Phase II (month),Phase III (month),Approval (month)"
        );
        assert_eq!(lines.next(), Some("1,7,2,,9,"));
        assert_eq!(lines.next(), Some("2,30,,,,14"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_error_marker_carries_the_message() {
        let error = color_eyre::eyre::eyre!("tries out of range");

        let marker = error_marker(&error);

        let value: serde_json::Value = serde_json::from_str(&marker).unwrap();
        assert_eq!(value["error"], "tries out of range");
    }
}
