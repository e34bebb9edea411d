//! Tabular rendering of analysis results
//!
//! One row per method: drift ± error, pace drift ± error, pace at AeT, and
//! the verdict, under a title summarizing the shared AeT estimate.

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::analysis::AnalysisReport;
use crate::models::AggregateResult;

#[derive(Tabled)]
struct MethodRow {
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Windows")]
    windows: usize,
    #[tabled(rename = "AeT Drift (%)")]
    aet_drift: String,
    #[tabled(rename = "Pace Drift (%)")]
    pace_drift: String,
    #[tabled(rename = "Pace @ AeT")]
    pace_at_aet: String,
    #[tabled(rename = "Successful")]
    successful: String,
}

impl From<&AggregateResult> for MethodRow {
    fn from(result: &AggregateResult) -> Self {
        let pace_drift = match (result.mean_pace_drift_pct, result.pace_drift_uncertainty) {
            (Some(mean), Some(err)) => plus_minus(mean, err),
            _ => "NA".to_string(),
        };
        let pace_at_aet = match (
            result.mean_pace_at_aet,
            result.pace_at_aet_uncertainty,
            result.method.pace_units(),
        ) {
            (Some(mean), Some(err), Some(units)) => {
                format!("{} {}", plus_minus(mean, err), units)
            }
            _ => "NA".to_string(),
        };
        Self {
            method: result.method.to_string(),
            windows: result.window_count,
            aet_drift: plus_minus(result.mean_drift_pct, result.drift_uncertainty),
            pace_drift,
            pace_at_aet,
            successful: if result.successful { "yes" } else { "no" }.to_string(),
        }
    }
}

fn plus_minus(mean: f64, err: f64) -> String {
    format!("{:>5.2} +/- {:.2}", mean, err)
}

/// Render the per-method summary table
///
/// The title reports the AeT estimate once; every method derives it from
/// the same whole-window heart-rate mean, so any surviving method can
/// supply it.
pub fn render(report: &AnalysisReport) -> String {
    let title = match report.results.first() {
        Some(first) => format!(
            "Results from {} windows: AeT {:.2} +/- {:.2} bpm",
            first.window_count, first.mean_aet_bpm, first.aet_uncertainty
        ),
        None => "No method produced a valid result".to_string(),
    };

    let rows: Vec<MethodRow> = report.results.iter().map(MethodRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp()).with(Panel::header(title));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Method;

    fn aggregate(method: Method) -> AggregateResult {
        let ratio = method != Method::Raw;
        AggregateResult {
            method,
            window_count: 12,
            mean_aet_bpm: 149.87,
            aet_uncertainty: 0.42,
            mean_drift_pct: 2.31,
            drift_uncertainty: 0.18,
            mean_pace_drift_pct: ratio.then_some(-1.02),
            pace_drift_uncertainty: ratio.then_some(0.33),
            mean_pace_at_aet: ratio.then_some(6.14),
            pace_at_aet_uncertainty: ratio.then_some(0.21),
            successful: true,
        }
    }

    #[test]
    fn test_render_contains_title_and_rows() {
        let report = AnalysisReport {
            windows_generated: 12,
            results: vec![aggregate(Method::Raw), aggregate(Method::HrSpeed)],
        };
        let rendered = render(&report);
        assert!(rendered.contains("Results from 12 windows"));
        assert!(rendered.contains("AeT 149.87 +/- 0.42 bpm"));
        assert!(rendered.contains("raw"));
        assert!(rendered.contains("hr/speed"));
        assert!(rendered.contains("6.14 +/- 0.21 mph"));
        assert!(rendered.contains("yes"));
    }

    #[test]
    fn test_raw_method_has_no_pace_columns() {
        let report = AnalysisReport {
            windows_generated: 12,
            results: vec![aggregate(Method::Raw)],
        };
        let rendered = render(&report);
        assert!(rendered.contains("NA"));
    }

    #[test]
    fn test_empty_report_renders_notice() {
        let report = AnalysisReport {
            windows_generated: 4,
            results: Vec::new(),
        };
        let rendered = render(&report);
        assert!(rendered.contains("No method produced a valid result"));
    }
}
