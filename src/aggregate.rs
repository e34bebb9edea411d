//! Per-method aggregation of window results
//!
//! Reduces the stream of [`WindowResult`]s for one method into a single
//! [`AggregateResult`]: mean ± standard error of the mean for each metric,
//! plus the method-level verdict. Uncertainty is the sample standard
//! deviation across windows divided by the square root of the window
//! count.

use statrs::statistics::Statistics;

use crate::error::{AetError, Result};
use crate::models::{AggregateResult, Method, WindowResult};

/// Folds window results into per-method summary statistics
pub struct Aggregator {
    success_threshold_pct: f64,
}

impl Aggregator {
    pub fn new(success_threshold_pct: f64) -> Self {
        Self {
            success_threshold_pct,
        }
    }

    /// Aggregate all valid window results for one method
    ///
    /// Fails with [`AetError::InsufficientData`] when no window survived
    /// for the method; excluded windows contribute nothing to the means.
    /// Results are sorted by window index before reduction, so the output
    /// is bit-identical regardless of the order windows were evaluated in.
    pub fn aggregate(
        &self,
        method: Method,
        mut results: Vec<WindowResult>,
    ) -> Result<AggregateResult> {
        if results.is_empty() {
            return Err(AetError::InsufficientData { method });
        }
        debug_assert!(results.iter().all(|r| r.method == method));
        results.sort_by_key(|r| r.window_index);

        let (mean_aet_bpm, aet_uncertainty) =
            mean_and_sem(results.iter().map(|r| r.aet_estimate_bpm));
        let (mean_drift_pct, drift_uncertainty) =
            mean_and_sem(results.iter().map(|r| r.drift_pct));

        let pace_drift = collect_optional(results.iter().map(|r| r.pace_drift_pct));
        let (mean_pace_drift_pct, pace_drift_uncertainty) = match &pace_drift {
            Some(values) => {
                let (m, s) = mean_and_sem(values.iter().copied());
                (Some(m), Some(s))
            }
            None => (None, None),
        };

        let pace_at_aet = collect_optional(results.iter().map(|r| r.pace_at_aet));
        let (mean_pace_at_aet, pace_at_aet_uncertainty) = match &pace_at_aet {
            Some(values) => {
                let (m, s) = mean_and_sem(values.iter().copied());
                (Some(m), Some(s))
            }
            None => (None, None),
        };

        // Verdict uses the aggregate drift, not the per-window verdicts:
        // a method can fail individual windows yet pass overall. Ratio
        // methods additionally require a steady pace, since constant HR at
        // a collapsing pace is not an aerobic pass.
        let drift_ok = mean_drift_pct.abs() <= self.success_threshold_pct;
        let pace_ok = mean_pace_drift_pct
            .map(|p| p.abs() <= self.success_threshold_pct)
            .unwrap_or(true);

        Ok(AggregateResult {
            method,
            window_count: results.len(),
            mean_aet_bpm,
            aet_uncertainty,
            mean_drift_pct,
            drift_uncertainty,
            mean_pace_drift_pct,
            pace_drift_uncertainty,
            mean_pace_at_aet,
            pace_at_aet_uncertainty,
            successful: drift_ok && pace_ok,
        })
    }
}

/// Mean and standard error of the mean; a single value has zero error
fn mean_and_sem(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let values: Vec<f64> = values.collect();
    let n = values.len();
    let mean = values.iter().mean();
    if n < 2 {
        return (mean, 0.0);
    }
    let sem = values.iter().std_dev() / (n as f64).sqrt();
    (mean, sem)
}

/// Present values of an optional metric, `None` when no window carried it
///
/// Pace-at-AeT can be absent for individual windows (flat regression)
/// while the rest of the window's result stands, so the mean runs over
/// whichever windows produced a value.
fn collect_optional(values: impl Iterator<Item = Option<f64>>) -> Option<Vec<f64>> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(present)
    }
}
