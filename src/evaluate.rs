//! Per-window drift evaluation
//!
//! For each window the evaluator produces one [`WindowResult`] per
//! [`Method`]: the raw heart-rate drift, and the drift of heart rate
//! normalized by speed or by elevation gain rate. All three share the same
//! AeT estimate (mean heart rate over the whole window) but diverge in
//! drift and verdict.

use crate::error::{AetError, Result};
use crate::models::{Method, Sample, Window, WindowResult};
use crate::regression::fit_line;

/// Denominator magnitudes below this make a ratio undefined
///
/// Stationary stretches and flat terrain produce mean speeds and climb
/// rates around zero; dividing by them would manufacture arbitrarily large
/// drift values instead of a skipped window.
const MIN_DENOMINATOR: f64 = 1e-6;

/// Computes drift results for (window, method) pairs
pub struct MethodEvaluator;

impl MethodEvaluator {
    /// Evaluate one method over one window
    ///
    /// Fails with [`AetError::DegenerateWindow`] when the drift arithmetic
    /// is undefined for this window (near-zero denominator); the caller
    /// excludes the window from that method's aggregate and continues.
    pub fn evaluate(window: &Window, method: Method) -> Result<WindowResult> {
        let avg_hr1 = mean(window.first_half, |s| s.heart_rate);
        let avg_hr2 = mean(window.second_half, |s| s.heart_rate);
        let n1 = window.first_half.len() as f64;
        let n2 = window.second_half.len() as f64;
        let aet_estimate_bpm = (avg_hr1 * n1 + avg_hr2 * n2) / (n1 + n2);

        let degenerate = |reason: String| AetError::DegenerateWindow {
            window_index: window.index,
            method,
            reason,
        };

        match method {
            Method::Raw => {
                let drift_pct = percent_drift(avg_hr1, avg_hr2)
                    .ok_or_else(|| degenerate("near-zero first-half heart rate".to_string()))?;
                Ok(WindowResult {
                    method,
                    window_index: window.index,
                    aet_estimate_bpm,
                    drift_pct,
                    pace_drift_pct: None,
                    pace_at_aet: None,
                })
            }
            Method::HrSpeed => {
                let pace1 = mean(window.first_half, |s| s.speed);
                let pace2 = mean(window.second_half, |s| s.speed);
                Self::ratio_result(
                    window,
                    method,
                    aet_estimate_bpm,
                    avg_hr1,
                    avg_hr2,
                    pace1,
                    pace2,
                    window
                        .samples()
                        .map(|s| (s.speed, s.heart_rate))
                        .collect::<Vec<_>>(),
                )
            }
            Method::HrElevation => {
                let rate1 = half_climb_rate(window.first_half)
                    .map_err(|reason| degenerate(format!("first half: {}", reason)))?;
                let rate2 = half_climb_rate(window.second_half)
                    .map_err(|reason| degenerate(format!("second half: {}", reason)))?;
                // Regression pairs use per-segment climb rates so the fit
                // sees the same x axis as the half ratios.
                let pairs: Vec<(f64, f64)> = window
                    .samples()
                    .zip(window.samples().skip(1))
                    .map(|(a, b)| {
                        let dt = b.elapsed_seconds - a.elapsed_seconds;
                        ((b.elevation - a.elevation) / dt * 3600.0, b.heart_rate)
                    })
                    .collect();
                Self::ratio_result(
                    window,
                    method,
                    aet_estimate_bpm,
                    avg_hr1,
                    avg_hr2,
                    rate1,
                    rate2,
                    pairs,
                )
            }
        }
    }

    /// Shared path for the two effort-normalized methods
    #[allow(clippy::too_many_arguments)]
    fn ratio_result(
        window: &Window,
        method: Method,
        aet_estimate_bpm: f64,
        avg_hr1: f64,
        avg_hr2: f64,
        pace1: f64,
        pace2: f64,
        regression_pairs: Vec<(f64, f64)>,
    ) -> Result<WindowResult> {
        let degenerate = |reason: String| AetError::DegenerateWindow {
            window_index: window.index,
            method,
            reason,
        };

        if pace1.abs() < MIN_DENOMINATOR || pace2.abs() < MIN_DENOMINATOR {
            return Err(degenerate(format!(
                "near-zero mean pace metric ({:.2e}, {:.2e})",
                pace1, pace2
            )));
        }
        let ratio1 = avg_hr1 / pace1;
        let ratio2 = avg_hr2 / pace2;
        let drift_pct = percent_drift(ratio1, ratio2)
            .ok_or_else(|| degenerate("near-zero first-half hr/pace ratio".to_string()))?;
        let pace_drift_pct = percent_drift(pace1, pace2)
            .ok_or_else(|| degenerate("near-zero first-half pace".to_string()))?;

        // The drift ratios are well-defined even when the regression is
        // not (constant pace gives no slope to fit), so a failed fit only
        // costs the optional pace-at-AeT projection, not the window.
        let pace_at_aet = fit_line(regression_pairs).and_then(|fit| fit.solve_x(aet_estimate_bpm));

        Ok(WindowResult {
            method,
            window_index: window.index,
            aet_estimate_bpm,
            drift_pct,
            pace_drift_pct: Some(pace_drift_pct),
            pace_at_aet,
        })
    }
}

fn mean(samples: &[Sample], field: impl Fn(&Sample) -> f64) -> f64 {
    samples.iter().map(field).sum::<f64>() / samples.len() as f64
}

/// Percent change from `first` to `second`, `None` for a near-zero base
fn percent_drift(first: f64, second: f64) -> Option<f64> {
    if first.abs() < MIN_DENOMINATOR {
        return None;
    }
    Some((second - first) / first * 100.0)
}

/// Elevation gain over a half, normalized to ft/hour
///
/// Needs at least two samples; a single-sample half spans no time, so the
/// rate is undefined.
fn half_climb_rate(half: &[Sample]) -> std::result::Result<f64, String> {
    if half.len() < 2 {
        return Err("single sample, climb rate undefined".to_string());
    }
    let first = &half[0];
    let last = &half[half.len() - 1];
    let dt = last.elapsed_seconds - first.elapsed_seconds;
    Ok((last.elevation - first.elevation) / dt * 3600.0)
}
