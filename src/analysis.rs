//! End-to-end drift analysis driver
//!
//! Ties the pipeline together: generate windows for the requested range,
//! evaluate every (window, method) pair, and aggregate per method. Window
//! evaluations are independent, so they run on the rayon pool; results are
//! keyed by generation index and re-sorted before aggregation, keeping the
//! output reproducible regardless of scheduling.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::Aggregator;
use crate::config::AnalysisConfig;
use crate::error::{AetError, Result};
use crate::evaluate::MethodEvaluator;
use crate::models::{AggregateResult, Method, WindowResult};
use crate::series::SampleSeries;
use crate::window::WindowGenerator;

/// Full output of one analysis run
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AnalysisReport {
    /// Window offsets generated for the range, before any skipping
    pub windows_generated: usize,

    /// One aggregate per method that produced at least one valid window,
    /// in [`Method::ALL`] order
    pub results: Vec<AggregateResult>,
}

impl AnalysisReport {
    /// Aggregate for one method, if it survived
    pub fn for_method(&self, method: Method) -> Option<&AggregateResult> {
        self.results.iter().find(|r| r.method == method)
    }
}

/// Runs the sliding-window decoupling test over a sample series
pub struct DriftAnalyzer {
    config: AnalysisConfig,
}

impl DriftAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `[start, end]` of the series with all three methods
    ///
    /// Fatal errors (bad range) abort; degenerate windows and methods with
    /// zero valid windows are absorbed, surfacing only as reduced window
    /// counts or a missing method in the report.
    #[instrument(skip(self, series), fields(samples = series.len()))]
    pub fn analyze(&self, series: &SampleSeries, start: f64, end: f64) -> Result<AnalysisReport> {
        let generator = WindowGenerator::new(series, &self.config, start, end)?;
        let windows: Vec<_> = generator.windows().collect();
        info!(
            generated = generator.expected_count(),
            usable = windows.len(),
            "generated analysis windows"
        );

        // Each (window, method) evaluation is independent; collect() keeps
        // rayon's output in window order.
        let evaluations: Vec<Vec<Result<WindowResult>>> = windows
            .par_iter()
            .map(|window| {
                Method::ALL
                    .iter()
                    .map(|&method| MethodEvaluator::evaluate(window, method))
                    .collect()
            })
            .collect();

        let mut per_method: Vec<(Method, Vec<WindowResult>)> = Method::ALL
            .iter()
            .map(|&m| (m, Vec::with_capacity(windows.len())))
            .collect();
        for window_results in evaluations {
            for outcome in window_results {
                match outcome {
                    Ok(result) => {
                        let slot = per_method
                            .iter_mut()
                            .find(|(m, _)| *m == result.method)
                            .map(|(_, v)| v);
                        if let Some(v) = slot {
                            v.push(result);
                        }
                    }
                    Err(AetError::DegenerateWindow {
                        window_index,
                        method,
                        reason,
                    }) => {
                        debug!(window_index, %method, %reason, "window excluded");
                    }
                    Err(fatal) => return Err(fatal),
                }
            }
        }

        let aggregator = Aggregator::new(self.config.success_threshold_pct);
        let mut results = Vec::with_capacity(Method::ALL.len());
        for (method, window_results) in per_method {
            match aggregator.aggregate(method, window_results) {
                Ok(aggregate) => results.push(aggregate),
                Err(AetError::InsufficientData { method }) => {
                    warn!(%method, "method excluded: no valid windows");
                }
                Err(fatal) => return Err(fatal),
            }
        }

        Ok(AnalysisReport {
            windows_generated: generator.expected_count(),
            results,
        })
    }
}
