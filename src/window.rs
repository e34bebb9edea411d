//! Sliding-window generation over a sample series
//!
//! Windows start at `start, start + step, ...` and cover `2 * half_width`
//! seconds each, split at the midpoint. The generator only borrows slices
//! from the series; no sample data is copied.

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{AetError, Result};
use crate::models::Window;
use crate::series::SampleSeries;

/// Produces the sequence of sliding windows for a requested time range
#[derive(Debug)]
pub struct WindowGenerator<'a> {
    series: &'a SampleSeries,
    config: &'a AnalysisConfig,
    start: f64,
    end: f64,
}

impl<'a> WindowGenerator<'a> {
    /// Bind a generator to a series and requested `[start, end]` range
    ///
    /// Fails with [`AetError::InvalidRange`] when the range cannot fit
    /// even one full window.
    pub fn new(
        series: &'a SampleSeries,
        config: &'a AnalysisConfig,
        start: f64,
        end: f64,
    ) -> Result<Self> {
        let span = end - start;
        if span < config.window_seconds() {
            return Err(AetError::InvalidRange {
                span_seconds: span,
                window_seconds: config.window_seconds(),
            });
        }
        Ok(Self {
            series,
            config,
            start,
            end,
        })
    }

    /// Number of window offsets in the range before sparseness skips:
    /// `floor((end - start - window_length) / step) + 1`
    pub fn expected_count(&self) -> usize {
        let span = self.end - self.start - self.config.window_seconds();
        (span / self.config.step_seconds).floor() as usize + 1
    }

    /// Iterate the windows, skipping any whose halves contain no samples
    ///
    /// Skipped windows keep their generation index, so diagnostics keyed
    /// by index stay reproducible regardless of gaps.
    pub fn windows(&self) -> impl Iterator<Item = Window<'a>> + '_ {
        let half_width = self.config.half_width_seconds;
        let series = self.series;
        (0..self.expected_count()).filter_map(move |index| {
            // Offsets are recomputed from the index each time so float
            // accumulation cannot shift late windows.
            let offset = self.start + index as f64 * self.config.step_seconds;
            let first_half = series.slice(offset, offset + half_width);
            let second_half = series.slice(offset + half_width, offset + 2.0 * half_width);
            if first_half.is_empty() || second_half.is_empty() {
                debug!(index, offset, "skipping window with an empty half");
                return None;
            }
            Some(Window {
                index,
                start: offset,
                end: offset + 2.0 * half_width,
                first_half,
                second_half,
            })
        })
    }
}
