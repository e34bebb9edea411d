//! Validated, time-ordered sample storage
//!
//! A [`SampleSeries`] is built once from imported rows and never mutated
//! afterwards. Everything downstream (windowing, evaluation) only borrows
//! slices from it, so no locking discipline is needed beyond immutability.

use tracing::info;

use crate::error::{AetError, Result};
use crate::models::Sample;

/// Number of consecutive samples averaged when screening outliers
const OUTLIER_ROLLING_SAMPLES: usize = 5;

/// Immutable, strictly time-ordered collection of workout samples
#[derive(Debug, Clone)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    /// Build a series from rows, validating shape and ordering
    ///
    /// Fails with [`AetError::MalformedInput`] if any field is non-finite,
    /// timestamps are not strictly increasing, or fewer than two samples
    /// exist. The error names the offending row so the input can be fixed.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(AetError::MalformedInput {
                row: samples.len(),
                reason: format!("series needs at least 2 samples, got {}", samples.len()),
            });
        }

        for (row, sample) in samples.iter().enumerate() {
            for (field, value) in [
                ("timestamp", sample.elapsed_seconds),
                ("heart_rate", sample.heart_rate),
                ("speed", sample.speed),
                ("elevation", sample.elevation),
            ] {
                if !value.is_finite() {
                    return Err(AetError::MalformedInput {
                        row,
                        reason: format!("{} is not a finite number", field),
                    });
                }
            }
        }

        for (row, pair) in samples.windows(2).enumerate() {
            if pair[1].elapsed_seconds <= pair[0].elapsed_seconds {
                return Err(AetError::MalformedInput {
                    row: row + 1,
                    reason: format!(
                        "timestamp {:.3}s does not increase past {:.3}s",
                        pair[1].elapsed_seconds, pair[0].elapsed_seconds
                    ),
                });
            }
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the first sample in seconds
    pub fn start_seconds(&self) -> f64 {
        self.samples[0].elapsed_seconds
    }

    /// Timestamp of the last sample in seconds
    pub fn end_seconds(&self) -> f64 {
        self.samples[self.samples.len() - 1].elapsed_seconds
    }

    /// All samples with `start <= timestamp < end`
    ///
    /// Runs in O(log n + k) via binary search on the sorted timestamps;
    /// windows slide at a 1-second default step, so a linear scan per
    /// window would be quadratic in series length.
    pub fn slice(&self, start: f64, end: f64) -> &[Sample] {
        let lo = self
            .samples
            .partition_point(|s| s.elapsed_seconds < start);
        let hi = self.samples.partition_point(|s| s.elapsed_seconds < end);
        &self.samples[lo..hi]
    }

    /// Drop samples whose rolling-mean speed or climb rate exceeds a cap
    ///
    /// Screens out brief downhill or sprint sections that would skew the
    /// drift ratios, mirroring the `--max-speed`/`--max-climb` workflow.
    /// Samples without enough history for a full rolling mean are kept.
    pub fn without_outliers(
        self,
        max_speed: Option<f64>,
        max_climb_rate: Option<f64>,
    ) -> Result<Self> {
        if max_speed.is_none() && max_climb_rate.is_none() {
            return Ok(self);
        }

        let climb_rates = climb_rates(&self.samples);
        let before = self.samples.len();
        let mut kept = Vec::with_capacity(before);

        let mut speed_window = RollingMean::new(OUTLIER_ROLLING_SAMPLES);
        let mut climb_window = RollingMean::new(OUTLIER_ROLLING_SAMPLES);

        for (i, sample) in self.samples.into_iter().enumerate() {
            let rolling_speed = speed_window.push(sample.speed);
            let rolling_climb = climb_window.push(climb_rates[i]);

            let over_speed = matches!((max_speed, rolling_speed), (Some(cap), Some(v)) if v > cap);
            let over_climb =
                matches!((max_climb_rate, rolling_climb), (Some(cap), Some(v)) if v > cap);
            if !(over_speed || over_climb) {
                kept.push(sample);
            }
        }

        let removed = before - kept.len();
        if removed > 0 {
            info!(removed, "excluded outlier samples above configured caps");
        }
        Self::new(kept)
    }
}

/// Per-sample elevation gain rate in ft/hour
///
/// The rate at index `i` is computed from the elevation and time deltas
/// between samples `i - 1` and `i`; the first sample carries rate 0.
pub(crate) fn climb_rates(samples: &[Sample]) -> Vec<f64> {
    let mut rates = Vec::with_capacity(samples.len());
    rates.push(0.0);
    for pair in samples.windows(2) {
        let dt = pair[1].elapsed_seconds - pair[0].elapsed_seconds;
        let delta = pair[1].elevation - pair[0].elevation;
        rates.push(delta / dt * 3600.0);
    }
    rates
}

/// Fixed-capacity rolling mean over the last `capacity` values
struct RollingMean {
    capacity: usize,
    values: std::collections::VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: std::collections::VecDeque::with_capacity(capacity),
            sum: 0.0,
        }
    }

    /// Push a value; returns the mean only once the window is full
    fn push(&mut self, value: f64) -> Option<f64> {
        if self.values.len() == self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() == self.capacity {
            Some(self.sum / self.capacity as f64)
        } else {
            None
        }
    }
}
