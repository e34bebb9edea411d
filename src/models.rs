use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison strategies for heart-rate drift analysis
///
/// The set is closed by design: each method fixes how heart rate is
/// normalized against effort before the half-to-half comparison. Adding a
/// method is a schema change, not a runtime extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Raw heart rate, no effort normalization
    Raw,
    /// Heart rate divided by speed (mph)
    HrSpeed,
    /// Heart rate divided by elevation gain rate (ft/hour)
    HrElevation,
}

impl Method {
    /// All methods, in reporting order
    pub const ALL: [Method; 3] = [Method::Raw, Method::HrSpeed, Method::HrElevation];

    /// Units of the pace metric for ratio methods, `None` for Raw
    pub fn pace_units(&self) -> Option<&'static str> {
        match self {
            Method::Raw => None,
            Method::HrSpeed => Some("mph"),
            Method::HrElevation => Some("ft/hour"),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Method::Raw => "raw",
            Method::HrSpeed => "hr/speed",
            Method::HrElevation => "hr/elevation",
        };
        write!(f, "{}", label)
    }
}

/// Individual data point in time-series workout data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Elapsed time in seconds from workout start
    pub elapsed_seconds: f64,

    /// Heart rate in beats per minute
    pub heart_rate: f64,

    /// Speed in miles per hour
    pub speed: f64,

    /// Elevation in feet above sea level
    pub elevation: f64,
}

/// One sliding window over the sample series, split at its midpoint
///
/// Windows borrow from the series and are transient: generated, handed to
/// the evaluator, discarded.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    /// Generation index of this window (stable across skipped windows)
    pub index: usize,

    /// Window start offset in seconds
    pub start: f64,

    /// Window end offset in seconds (`start + 2 * half_width`)
    pub end: f64,

    /// Samples in `[start, start + half_width)`
    pub first_half: &'a [Sample],

    /// Samples in `[start + half_width, end)`
    pub second_half: &'a [Sample],
}

impl Window<'_> {
    /// Total number of samples covered by the window
    pub fn sample_count(&self) -> usize {
        self.first_half.len() + self.second_half.len()
    }

    /// Iterate over both halves in time order
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.first_half.iter().chain(self.second_half.iter())
    }
}

/// Drift result for one (window, method) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowResult {
    /// Method that produced this result
    pub method: Method,

    /// Generation index of the source window
    pub window_index: usize,

    /// AeT estimate: mean heart rate over the whole window, in bpm
    pub aet_estimate_bpm: f64,

    /// Percent drift of the method's metric from first to second half
    pub drift_pct: f64,

    /// Percent drift of the pace metric itself (ratio methods only)
    pub pace_drift_pct: Option<f64>,

    /// Pace at which the fitted HR-on-pace line reaches the AeT estimate
    pub pace_at_aet: Option<f64>,
}

impl WindowResult {
    /// Per-window verdict: drift magnitude within the given threshold
    pub fn successful(&self, success_threshold_pct: f64) -> bool {
        self.drift_pct.abs() <= success_threshold_pct
    }
}

/// Aggregated statistics for one method across all valid windows
///
/// Uncertainties are standard errors of the mean (sample standard deviation
/// divided by the square root of the window count).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Method this aggregate describes
    pub method: Method,

    /// Number of windows that produced a valid result for this method
    pub window_count: usize,

    /// Mean AeT estimate across windows, in bpm
    pub mean_aet_bpm: f64,

    /// Standard error of the AeT estimate
    pub aet_uncertainty: f64,

    /// Mean percent drift across windows
    pub mean_drift_pct: f64,

    /// Standard error of the percent drift
    pub drift_uncertainty: f64,

    /// Mean pace drift across windows (ratio methods only)
    pub mean_pace_drift_pct: Option<f64>,

    /// Standard error of the pace drift
    pub pace_drift_uncertainty: Option<f64>,

    /// Mean pace at the AeT estimate (ratio methods only)
    pub mean_pace_at_aet: Option<f64>,

    /// Standard error of the pace at AeT
    pub pace_at_aet_uncertainty: Option<f64>,

    /// Method-level verdict: aggregate drift within the success threshold
    pub successful: bool,
}
