//! Analysis configuration
//!
//! All tunables travel in an explicit [`AnalysisConfig`] handed to the
//! window generator and evaluator at construction time; there is no
//! process-wide configuration state.

use serde::{Deserialize, Serialize};

use crate::error::{AetError, Result};

/// Default slide increment between consecutive windows, in seconds
pub const DEFAULT_STEP_SECONDS: f64 = 1.0;

/// Default duration of one half of the decoupling test, in seconds
pub const DEFAULT_HALF_WIDTH_SECONDS: f64 = 30.0 * 60.0;

/// Default drift tolerance, in percent
///
/// Matches the standard aerobic-decoupling convention: drift within ±5%
/// indicates the effort stayed aerobic.
pub const DEFAULT_SUCCESS_THRESHOLD_PCT: f64 = 5.0;

/// Tunable parameters for a drift analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Seconds to slide the window between evaluations
    pub step_seconds: f64,

    /// Seconds in each half of a window (window length is twice this)
    pub half_width_seconds: f64,

    /// Maximum drift magnitude, in percent, for a passing verdict
    pub success_threshold_pct: f64,

    /// Optional cap on rolling-mean speed (mph); faster samples are dropped
    pub max_speed: Option<f64>,

    /// Optional cap on rolling-mean climb rate (ft/hour)
    pub max_climb_rate: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step_seconds: DEFAULT_STEP_SECONDS,
            half_width_seconds: DEFAULT_HALF_WIDTH_SECONDS,
            success_threshold_pct: DEFAULT_SUCCESS_THRESHOLD_PCT,
            max_speed: None,
            max_climb_rate: None,
        }
    }
}

impl AnalysisConfig {
    /// Full window length in seconds (`2 * half_width`)
    pub fn window_seconds(&self) -> f64 {
        2.0 * self.half_width_seconds
    }

    /// Reject non-positive durations and negative thresholds up front
    pub fn validate(&self) -> Result<()> {
        if !(self.step_seconds.is_finite() && self.step_seconds > 0.0) {
            return Err(AetError::Configuration(format!(
                "step must be a positive number of seconds, got {}",
                self.step_seconds
            )));
        }
        if !(self.half_width_seconds.is_finite() && self.half_width_seconds > 0.0) {
            return Err(AetError::Configuration(format!(
                "half width must be a positive number of seconds, got {}",
                self.half_width_seconds
            )));
        }
        if !(self.success_threshold_pct.is_finite() && self.success_threshold_pct >= 0.0) {
            return Err(AetError::Configuration(format!(
                "success threshold must be a non-negative percentage, got {}",
                self.success_threshold_pct
            )));
        }
        for (name, cap) in [
            ("max speed", self.max_speed),
            ("max climb rate", self.max_climb_rate),
        ] {
            if let Some(v) = cap {
                if !(v.is_finite() && v > 0.0) {
                    return Err(AetError::Configuration(format!(
                        "{} cap must be positive, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_decoupling_convention() {
        let config = AnalysisConfig::default();
        assert_eq!(config.step_seconds, 1.0);
        assert_eq!(config.half_width_seconds, 1800.0);
        assert_eq!(config.window_seconds(), 3600.0);
        assert_eq!(config.success_threshold_pct, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_nonpositive_step() {
        let config = AnalysisConfig {
            step_seconds: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AetError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let config = AnalysisConfig {
            success_threshold_pct: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nonpositive_caps() {
        let config = AnalysisConfig {
            max_speed: Some(0.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
