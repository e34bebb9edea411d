//! CSV importer with flexible column mapping
//!
//! Accepts the flat table produced by the activity converter: an elapsed
//! timestamp plus heart rate, speed, and elevation columns. Column names
//! vary between exporters, so each required field maps from a set of known
//! aliases. Rows must be strictly time-ordered; gaps larger than the
//! configured threshold are logged so the user knows which stretches the
//! windowing will skip.

use chrono::NaiveTime;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AetError, Result};
use crate::models::Sample;
use crate::series::SampleSeries;

/// Default inter-sample gap, in seconds, that triggers a warning
pub const DEFAULT_GAP_WARN_SECONDS: f64 = 5.0;

/// Loads a [`SampleSeries`] from a timestamped CSV file
pub struct CsvImporter {
    column_mapping: HashMap<String, String>,
    gap_warn_seconds: f64,
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        Self::add_mapping(
            &mut column_mapping,
            "timestamp",
            &["timestamp", "activity", "time", "elapsed", "elapsed_time"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "heart_rate",
            &["heart_rate", "hr", "heartrate", "bpm"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "speed",
            &["speed", "enhanced_speed", "mph", "velocity"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "elevation",
            &["elevation", "altitude", "alt", "elev"],
        );

        Self {
            column_mapping,
            gap_warn_seconds: DEFAULT_GAP_WARN_SECONDS,
        }
    }

    /// Override the gap-warning threshold
    pub fn with_gap_threshold(mut self, seconds: f64) -> Self {
        self.gap_warn_seconds = seconds;
        self
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    /// Read and validate a CSV file into a series
    pub fn import(&self, path: &Path) -> Result<SampleSeries> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let mut columns: HashMap<&str, usize> = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            if let Some(standard) = self.column_mapping.get(&name.to_lowercase()) {
                columns.entry(standard.as_str()).or_insert(idx);
            }
        }

        let missing: Vec<&str> = ["timestamp", "heart_rate", "speed", "elevation"]
            .into_iter()
            .filter(|c| !columns.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(AetError::MalformedInput {
                row: 0,
                reason: format!("CSV missing required column(s): {}", missing.join(", ")),
            });
        }

        let ts_idx = columns["timestamp"];
        let hr_idx = columns["heart_rate"];
        let speed_idx = columns["speed"];
        let elev_idx = columns["elevation"];

        let mut samples: Vec<Sample> = Vec::new();
        let mut gaps = 0usize;
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // Header is row 0 in user-facing positions
            let row = i + 1;

            let raw_ts = field(&record, ts_idx, "timestamp", row)?;
            let elapsed_seconds =
                parse_elapsed(raw_ts).ok_or_else(|| AetError::MalformedInput {
                    row,
                    reason: format!(
                        "timestamp '{}' is neither seconds nor an H:M[:S] time",
                        raw_ts
                    ),
                })?;

            if let Some(prev) = samples.last() {
                let dt = elapsed_seconds - prev.elapsed_seconds;
                if dt > self.gap_warn_seconds {
                    warn!(
                        gap_start = prev.elapsed_seconds,
                        gap_seconds = dt,
                        "data gap; windows falling inside it will be skipped"
                    );
                    gaps += 1;
                }
            }

            samples.push(Sample {
                elapsed_seconds,
                heart_rate: numeric(&record, hr_idx, "heart_rate", row)?,
                speed: numeric(&record, speed_idx, "speed", row)?,
                elevation: numeric(&record, elev_idx, "elevation", row)?,
            });
        }

        info!(
            rows = samples.len(),
            gaps,
            path = %path.display(),
            "loaded workout timeseries"
        );
        SampleSeries::new(samples)
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
    row: usize,
) -> Result<&'r str> {
    record.get(idx).ok_or_else(|| AetError::MalformedInput {
        row,
        reason: format!("missing value for column '{}'", name),
    })
}

fn numeric(record: &csv::StringRecord, idx: usize, name: &str, row: usize) -> Result<f64> {
    let raw = field(record, idx, name, row)?;
    raw.parse::<f64>().map_err(|_| AetError::MalformedInput {
        row,
        reason: format!("column '{}' value '{}' is not numeric", name, raw),
    })
}

/// Parse an elapsed timestamp into seconds
///
/// Accepts plain seconds (`1234` or `1234.5`), `H:M:S`, or `H:M`, matching
/// the formats the converter and CLI use.
pub fn parse_elapsed(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<f64>() {
        return seconds.is_finite().then_some(seconds);
    }
    let format = match value.matches(':').count() {
        2 => "%H:%M:%S",
        1 => "%H:%M",
        _ => return None,
    };
    let time = NaiveTime::parse_from_str(value, format).ok()?;
    let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
    Some((time - midnight).num_seconds() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elapsed_formats() {
        assert_eq!(parse_elapsed("90"), Some(90.0));
        assert_eq!(parse_elapsed("90.5"), Some(90.5));
        assert_eq!(parse_elapsed("0:01:30"), Some(90.0));
        assert_eq!(parse_elapsed("1:30"), Some(5400.0));
        assert_eq!(parse_elapsed("01:02:03"), Some(3723.0));
        assert_eq!(parse_elapsed("not a time"), None);
        assert_eq!(parse_elapsed("1:2:3:4"), None);
    }
}
