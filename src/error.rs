//! Unified error hierarchy for aetrs
//!
//! Fatal errors (`MalformedInput`, `InvalidRange`) abort the whole analysis
//! and carry enough context to fix the input. Recoverable errors
//! (`DegenerateWindow`, `InsufficientData`) are absorbed at the window or
//! method level and surface only as a reduced window count.

use thiserror::Error;

use crate::models::Method;

/// Convenience result type using [`AetError`]
pub type Result<T> = std::result::Result<T, AetError>;

/// Top-level error type for all aetrs operations
#[derive(Debug, Error)]
pub enum AetError {
    /// Input series violates ordering/shape invariants
    #[error("Malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    /// Requested range cannot fit even one window
    #[error("Range of {span_seconds:.0}s cannot fit a single {window_seconds:.0}s window")]
    InvalidRange {
        span_seconds: f64,
        window_seconds: f64,
    },

    /// A single window's arithmetic is undefined for one method
    #[error("Window {window_index} is degenerate for {method}: {reason}")]
    DegenerateWindow {
        window_index: usize,
        method: Method,
        reason: String,
    },

    /// A method produced zero valid windows
    #[error("No valid windows for method {method}")]
    InsufficientData { method: Method },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AetError {
    /// Whether the analysis as a whole must abort on this error
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AetError::DegenerateWindow { .. } | AetError::InsufficientData { .. }
        )
    }
}
