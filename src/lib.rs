// Library interface for the aetrs modules
// This allows integration tests to access the core functionality

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod import;
pub mod logging;
pub mod models;
pub mod regression;
pub mod report;
pub mod series;
pub mod window;

// Re-export commonly used types for convenience
pub use aggregate::Aggregator;
pub use analysis::{AnalysisReport, DriftAnalyzer};
pub use config::AnalysisConfig;
pub use error::{AetError, Result};
pub use evaluate::MethodEvaluator;
pub use import::CsvImporter;
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use models::{AggregateResult, Method, Sample, Window, WindowResult};
pub use series::SampleSeries;
pub use window::WindowGenerator;
