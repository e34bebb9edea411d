//! Import of workout timeseries data
//!
//! The analysis core consumes a flat timestamped table; conversion from
//! proprietary activity exports happens upstream. This module owns the CSV
//! contract: column mapping, elapsed-time parsing, and gap warnings.

pub mod csv;

pub use self::csv::{parse_elapsed, CsvImporter};
