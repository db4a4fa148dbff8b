//! Trade CSV ingestion.
//!
//! Turns raw CSV text from arbitrary broker exports and spreadsheets into a
//! header list plus string rows, and samples each column for the matchers.
//!
//! # Features
//!
//! - **Decoding**: UTF-8 with BOM stripping, lossy fallback for stray bytes
//! - **Delimiters**: comma, semicolon, or tab, detected from the first lines
//! - **Quoting**: RFC 4180 quoting with embedded commas and newlines
//! - **Ragged rows**: missing trailing cells read as empty
//! - **Sampling**: up to N representative values per column
//!
//! # Example
//!
//! ```ignore
//! use tj_ingest::{read_csv_str, collect_samples, DEFAULT_SAMPLE_SIZE};
//!
//! let table = read_csv_str("Date,Symbol\n31.12.2023,EURUSD\n")?;
//! let samples = collect_samples(&table, DEFAULT_SAMPLE_SIZE);
//! ```

mod table;
mod error;
mod samples;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{CsvTable, RawRow, SourceRow, detect_delimiter, read_csv_file, read_csv_str};

// === Column Sampling ===
pub use samples::{DEFAULT_SAMPLE_SIZE, collect_samples, distinct_values};
