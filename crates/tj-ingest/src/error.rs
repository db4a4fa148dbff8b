//! Error types for trade CSV ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Structural failures that stop an import before any row is processed.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input has no non-blank lines at all.
    #[error("the CSV file is empty")]
    EmptyCsv,

    /// A first line exists but holds no usable column names.
    #[error("could not read CSV headers: the first line has no column names")]
    NoHeaders,

    /// The CSV parser rejected the input.
    #[error("could not parse CSV: {message}")]
    Csv { message: String },
}

impl IngestError {
    /// Short text suitable for showing to the person running the import.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::FileRead { .. } => "The file could not be opened.",
            Self::EmptyCsv => "The file is empty.",
            Self::NoHeaders => "Could not read CSV headers. Make sure the first line lists the column names.",
            Self::Csv { .. } => "The file is not a valid CSV document.",
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
