//! Error types for the import pipeline.

use thiserror::Error;
use tj_ingest::IngestError;

use crate::readiness::SubmissionBlock;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The CSV could not be read; nothing was processed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Submission refused before contacting storage.
    #[error("{0}")]
    SubmissionBlocked(SubmissionBlock),

    /// The storage call itself failed; no rows are known to be stored.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ImportError {
    /// Short text suitable for showing to the person running the import.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Ingest(err) => err.user_message().to_string(),
            Self::SubmissionBlocked(block) => block.to_string(),
            Self::Storage(_) => "The trades could not be saved. Nothing was imported.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_message_passes_through() {
        let err = ImportError::from(IngestError::NoHeaders);
        assert!(err.user_message().starts_with("Could not read CSV headers"));
        assert!(err.to_string().starts_with("could not read CSV headers"));
    }
}
