//! Error types for the translator client.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranslateError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("translator returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected shape.
    #[error("malformed translator response: {0}")]
    Malformed(String),

    /// The response did not arrive within the time budget.
    #[error("translator timed out after {0} ms")]
    Timeout(u128),
}

impl TranslateError {
    /// Short explanation suitable for a log line shown to end users.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) | Self::Timeout(_) => {
                "Translation service unavailable; continuing without translations."
            }
            Self::Status { .. } | Self::Malformed(_) => {
                "Translation service returned an unusable answer; continuing without translations."
            }
        }
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
