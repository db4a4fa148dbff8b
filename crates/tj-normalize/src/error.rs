use thiserror::Error;

/// Why a raw cell could not be turned into a value for its field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("unrecognized date: {0}")]
    InvalidDate(String),
    #[error("unrecognized time: {0}")]
    InvalidTime(String),
    #[error("not a number: {0}")]
    InvalidNumber(String),
    #[error("unrecognized {field} value: {value}")]
    UnknownCategory { field: String, value: String },
}
