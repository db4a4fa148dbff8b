//! Error types for mapping operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Header not present in the loaded CSV.
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    /// Key not present in the field catalog.
    #[error("field not found: {0}")]
    FieldNotFound(String),
}

pub type Result<T> = std::result::Result<T, MappingError>;
