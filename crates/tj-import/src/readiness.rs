//! Pre-submission check for required numeric fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use tj_model::{ColumnMatch, ImportDefaults, TRADE_FIELDS};

/// A required numeric field with neither a column nor a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingField {
    pub key: String,
    pub label: String,
}

/// Validation-level refusal to submit, listing what the user must supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionBlock {
    pub missing: Vec<MissingField>,
}

impl fmt::Display for SubmissionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.missing.iter().map(|m| m.label.as_str()).collect();
        write!(
            f,
            "map a column or set a default for: {}",
            labels.join(", ")
        )
    }
}

/// Refuses submission when a defaultable required field has no column and no default.
pub fn check_ready(
    matches: &[ColumnMatch],
    defaults: &ImportDefaults,
) -> std::result::Result<(), SubmissionBlock> {
    let missing: Vec<MissingField> = TRADE_FIELDS
        .iter()
        .filter(|f| f.required && f.is_defaultable())
        .filter(|f| !matches.iter().any(|m| m.field_is(f.key)))
        .filter(|f| defaults.for_field(f.key).is_none())
        .map(|f| MissingField {
            key: f.key.to_string(),
            label: f.label.to_string(),
        })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SubmissionBlock { missing })
    }
}
