//! Column mapping types for CSV-to-schema matching.

use serde::{Deserialize, Serialize};

use crate::field::{self, ValueType};

/// Score pinned on matches the user assigned by hand.
pub const MANUAL_SCORE: u8 = 100;

/// Mapping state for one CSV column.
///
/// Across a full set of matches, a given non-null `db_field` is held by at
/// most one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMatch {
    /// Header as it appears in the file (after whitespace normalization).
    pub csv_header: String,
    /// Assigned schema field key, if any.
    pub db_field: Option<String>,
    /// Match confidence, 0 to 100.
    pub score: u8,
    /// Whether the assigned field is required.
    pub required: bool,
    /// Value type of the assigned field.
    pub value_type: Option<ValueType>,
}

impl ColumnMatch {
    /// An unassigned column.
    pub fn unassigned(csv_header: impl Into<String>) -> Self {
        Self {
            csv_header: csv_header.into(),
            db_field: None,
            score: 0,
            required: false,
            value_type: None,
        }
    }

    /// A column assigned to `key`, with field metadata filled from the catalog.
    pub fn assigned(csv_header: impl Into<String>, key: &str, score: u8) -> Self {
        let mut column = Self::unassigned(csv_header);
        column.assign(key, score);
        column
    }

    /// Points this column at `key`. Unknown keys leave the column unassigned.
    pub fn assign(&mut self, key: &str, score: u8) {
        match field::field(key) {
            Some(f) => {
                self.db_field = Some(f.key.to_string());
                self.score = score.min(MANUAL_SCORE);
                self.required = f.required;
                self.value_type = Some(f.value_type);
            }
            None => self.clear(),
        }
    }

    pub fn clear(&mut self) {
        self.db_field = None;
        self.score = 0;
        self.required = false;
        self.value_type = None;
    }

    pub fn is_assigned(&self) -> bool {
        self.db_field.is_some()
    }

    pub fn field_is(&self, key: &str) -> bool {
        self.db_field.as_deref() == Some(key)
    }
}

/// Representative non-empty values of one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSample {
    pub header: String,
    pub values: Vec<String>,
}

/// Sampled values for every column, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSamples {
    pub columns: Vec<ColumnSample>,
}

impl ColumnSamples {
    pub fn new(columns: Vec<ColumnSample>) -> Self {
        Self { columns }
    }

    /// Values sampled for a header; empty when the header is unknown.
    pub fn get(&self, header: &str) -> &[String] {
        self.columns
            .iter()
            .find(|c| c.header == header)
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSample> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_fills_field_metadata() {
        let column = ColumnMatch::assigned("Symbol", "market", 87);
        assert_eq!(column.db_field.as_deref(), Some("market"));
        assert!(column.required);
        assert_eq!(column.value_type, Some(ValueType::Text));
    }

    #[test]
    fn unknown_key_leaves_column_unassigned() {
        let column = ColumnMatch::assigned("Symbol", "nope", 87);
        assert!(!column.is_assigned());
        assert_eq!(column.score, 0);
    }

    #[test]
    fn samples_lookup_by_header() {
        let samples = ColumnSamples::new(vec![ColumnSample {
            header: "Side".into(),
            values: vec!["buy".into(), "sell".into()],
        }]);
        assert_eq!(samples.get("Side").len(), 2);
        assert!(samples.get("Other").is_empty());
    }
}
