use serde::{Deserialize, Serialize};
use std::fmt;

/// Why one CSV row could not become a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based data row position in the source CSV (header excluded).
    pub row_index: usize,
    /// Schema field key the failure is about.
    pub field: String,
    pub message: String,
}

impl RowError {
    pub fn new(row_index: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row_index,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}: {}", self.row_index, self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display() {
        let error = RowError::new(3, "trade_date", "invalid date");
        assert_eq!(error.to_string(), "row 3: trade_date: invalid date");
    }
}
