use serde::{Deserialize, Serialize};

/// Tuning knobs for automatic mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Minimum header score (0-100) for an automatic assignment.
    pub header_threshold: u8,
    /// Share of sampled values a detector must match to suggest a field.
    pub value_supermajority: f64,
    /// Distinct non-empty values sampled per column.
    pub sample_size: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            header_threshold: 60,
            value_supermajority: 0.8,
            sample_size: 5,
        }
    }
}
