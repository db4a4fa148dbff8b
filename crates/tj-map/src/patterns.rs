//! Value-based field detection.
//!
//! Each column's sampled values are run through a fixed list of detectors.
//! The first detector that matches a supermajority of the samples suggests
//! its field for the column.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tj_model::ColumnSamples;
use tj_model::field::keys;
use tj_normalize::{
    is_date_like, is_date_time_like, is_numeric_code, is_time_like, resolve_direction,
    resolve_outcome,
};
use tracing::debug;

use crate::options::MatchOptions;

/// What a detector recognizes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Date,
    Time,
    Direction,
    Outcome,
}

impl ValueKind {
    const ALL: [ValueKind; 4] = [Self::Date, Self::Time, Self::Direction, Self::Outcome];

    /// Field the detector suggests.
    pub fn field(self) -> &'static str {
        match self {
            Self::Date => keys::TRADE_DATE,
            Self::Time => keys::TRADE_TIME,
            Self::Direction => keys::DIRECTION,
            Self::Outcome => keys::TRADE_OUTCOME,
        }
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Date => is_date_like(value),
            Self::Time => is_time_like(value),
            Self::Direction => resolve_direction(value).is_some(),
            Self::Outcome => resolve_outcome(value).is_some(),
        }
    }

    fn uses_codes(self) -> bool {
        matches!(self, Self::Direction | Self::Outcome)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "dates",
            Self::Time => "times",
            Self::Direction => "trade directions",
            Self::Outcome => "trade outcomes",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field suggested for a column from its values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSuggestion {
    pub csv_header: String,
    pub db_field: String,
    pub kind: ValueKind,
    /// Share of sampled values the detector accepted.
    pub ratio: f64,
    pub matched: usize,
    pub sampled: usize,
}

impl ValueSuggestion {
    /// Confidence on the 0-100 mapping scale.
    pub fn score(&self) -> u8 {
        (self.ratio.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    pub fn reason(&self) -> String {
        format!(
            "{}/{} sampled values look like {}",
            self.matched, self.sampled, self.kind
        )
    }
}

/// Observations that are not assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueHint {
    /// The column holds a date and a time in one cell.
    CombinedDateTime { csv_header: String, ratio: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueMatchReport {
    /// Suggestions in file order.
    pub suggestions: Vec<ValueSuggestion>,
    pub hints: Vec<ValueHint>,
}

impl ValueMatchReport {
    pub fn suggestion_for(&self, header: &str) -> Option<&ValueSuggestion> {
        self.suggestions.iter().find(|s| s.csv_header == header)
    }

    pub fn is_combined_date_time(&self, header: &str) -> bool {
        self.hints.iter().any(|hint| match hint {
            ValueHint::CombinedDateTime { csv_header, .. } => csv_header == header,
        })
    }
}

/// Suggests fields from sampled column values.
#[derive(Debug, Clone, Copy)]
pub struct ValuePatternMatcher {
    supermajority: f64,
}

impl Default for ValuePatternMatcher {
    fn default() -> Self {
        Self::new(&MatchOptions::default())
    }
}

impl ValuePatternMatcher {
    pub fn new(options: &MatchOptions) -> Self {
        Self {
            supermajority: options.value_supermajority,
        }
    }

    pub fn detect(&self, samples: &ColumnSamples) -> ValueMatchReport {
        let mut report = ValueMatchReport::default();
        for column in samples.iter() {
            let values: Vec<&str> = column
                .values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .collect();
            if values.is_empty() {
                continue;
            }
            let sampled = values.len();

            if let Some(suggestion) = ValueKind::ALL
                .into_iter()
                .find_map(|kind| self.try_kind(kind, &column.header, &values))
            {
                debug!(
                    header = %suggestion.csv_header,
                    field = %suggestion.db_field,
                    ratio = suggestion.ratio,
                    "value pattern suggestion"
                );
                report.suggestions.push(suggestion);
                continue;
            }

            let combined = values.iter().filter(|v| is_date_time_like(v)).count();
            let ratio = combined as f64 / sampled as f64;
            if ratio >= self.supermajority {
                debug!(header = %column.header, ratio, "column holds date and time");
                report.hints.push(ValueHint::CombinedDateTime {
                    csv_header: column.header.clone(),
                    ratio,
                });
            }
        }
        report
    }

    fn try_kind(&self, kind: ValueKind, header: &str, values: &[&str]) -> Option<ValueSuggestion> {
        let accepted: Vec<&str> = values.iter().copied().filter(|v| kind.accepts(v)).collect();
        let ratio = accepted.len() as f64 / values.len() as f64;
        if ratio < self.supermajority {
            return None;
        }
        // A lone numeric code ("1" everywhere) says nothing about the column.
        if kind.uses_codes() && accepted.iter().all(|v| is_numeric_code(v)) {
            let distinct: BTreeSet<&str> = accepted.iter().copied().collect();
            if distinct.len() < 2 {
                return None;
            }
        }
        Some(ValueSuggestion {
            csv_header: header.to_string(),
            db_field: kind.field().to_string(),
            kind,
            ratio,
            matched: accepted.len(),
            sampled: values.len(),
        })
    }
}
