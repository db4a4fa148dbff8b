//! Mapping state for interactive mapping workflows.
//!
//! Holds the current column-to-field mapping for one CSV and applies manual
//! edits while keeping each field held by at most one column.

use std::collections::{BTreeMap, BTreeSet};

use tj_model::{ColumnMatch, ColumnSamples, ImportDefaults, MANUAL_SCORE, SchemaField, TRADE_FIELDS};
use tracing::{debug, info};

use crate::error::{MappingError, Result};
use crate::header::HeaderMatcher;
use crate::merge::{claim, enforce_one_to_one, merge_matches};
use crate::options::MatchOptions;
use crate::patterns::{ValueMatchReport, ValuePatternMatcher};

#[derive(Debug, Clone, Default)]
pub struct MappingState {
    matches: Vec<ColumnMatch>,
    values: ValueMatchReport,
    /// Headers whose field was set by hand.
    manual: BTreeSet<String>,
}

impl MappingState {
    /// Wraps existing matches; later duplicates of a field are cleared.
    pub fn new(mut matches: Vec<ColumnMatch>) -> Self {
        enforce_one_to_one(&mut matches);
        Self {
            matches,
            values: ValueMatchReport::default(),
            manual: BTreeSet::new(),
        }
    }

    /// Runs header and value matching and merges the results.
    pub fn detect(headers: &[String], samples: &ColumnSamples, options: &MatchOptions) -> Self {
        Self::detect_with_glosses(headers, &BTreeMap::new(), samples, options)
    }

    /// Like [`MappingState::detect`], also scoring translated header glosses.
    pub fn detect_with_glosses(
        headers: &[String],
        glosses: &BTreeMap<String, String>,
        samples: &ColumnSamples,
        options: &MatchOptions,
    ) -> Self {
        let header_matches = HeaderMatcher::new(*options).match_with_glosses(headers, glosses);
        let values = ValuePatternMatcher::new(options).detect(samples);
        let matches = merge_matches(header_matches, &values, options.header_threshold);
        let state = Self {
            matches,
            values,
            manual: BTreeSet::new(),
        };
        let summary = state.summary();
        info!(
            columns = summary.total_columns,
            mapped = summary.mapped,
            required_mapped = summary.required_mapped,
            required_total = summary.required_total,
            "column mapping detected"
        );
        state
    }

    pub fn matches(&self) -> &[ColumnMatch] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<ColumnMatch> {
        self.matches
    }

    pub fn value_report(&self) -> &ValueMatchReport {
        &self.values
    }

    /// Header currently holding `key`.
    pub fn column_for(&self, key: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.field_is(key))
            .map(|m| m.csv_header.as_str())
    }

    /// Field currently assigned to `header`.
    pub fn field_of(&self, header: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|m| m.csv_header == header)
            .and_then(|m| m.db_field.as_deref())
    }

    /// True when the column was flagged as holding a date and a time.
    pub fn is_combined_date_time(&self, header: &str) -> bool {
        self.values.is_combined_date_time(header)
    }

    pub fn is_manual(&self, header: &str) -> bool {
        self.manual.contains(header)
    }

    fn position(&self, header: &str) -> Result<usize> {
        self.matches
            .iter()
            .position(|m| m.csv_header == header)
            .ok_or_else(|| MappingError::ColumnNotFound(header.to_string()))
    }

    /// Assigns `key` to `header` by hand.
    ///
    /// Any other column holding `key` loses it. The score is pinned to
    /// [`MANUAL_SCORE`].
    pub fn assign(&mut self, header: &str, key: &str) -> Result<()> {
        let idx = self.position(header)?;
        let field = tj_model::field(key).ok_or_else(|| MappingError::FieldNotFound(key.to_string()))?;
        claim(&mut self.matches, idx, field.key, MANUAL_SCORE);
        self.manual.insert(header.to_string());
        Ok(())
    }

    /// Removes the field from `header`. Returns whether anything was assigned.
    pub fn clear(&mut self, header: &str) -> Result<bool> {
        let idx = self.position(header)?;
        let was_assigned = self.matches[idx].is_assigned();
        self.matches[idx].clear();
        self.manual.insert(header.to_string());
        Ok(was_assigned)
    }

    /// Hand-made edits as (header, field) pairs; `None` means cleared.
    pub fn manual_edits(&self) -> Vec<(String, Option<String>)> {
        self.manual
            .iter()
            .filter_map(|header| {
                self.matches
                    .iter()
                    .find(|m| &m.csv_header == header)
                    .map(|m| (header.clone(), m.db_field.clone()))
            })
            .collect()
    }

    /// Replays edits taken from [`MappingState::manual_edits`] of another state.
    ///
    /// Edits naming unknown headers or fields are skipped.
    pub fn replay_manual(&mut self, edits: &[(String, Option<String>)]) {
        for (header, field) in edits {
            let outcome = match field {
                Some(key) => self.assign(header, key),
                None => self.clear(header).map(|_| ()),
            };
            if let Err(err) = outcome {
                debug!(header = %header, error = %err, "manual edit not replayed");
            }
        }
    }

    /// Required fields neither mapped nor covered by an import default.
    pub fn missing_required(&self, defaults: &ImportDefaults) -> Vec<&'static SchemaField> {
        TRADE_FIELDS
            .iter()
            .filter(|f| f.required)
            .filter(|f| self.column_for(f.key).is_none())
            .filter(|f| defaults.for_field(f.key).is_none())
            .collect()
    }

    pub fn summary(&self) -> MappingSummary {
        let required_total = TRADE_FIELDS.iter().filter(|f| f.required).count();
        let required_mapped = self
            .matches
            .iter()
            .filter(|m| m.is_assigned() && m.required)
            .count();
        MappingSummary {
            total_columns: self.matches.len(),
            mapped: self.matches.iter().filter(|m| m.is_assigned()).count(),
            manual: self.manual.len(),
            required_total,
            required_mapped,
            unmapped_columns: self
                .matches
                .iter()
                .filter(|m| !m.is_assigned())
                .map(|m| m.csv_header.clone())
                .collect(),
        }
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSummary {
    pub total_columns: usize,
    /// Columns with a field.
    pub mapped: usize,
    /// Columns edited by hand.
    pub manual: usize,
    pub required_total: usize,
    /// Required fields held by some column.
    pub required_mapped: usize,
    pub unmapped_columns: Vec<String>,
}
