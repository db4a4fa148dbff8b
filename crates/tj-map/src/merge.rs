//! Merging header and value matches into one mapping.

use std::collections::BTreeSet;

use tj_model::ColumnMatch;
use tracing::{debug, warn};

use crate::patterns::ValueMatchReport;

/// Clears later holders of a field that an earlier column already holds.
///
/// The first column in file order keeps the field.
pub fn enforce_one_to_one(matches: &mut [ColumnMatch]) {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for column in matches.iter_mut() {
        let Some(field) = column.db_field.clone() else {
            continue;
        };
        if !seen.insert(field.clone()) {
            warn!(header = %column.csv_header, field = %field, "field already held by an earlier column");
            column.clear();
        }
    }
}

/// Points column `idx` at `key`, clearing any other column holding `key`.
pub(crate) fn claim(matches: &mut [ColumnMatch], idx: usize, key: &str, score: u8) {
    for (other, column) in matches.iter_mut().enumerate() {
        if other != idx && column.field_is(key) {
            column.clear();
        }
    }
    if let Some(column) = matches.get_mut(idx) {
        column.assign(key, score);
    }
}

/// Combines header matches with value-based suggestions.
///
/// A suggestion applies only to a column that has no header match or one
/// below `threshold`. It always claims its field: whichever other column held
/// the field loses it, however confident that header match was.
pub fn merge_matches(
    header_matches: Vec<ColumnMatch>,
    values: &ValueMatchReport,
    threshold: u8,
) -> Vec<ColumnMatch> {
    let mut merged = header_matches;
    enforce_one_to_one(&mut merged);

    for suggestion in &values.suggestions {
        let Some(idx) = merged
            .iter()
            .position(|m| m.csv_header == suggestion.csv_header)
        else {
            continue;
        };
        if merged[idx].field_is(&suggestion.db_field) {
            continue;
        }
        if merged[idx].is_assigned() && merged[idx].score >= threshold {
            continue;
        }
        debug!(
            header = %suggestion.csv_header,
            field = %suggestion.db_field,
            reason = %suggestion.reason(),
            "applied value suggestion"
        );
        claim(&mut merged, idx, &suggestion.db_field, suggestion.score());
    }
    merged
}
