//! Column sampling for value-pattern matching and normalizer construction.

use std::collections::BTreeSet;

use tj_model::{ColumnSample, ColumnSamples};

use crate::table::CsvTable;

/// Values kept per column by default.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Takes up to `limit` distinct non-empty values per column, in row order.
pub fn collect_samples(table: &CsvTable, limit: usize) -> ColumnSamples {
    let columns = table
        .headers
        .iter()
        .map(|header| ColumnSample {
            header: header.clone(),
            values: first_distinct(table.column(header), limit),
        })
        .collect();
    ColumnSamples::new(columns)
}

/// Every distinct non-empty value of a column, in order of first appearance.
pub fn distinct_values(table: &CsvTable, header: &str) -> Vec<String> {
    first_distinct(table.column(header), usize::MAX)
}

fn first_distinct<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for value in values {
        if out.len() >= limit {
            break;
        }
        if value.is_empty() || !seen.insert(value) {
            continue;
        }
        out.push(value.to_string());
    }
    out
}
