//! CSV header normalization.

use std::collections::BTreeMap;

/// Trims, strips a stray BOM, and collapses inner whitespace runs.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Names blank headers by position and makes repeated headers unique.
///
/// The first occurrence keeps its text; later ones get ` (2)`, ` (3)`, ...
/// so every column stays addressable by name.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.is_empty() {
                format!("Column {}", idx + 1)
            } else {
                header
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{base} ({count})")
            }
        })
        .collect()
}
