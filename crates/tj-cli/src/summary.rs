//! Terminal output for mappings, validation results and import reports.

use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tj_import::{ImportFailure, ImportReport, ParseOutcome};
use tj_map::{MappingState, ScoringEngine, ValueHint};
use tj_model::{ColumnSamples, SchemaField, TRADE_FIELDS, field};

/// Failures listed when the full list was not asked for.
pub const ERROR_PREVIEW_LIMIT: usize = 10;

pub fn print_fields() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Aliases"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in TRADE_FIELDS {
        let required = if field.is_defaultable() {
            Cell::new("default").fg(Color::Yellow)
        } else if field.required {
            Cell::new("yes").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(field.key),
            Cell::new(field.label),
            Cell::new(field.value_type),
            required,
            dim_cell(field.aliases.join(", ")),
        ]);
    }
    println!("{table}");
}

pub fn print_mapping(mapping: &MappingState, samples: &ColumnSamples) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Score"),
        header_cell("Source"),
        header_cell("Samples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in mapping.matches() {
        let field_cell = match column.db_field.as_deref() {
            Some(key) if column.required => Cell::new(key).add_attribute(Attribute::Bold),
            Some(key) => Cell::new(key),
            None => dim_cell("-"),
        };
        let score_cell = if column.is_assigned() {
            Cell::new(column.score)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(&column.csv_header),
            field_cell,
            score_cell,
            dim_cell(mapping_source(mapping, &column.csv_header, column.db_field.as_deref())),
            Cell::new(samples.get(&column.csv_header).join(", ")),
        ]);
    }
    println!("{table}");

    let weak = weak_match_notes(mapping);
    if !weak.is_empty() {
        println!("Fuzzy header matches:");
        for note in weak {
            println!("- {note}");
        }
    }

    for hint in &mapping.value_report().hints {
        match hint {
            ValueHint::CombinedDateTime { csv_header, .. } => {
                println!("Note: '{csv_header}' holds a date and a time; the time is read from it too.");
            }
        }
    }
}

fn mapping_source(mapping: &MappingState, header: &str, field: Option<&str>) -> &'static str {
    let Some(field) = field else {
        return "-";
    };
    if mapping.is_manual(header) {
        return "manual";
    }
    match mapping.value_report().suggestion_for(header) {
        Some(suggestion) if suggestion.db_field == field => "values",
        _ => "header",
    }
}

/// Score breakdowns for header matches that were not exact.
///
/// Matches won through a translated header are left out, since their own
/// text does not explain the score.
pub fn weak_match_notes(mapping: &MappingState) -> Vec<String> {
    let engine = ScoringEngine::new();
    mapping
        .matches()
        .iter()
        .filter(|column| column.is_assigned() && column.score < 100)
        .filter_map(|column| {
            let key = column.db_field.as_deref()?;
            if mapping_source(mapping, &column.csv_header, Some(key)) != "header" {
                return None;
            }
            let scored = engine.score(&column.csv_header, field(key)?);
            (scored.score == column.score).then(|| {
                format!(
                    "'{}' -> {key} ({}): {}",
                    column.csv_header,
                    column.score,
                    scored.explain()
                )
            })
        })
        .collect()
}

pub fn print_missing(missing: &[&SchemaField]) {
    if missing.is_empty() {
        return;
    }
    println!();
    println!("Required fields without a column:");
    for field in missing {
        if field.is_defaultable() {
            println!("- {} ({}): map a column or set a default", field.label, field.key);
        } else {
            println!("- {} ({}): map a column", field.label, field.key);
        }
    }
}

pub fn print_parse_outcome(outcome: &ParseOutcome, all_errors: bool) {
    println!();
    println!(
        "Rows: {} valid, {} with errors, {} blank",
        outcome.accepted.len(),
        outcome.rejected_rows(),
        outcome.skipped_blank
    );
    let failures: Vec<ImportFailure> = outcome
        .errors
        .iter()
        .cloned()
        .map(ImportFailure::from)
        .collect();
    print_failure_table(&failures, all_errors);
}

pub fn print_report(report: &ImportReport, dry_run: bool, all_errors: bool) {
    println!("{}", format_report(report, dry_run));
    print_failure_table(&report.failed, all_errors);
}

/// Plain-text summary lines of a finished import.
pub fn format_report(report: &ImportReport, dry_run: bool) -> String {
    let mut out = String::new();
    if dry_run {
        let _ = writeln!(out, "Dry run: nothing was stored.");
        let _ = writeln!(out, "Valid trades: {}", report.inserted);
    } else {
        let _ = writeln!(out, "Imported trades: {}", report.inserted);
    }
    let _ = writeln!(out, "Failed rows: {}", report.failed_rows());
    let _ = write!(out, "Blank rows skipped: {}", report.skipped_blank);
    if report.is_partial() {
        let _ = write!(out, "\nSome rows were not imported; fix them and import those rows again.");
    }
    out
}

fn print_failure_table(failures: &[ImportFailure], all_errors: bool) {
    if failures.is_empty() {
        return;
    }
    let shown = if all_errors {
        failures.len()
    } else {
        failures.len().min(ERROR_PREVIEW_LIMIT)
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Problem"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for failure in &failures[..shown] {
        table.add_row(vec![
            Cell::new(failure.row_index),
            match failure.field.as_deref() {
                Some(field) => Cell::new(field),
                None => dim_cell("storage"),
            },
            Cell::new(&failure.reason).fg(Color::Red),
        ]);
    }
    println!("{table}");
    if shown < failures.len() {
        println!(
            "... and {} more (use --all-errors to list them)",
            failures.len() - shown
        );
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ImportReport {
        ImportReport {
            inserted: 2,
            failed: vec![
                ImportFailure {
                    row_index: 2,
                    field: Some("risk_per_trade".to_string()),
                    reason: "required value is missing".to_string(),
                },
                ImportFailure {
                    row_index: 4,
                    field: None,
                    reason: "duplicate of an existing trade".to_string(),
                },
            ],
            skipped_blank: 1,
        }
    }

    #[test]
    fn test_report_text() {
        insta::assert_snapshot!(format_report(&report(), false), @r"
        Imported trades: 2
        Failed rows: 2
        Blank rows skipped: 1
        Some rows were not imported; fix them and import those rows again.
        ");
    }

    #[test]
    fn test_dry_run_text() {
        let report = ImportReport {
            inserted: 3,
            ..ImportReport::default()
        };
        insta::assert_snapshot!(format_report(&report, true), @r"
        Dry run: nothing was stored.
        Valid trades: 3
        Failed rows: 0
        Blank rows skipped: 0
        ");
    }

    #[test]
    fn test_mapping_source() {
        use tj_model::ColumnMatch;
        use tj_model::field::keys;

        let mut mapping = MappingState::new(vec![
            ColumnMatch::assigned("Pair", keys::MARKET, 90),
            ColumnMatch::unassigned("Extra"),
        ]);
        assert_eq!(mapping_source(&mapping, "Pair", Some(keys::MARKET)), "header");
        assert_eq!(mapping_source(&mapping, "Extra", None), "-");
        mapping.assign("Extra", keys::NOTES).unwrap();
        assert_eq!(mapping_source(&mapping, "Extra", Some(keys::NOTES)), "manual");
    }

    #[test]
    fn test_fuzzy_header_match_is_explained() {
        use tj_map::{HeaderMatcher, MatchOptions};
        use tj_model::field::keys;

        let headers: Vec<String> = ["Direct", "Pair", "Memo"].map(String::from).to_vec();
        let mut mapping = MappingState::new(HeaderMatcher::default().match_headers(&headers));
        mapping.assign("Memo", keys::NOTES).unwrap();
        let score = mapping.matches()[0].score;
        assert!(score >= MatchOptions::default().header_threshold && score < 100);

        let notes = weak_match_notes(&mapping);
        assert_eq!(notes.len(), 1, "{notes:?}");
        assert!(notes[0].starts_with(&format!("'Direct' -> direction ({score}): ")));
        assert!(notes[0].contains("Name similarity"), "{}", notes[0]);
    }
}
