//! Row parsing and validation.
//!
//! Every data row is handled on its own: a row with problems produces one
//! [`RowError`] per failing field and is left out of the accepted set, and
//! parsing moves on to the next row.

use std::collections::BTreeMap;

use tj_ingest::{CsvTable, RawRow};
use tj_model::field::keys;
use tj_model::{ColumnMatch, ImportDefaults, ParsedRow, RowError, SchemaField};
use tj_normalize::{NormalizeError, NormalizedValue, Normalizers};
use tracing::{info, trace};

/// Fields every row must resolve, in the order errors are reported.
const REQUIRED_ORDER: [&str; 6] = [
    keys::TRADE_DATE,
    keys::MARKET,
    keys::DIRECTION,
    keys::TRADE_OUTCOME,
    keys::RISK_PER_TRADE,
    keys::RISK_REWARD_RATIO,
];

/// A row that became a trade.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedRow {
    /// 1-based data row position in the source CSV.
    pub row_index: usize,
    pub trade: ParsedRow,
}

/// Result of parsing every row of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub accepted: Vec<AcceptedRow>,
    pub errors: Vec<RowError>,
    /// Rows whose mapped cells were all empty.
    pub skipped_blank: usize,
}

impl ParseOutcome {
    pub fn trades(&self) -> Vec<ParsedRow> {
        self.accepted.iter().map(|row| row.trade.clone()).collect()
    }

    /// Number of distinct rows with at least one error.
    pub fn rejected_rows(&self) -> usize {
        let mut rows: Vec<usize> = self.errors.iter().map(|e| e.row_index).collect();
        rows.dedup();
        rows.len()
    }
}

/// Turns raw rows into [`ParsedRow`]s using a final column mapping.
pub struct RowParser<'a> {
    /// Mapped columns as (field, header), in file order.
    columns: Vec<(&'static SchemaField, &'a str)>,
    normalizers: &'a Normalizers,
    defaults: &'a ImportDefaults,
}

impl<'a> RowParser<'a> {
    pub fn new(
        matches: &'a [ColumnMatch],
        normalizers: &'a Normalizers,
        defaults: &'a ImportDefaults,
    ) -> Self {
        let columns = matches
            .iter()
            .filter_map(|m| {
                let key = m.db_field.as_deref()?;
                tj_model::field(key).map(|field| (field, m.csv_header.as_str()))
            })
            .collect();
        Self {
            columns,
            normalizers,
            defaults,
        }
    }

    /// Parses every row of `table`.
    pub fn parse(&self, table: &CsvTable) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        for raw in table.raw_rows() {
            match self.parse_row(&raw) {
                None => {
                    trace!(row = raw.row_index, "blank row skipped");
                    outcome.skipped_blank += 1;
                }
                Some(Ok(trade)) => {
                    trace!(row = raw.row_index, "row accepted");
                    outcome.accepted.push(AcceptedRow {
                        row_index: raw.row_index,
                        trade,
                    });
                }
                Some(Err(errors)) => {
                    trace!(row = raw.row_index, errors = errors.len(), "row rejected");
                    outcome.errors.extend(errors);
                }
            }
        }
        info!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected_rows(),
            skipped_blank = outcome.skipped_blank,
            "rows parsed"
        );
        outcome
    }

    /// Parses one row. `None` when every mapped cell is empty.
    pub fn parse_row(&self, raw: &RawRow) -> Option<Result<ParsedRow, Vec<RowError>>> {
        let cells: BTreeMap<&'static str, (&'static SchemaField, &str)> = self
            .columns
            .iter()
            .filter_map(|(field, header)| raw.get(header).map(|value| (field.key, (*field, value))))
            .collect();
        if cells.is_empty() {
            return None;
        }
        Some(self.build(raw.row_index, &cells))
    }

    fn build(
        &self,
        row: usize,
        cells: &BTreeMap<&'static str, (&'static SchemaField, &str)>,
    ) -> Result<ParsedRow, Vec<RowError>> {
        let mut errors = Vec::new();
        let mut resolved: BTreeMap<&str, NormalizedValue> = BTreeMap::new();
        for key in REQUIRED_ORDER {
            match self.required(key, cells.get(key).copied()) {
                Ok(value) => {
                    resolved.insert(key, value);
                }
                Err(message) => errors.push(RowError::new(row, key, message)),
            }
        }

        let (
            Some(NormalizedValue::Date(date, cell_time)),
            Some(NormalizedValue::Text(market)),
            Some(NormalizedValue::Direction(direction)),
            Some(NormalizedValue::Outcome(outcome)),
            Some(NormalizedValue::Number(risk)),
            Some(NormalizedValue::Number(ratio)),
        ) = (
            resolved.remove(keys::TRADE_DATE),
            resolved.remove(keys::MARKET),
            resolved.remove(keys::DIRECTION),
            resolved.remove(keys::TRADE_OUTCOME),
            resolved.remove(keys::RISK_PER_TRADE),
            resolved.remove(keys::RISK_REWARD_RATIO),
        )
        else {
            return Err(errors);
        };

        let mut trade = ParsedRow::new(date, market, direction, outcome, risk, ratio);
        for (key, (field, value)) in cells {
            if field.required {
                continue;
            }
            self.apply_optional(row, &mut trade, key, field, value);
        }
        if trade.trade_time.is_none() {
            trade.trade_time = cell_time;
        }
        Ok(trade)
    }

    /// Resolves a required field, falling back to the import default where one applies.
    fn required(
        &self,
        key: &'static str,
        cell: Option<(&'static SchemaField, &str)>,
    ) -> Result<NormalizedValue, String> {
        let default = self.defaults.for_field(key);
        let parsed = cell.map(|(field, value)| self.normalizers.normalize(field, value));
        match (parsed, default) {
            (Some(Ok(value)), _) => Ok(value),
            (Some(Err(_)) | None, Some(default)) => Ok(NormalizedValue::Number(default)),
            (Some(Err(err)), None) => Err(err.to_string()),
            (None, None) if tj_model::field(key).is_some_and(SchemaField::is_defaultable) => {
                Err("no value in the CSV and no default configured".to_string())
            }
            (None, None) => Err("required value is missing".to_string()),
        }
    }

    fn apply_optional(
        &self,
        row: usize,
        trade: &mut ParsedRow,
        key: &str,
        field: &SchemaField,
        value: &str,
    ) {
        // Always derived from the trade date.
        if key == keys::DAY_OF_WEEK {
            return;
        }
        let normalized = match self.normalizers.normalize(field, value) {
            Ok(normalized) => normalized,
            Err(err) => {
                trace!(row, field = key, error_kind = error_kind(&err), "optional value ignored");
                return;
            }
        };
        match normalized {
            NormalizedValue::Time(time) => trade.trade_time = Some(time),
            NormalizedValue::Number(number) => {
                trade.set_number(key, number);
            }
            NormalizedValue::Flag(flag) => {
                trade.set_flag(key, flag);
            }
            NormalizedValue::Text(text) => {
                trade.set_text(key, text);
            }
            NormalizedValue::Outcome(outcome) if key == keys::BE_FINAL_RESULT => {
                trade.be_final_result = Some(outcome);
            }
            NormalizedValue::Date(..)
            | NormalizedValue::Direction(_)
            | NormalizedValue::Outcome(_) => {}
        }
    }
}

/// Variant name only, so row-level logs carry no cell content.
fn error_kind(err: &NormalizeError) -> &'static str {
    match err {
        NormalizeError::InvalidDate(_) => "date",
        NormalizeError::InvalidTime(_) => "time",
        NormalizeError::InvalidNumber(_) => "number",
        NormalizeError::UnknownCategory { .. } => "category",
    }
}

/// Parses `table` with a one-off [`RowParser`].
pub fn parse_table(
    table: &CsvTable,
    matches: &[ColumnMatch],
    normalizers: &Normalizers,
    defaults: &ImportDefaults,
) -> ParseOutcome {
    RowParser::new(matches, normalizers, defaults).parse(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use tj_ingest::read_csv_str;
    use tj_model::{Direction, TradeOutcome};

    fn standard_matches() -> Vec<ColumnMatch> {
        vec![
            ColumnMatch::assigned("Date", keys::TRADE_DATE, 100),
            ColumnMatch::assigned("Pair", keys::MARKET, 100),
            ColumnMatch::assigned("Side", keys::DIRECTION, 100),
            ColumnMatch::assigned("Result", keys::TRADE_OUTCOME, 100),
            ColumnMatch::assigned("Risk%", keys::RISK_PER_TRADE, 100),
            ColumnMatch::assigned("RR", keys::RISK_REWARD_RATIO, 100),
            ColumnMatch::assigned("BE", keys::BREAK_EVEN, 100),
            ColumnMatch::assigned("Notes", keys::NOTES, 100),
            ColumnMatch::unassigned("Ignored"),
        ]
    }

    fn parse(csv: &str, defaults: &ImportDefaults) -> ParseOutcome {
        let table = read_csv_str(csv).unwrap();
        parse_table(&table, &standard_matches(), &Normalizers::default(), defaults)
    }

    const HEADER: &str = "Date,Pair,Side,Result,Risk%,RR,BE,Notes,Ignored\n";

    #[test]
    fn test_valid_row() {
        let csv = format!("{HEADER}31.12.2023,EURUSD,Buy,TP,1%,1:2.5,yes,clean entry,zzz\n");
        let outcome = parse(&csv, &ImportDefaults::default());
        assert!(outcome.errors.is_empty());
        let trade = &outcome.accepted[0].trade;
        assert_eq!(trade.trade_date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(trade.day_of_week, "Sunday");
        assert_eq!(trade.market, "EURUSD");
        assert_eq!(trade.direction, Direction::Long);
        assert_eq!(trade.trade_outcome, TradeOutcome::Win);
        assert_eq!(trade.risk_per_trade, 1.0);
        assert_eq!(trade.risk_reward_ratio, 2.5);
        assert!(trade.break_even);
        assert_eq!(trade.notes, "clean entry");
    }

    #[test]
    fn test_all_errors_for_a_row_are_collected() {
        let csv = format!("{HEADER}someday,,Sideways,TP,abc,2,,,\n");
        let outcome = parse(&csv, &ImportDefaults::default());
        assert!(outcome.accepted.is_empty());
        let fields: Vec<&str> = outcome.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![keys::TRADE_DATE, keys::MARKET, keys::DIRECTION, keys::RISK_PER_TRADE]
        );
        assert!(outcome.errors.iter().all(|e| e.row_index == 1));
        assert_eq!(outcome.errors[0].message, "unrecognized date: someday");
    }

    #[test]
    fn test_failure_does_not_stop_later_rows() {
        let csv = format!(
            "{HEADER}bad,EURUSD,Buy,TP,1,2,,,\n02.01.2024,GBPUSD,Sell,SL,1,2,,,\n"
        );
        let outcome = parse(&csv, &ImportDefaults::default());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].row_index, 2);
    }

    #[test]
    fn test_defaults_cover_missing_and_unparseable() {
        let defaults = ImportDefaults::default()
            .with_risk_per_trade(0.5)
            .with_risk_reward_ratio(3.0);
        let csv = format!("{HEADER}2024-01-02,EURUSD,Buy,TP,,n/a,,,\n");
        let outcome = parse(&csv, &defaults);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.accepted[0].trade.risk_per_trade, 0.5);
        assert_eq!(outcome.accepted[0].trade.risk_reward_ratio, 3.0);
    }

    #[test]
    fn test_missing_numeric_without_default() {
        let csv = format!("{HEADER}2024-01-02,EURUSD,Buy,TP,,2,,,\n");
        let outcome = parse(&csv, &ImportDefaults::default());
        assert_eq!(
            outcome.errors,
            vec![RowError::new(
                1,
                keys::RISK_PER_TRADE,
                "no value in the CSV and no default configured"
            )]
        );
    }

    #[test]
    fn test_blank_rows_skipped_but_numbered() {
        let csv = format!("{HEADER},,,,,,,,\n,,,,,,,,only ignored\n2024-01-02,EURUSD,Buy,TP,1,2,,,\n");
        let outcome = parse(&csv, &ImportDefaults::default());
        assert_eq!(outcome.skipped_blank, 2);
        assert_eq!(outcome.accepted[0].row_index, 3);
    }

    #[test]
    fn test_empty_line_keeps_error_row_number() {
        let csv = format!("{HEADER}2024-01-02,EURUSD,Buy,TP,1,2,,,\n\nsomeday,GBPUSD,Sell,SL,1,2,,,\n");
        let outcome = parse(&csv, &ImportDefaults::default());
        assert_eq!(outcome.skipped_blank, 1);
        assert_eq!(outcome.accepted[0].row_index, 1);
        let rows: Vec<usize> = outcome.errors.iter().map(|e| e.row_index).collect();
        assert_eq!(rows, vec![3]);
    }

    #[test]
    fn test_optional_failures_are_lenient() {
        let mut matches = standard_matches();
        matches.push(ColumnMatch::assigned("SL", keys::SL_SIZE, 100));
        matches.push(ColumnMatch::assigned("BE Result", keys::BE_FINAL_RESULT, 100));
        let table = read_csv_str(
            "Date,Pair,Side,Result,Risk%,RR,BE,Notes,Ignored,SL,BE Result\n\
             2024-01-02,EURUSD,Buy,TP,1,2,maybe,,,twelve,meh\n",
        )
        .unwrap();
        let outcome = parse_table(&table, &matches, &Normalizers::default(), &ImportDefaults::default());
        assert!(outcome.errors.is_empty());
        let trade = &outcome.accepted[0].trade;
        assert_eq!(trade.sl_size, 0.0);
        assert_eq!(trade.be_final_result, None);
        assert!(!trade.break_even);
    }

    #[test]
    fn test_combined_date_cell_fills_time() {
        let matches = vec![
            ColumnMatch::assigned("Open Time", keys::TRADE_DATE, 100),
            ColumnMatch::assigned("Symbol", keys::MARKET, 100),
            ColumnMatch::assigned("Type", keys::DIRECTION, 100),
            ColumnMatch::assigned("Outcome", keys::TRADE_OUTCOME, 100),
        ];
        let table = read_csv_str("Open Time,Symbol,Type,Outcome\n2024.01.02 09:30,XAUUSD,sell,loss\n").unwrap();
        let defaults = ImportDefaults::default()
            .with_risk_per_trade(1.0)
            .with_risk_reward_ratio(2.0);
        let outcome = parse_table(&table, &matches, &Normalizers::default(), &defaults);
        let trade = &outcome.accepted[0].trade;
        assert_eq!(trade.trade_time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.trade_outcome, TradeOutcome::Lose);
    }
}
