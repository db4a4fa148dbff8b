//! Row accounting over generated CSV bodies.

use std::collections::BTreeSet;

use proptest::prelude::*;
use tj_import::parse_table;
use tj_ingest::read_csv_str;
use tj_model::field::keys;
use tj_model::{ColumnMatch, ImportDefaults};
use tj_normalize::Normalizers;

const HEADER: &str = "Date,Pair,Side,Result,Risk";

fn matches() -> Vec<ColumnMatch> {
    vec![
        ColumnMatch::assigned("Date", keys::TRADE_DATE, 100),
        ColumnMatch::assigned("Pair", keys::MARKET, 100),
        ColumnMatch::assigned("Side", keys::DIRECTION, 100),
        ColumnMatch::assigned("Result", keys::TRADE_OUTCOME, 100),
        ColumnMatch::assigned("Risk", keys::RISK_PER_TRADE, 100),
    ]
}

fn cell(pool: &'static [&'static str]) -> impl Strategy<Value = &'static str> {
    prop::sample::select(pool)
}

fn row() -> impl Strategy<Value = [&'static str; 5]> {
    (
        cell(&["2024-01-02", "31.12.2023", "someday", ""]),
        cell(&["EURUSD", "NAS100", ""]),
        cell(&["Buy", "short", "sideways", ""]),
        cell(&["TP", "Loss", "draw", ""]),
        cell(&["1", "0.5%", "lots", ""]),
    )
        .prop_map(|(a, b, c, d, e)| [a, b, c, d, e])
}

proptest! {
    #[test]
    fn every_non_blank_row_is_accepted_or_rejected(
        rows in prop::collection::vec(row(), 1..30),
        default_ratio in prop::option::of(0.5f64..5.0),
    ) {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for cells in &rows {
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        let table = read_csv_str(&csv).unwrap();
        let defaults = ImportDefaults {
            risk_reward_ratio: default_ratio,
            ..ImportDefaults::default()
        };
        let outcome = parse_table(&table, &matches(), &Normalizers::default(), &defaults);

        let non_blank: BTreeSet<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
            .map(|(i, _)| i + 1)
            .collect();
        let accepted: BTreeSet<usize> = outcome.accepted.iter().map(|r| r.row_index).collect();
        let rejected: BTreeSet<usize> = outcome.errors.iter().map(|e| e.row_index).collect();

        prop_assert!(accepted.is_disjoint(&rejected));
        let seen: BTreeSet<usize> = accepted.union(&rejected).copied().collect();
        prop_assert_eq!(seen, non_blank.clone());
        prop_assert_eq!(outcome.skipped_blank, rows.len() - non_blank.len());
        if default_ratio.is_none() {
            prop_assert!(outcome.accepted.is_empty());
        }
    }
}
