use chrono::NaiveDate;
use tj_model::{
    ColumnMatch, Direction, ImportContext, ImportDefaults, ParsedRow, RowError, TradeOutcome,
    TradingMode, field,
};

fn sample_row() -> ParsedRow {
    ParsedRow::new(
        NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(),
        "EURUSD",
        Direction::Long,
        TradeOutcome::Win,
        1.0,
        2.5,
    )
}

#[test]
fn parsed_row_serializes_date_as_iso() {
    let json = serde_json::to_value(sample_row()).expect("serialize row");
    assert_eq!(json["trade_date"], "2023-12-29");
    assert_eq!(json["direction"], "Long");
    assert_eq!(json["day_of_week"], "Friday");
    assert_eq!(json["notes"], "");
    assert!(json["pnl_percentage"].is_null());
}

#[test]
fn setters_reject_foreign_keys() {
    let mut row = sample_row();
    assert!(row.set_flag("break_even", true));
    assert!(!row.set_flag("market", true));
    assert!(row.set_number("sl_size", 12.5));
    assert!(!row.set_number("notes", 1.0));
    assert!(row.set_text("notes", "clean entry".into()));
    assert!(row.break_even);
    assert_eq!(row.sl_size, 12.5);
}

#[test]
fn defaults_resolve_by_field_key() {
    let defaults = ImportDefaults::default().with_risk_reward_ratio(1.5);
    assert_eq!(defaults.for_field("risk_reward_ratio"), Some(1.5));
    assert_eq!(defaults.for_field("risk_per_trade"), None);
    assert_eq!(defaults.for_field("market"), None);
}

#[test]
fn defaults_deserialize_partially() {
    let defaults: ImportDefaults =
        serde_json::from_str(r#"{"risk_per_trade": 0.5}"#).expect("deserialize defaults");
    assert_eq!(defaults.risk_per_trade, Some(0.5));
    assert_eq!(defaults.account_balance, None);
}

#[test]
fn row_error_display_names_row_and_field() {
    let err = RowError::new(4, "risk_per_trade", "missing value and no default configured");
    assert_eq!(
        err.to_string(),
        "row 4: risk_per_trade: missing value and no default configured"
    );
}

#[test]
fn manual_assignment_caps_score() {
    let column = ColumnMatch::assigned("R:R", "risk_reward_ratio", 250);
    assert_eq!(column.score, 100);
    assert!(field("risk_reward_ratio").unwrap().is_defaultable());
}

#[test]
fn context_round_trips() {
    let ctx = ImportContext::new(TradingMode::Demo, "acc-1").with_strategy("london");
    let json = serde_json::to_string(&ctx).expect("serialize context");
    let back: ImportContext = serde_json::from_str(&json).expect("deserialize context");
    assert_eq!(back, ctx);
}
