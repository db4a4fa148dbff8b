//! Built-in spellings for categorical and flag values.
//!
//! These tables are the deterministic layer of value normalization. A value
//! resolved here is never overridden by a translated value.

use tj_model::field::keys;
use tj_model::{Direction, TradeOutcome};

/// Spellings resolved to a direction, compared after [`fold_token`].
const DIRECTION_ALIASES: &[(&str, Direction)] = &[
    ("long", Direction::Long),
    ("buy", Direction::Long),
    ("b", Direction::Long),
    ("call", Direction::Long),
    ("bull", Direction::Long),
    ("bullish", Direction::Long),
    ("up", Direction::Long),
    ("buy limit", Direction::Long),
    ("buy stop", Direction::Long),
    ("1", Direction::Long),
    ("+", Direction::Long),
    ("short", Direction::Short),
    ("sell", Direction::Short),
    ("s", Direction::Short),
    ("put", Direction::Short),
    ("bear", Direction::Short),
    ("bearish", Direction::Short),
    ("down", Direction::Short),
    ("sell limit", Direction::Short),
    ("sell stop", Direction::Short),
    ("2", Direction::Short),
    ("-", Direction::Short),
];

const OUTCOME_ALIASES: &[(&str, TradeOutcome)] = &[
    ("win", TradeOutcome::Win),
    ("won", TradeOutcome::Win),
    ("w", TradeOutcome::Win),
    ("winner", TradeOutcome::Win),
    ("profit", TradeOutcome::Win),
    ("tp", TradeOutcome::Win),
    ("take profit", TradeOutcome::Win),
    ("green", TradeOutcome::Win),
    ("gain", TradeOutcome::Win),
    ("1", TradeOutcome::Win),
    ("lose", TradeOutcome::Lose),
    ("loss", TradeOutcome::Lose),
    ("lost", TradeOutcome::Lose),
    ("l", TradeOutcome::Lose),
    ("loser", TradeOutcome::Lose),
    ("sl", TradeOutcome::Lose),
    ("stop loss", TradeOutcome::Lose),
    ("stopped out", TradeOutcome::Lose),
    ("red", TradeOutcome::Lose),
    ("0", TradeOutcome::Lose),
];

const TRUE_TOKENS: &[&str] = &["yes", "y", "true", "t", "1", "x", "✓", "✔", "on"];
const FALSE_TOKENS: &[&str] = &["no", "n", "false", "f", "0", "-", "off"];

/// Numeric category codes; only trusted when a column uses more than one.
const NUMERIC_CODES: &[&str] = &["0", "1", "2"];

/// Lowercases, collapses whitespace and treats underscores as spaces.
pub fn fold_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup<T: Copy>(table: &[(&str, T)], raw: &str) -> Option<T> {
    let folded = fold_token(raw);
    if folded.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, value)| *value)
}

pub fn resolve_direction(raw: &str) -> Option<Direction> {
    lookup(DIRECTION_ALIASES, raw)
}

pub fn resolve_outcome(raw: &str) -> Option<TradeOutcome> {
    lookup(OUTCOME_ALIASES, raw)
}

/// Canonical spelling of `raw` for a categorical field key.
///
/// `be_final_result` shares the outcome vocabulary.
pub fn resolve_categorical(field: &str, raw: &str) -> Option<&'static str> {
    match field {
        keys::DIRECTION => resolve_direction(raw).map(|d| d.as_str()),
        keys::TRADE_OUTCOME | keys::BE_FINAL_RESULT => resolve_outcome(raw).map(|o| o.as_str()),
        _ => None,
    }
}

/// True when `raw` is one of the bare numeric category codes.
pub fn is_numeric_code(raw: &str) -> bool {
    NUMERIC_CODES.contains(&raw.trim())
}

/// Strict flag parsing: `None` for anything outside the known tokens.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let folded = fold_token(raw);
    if TRUE_TOKENS.contains(&folded.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&folded.as_str()) || folded.is_empty() {
        Some(false)
    } else {
        None
    }
}

/// Lenient flag parsing: unrecognized values are `false`.
pub fn parse_flag_lenient(raw: &str) -> bool {
    parse_flag(raw).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_aliases() {
        assert_eq!(resolve_direction("BUY"), Some(Direction::Long));
        assert_eq!(resolve_direction(" sell_limit "), Some(Direction::Short));
        assert_eq!(resolve_direction("Put"), Some(Direction::Short));
        assert_eq!(resolve_direction("+"), Some(Direction::Long));
        assert_eq!(resolve_direction("achat"), None);
        assert_eq!(resolve_direction(""), None);
    }

    #[test]
    fn test_outcome_aliases() {
        assert_eq!(resolve_outcome("TP"), Some(TradeOutcome::Win));
        assert_eq!(resolve_outcome("Stop Loss"), Some(TradeOutcome::Lose));
        assert_eq!(resolve_outcome("0"), Some(TradeOutcome::Lose));
        assert_eq!(resolve_outcome("breakeven"), None);
    }

    #[test]
    fn test_resolve_categorical_by_field() {
        assert_eq!(resolve_categorical(keys::DIRECTION, "b"), Some("Long"));
        assert_eq!(resolve_categorical(keys::BE_FINAL_RESULT, "won"), Some("Win"));
        assert_eq!(resolve_categorical(keys::MARKET, "buy"), None);
    }

    #[test]
    fn test_flags() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("x"), Some(true));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert!(!parse_flag_lenient("maybe"));
        assert!(parse_flag_lenient("TRUE"));
    }
}
