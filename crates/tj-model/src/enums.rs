//! Canonical values for categorical trade fields.
//!
//! Raw CSV spellings ("buy", "SELL", "1", "Gagné") are resolved to these by the
//! normalization layer; `FromStr` here only accepts the canonical spellings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "Long",
            Self::Short => "Short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(format!("not a canonical direction: {other}")),
        }
    }
}

/// Final classification of a trade.
///
/// Break-even is tracked separately (`ParsedRow::break_even`) so a trade can
/// be a win that was moved to break-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeOutcome {
    Win,
    Lose,
}

impl TradeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "Win",
            Self::Lose => "Lose",
        }
    }
}

impl fmt::Display for TradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win" => Ok(Self::Win),
            "lose" => Ok(Self::Lose),
            other => Err(format!("not a canonical outcome: {other}")),
        }
    }
}

/// Which journal the trades are imported into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Live,
    Backtesting,
    Demo,
}

impl TradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Backtesting => "backtesting",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "backtesting" | "backtest" => Ok(Self::Backtesting),
            "demo" => Ok(Self::Demo),
            other => Err(format!("unknown trading mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_spellings_parse() {
        assert_eq!("long".parse::<Direction>(), Ok(Direction::Long));
        assert_eq!(" Short ".parse::<Direction>(), Ok(Direction::Short));
        assert_eq!("WIN".parse::<TradeOutcome>(), Ok(TradeOutcome::Win));
        assert!("buy".parse::<Direction>().is_err());
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&TradingMode::Backtesting).unwrap();
        assert_eq!(json, "\"backtesting\"");
    }
}
