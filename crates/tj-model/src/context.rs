//! Per-import inputs that are not part of the CSV itself.

use serde::{Deserialize, Serialize};

use crate::enums::TradingMode;
use crate::field::keys;

/// Import-wide overrides applied to every row missing the matching value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportDefaults {
    pub risk_per_trade: Option<f64>,
    pub risk_reward_ratio: Option<f64>,
    /// Balance used for monetary profit; not a per-row field.
    pub account_balance: Option<f64>,
}

impl ImportDefaults {
    /// Default value configured for a defaultable field key.
    pub fn for_field(&self, key: &str) -> Option<f64> {
        match key {
            keys::RISK_PER_TRADE => self.risk_per_trade,
            keys::RISK_REWARD_RATIO => self.risk_reward_ratio,
            _ => None,
        }
    }

    #[must_use]
    pub fn with_risk_per_trade(mut self, value: f64) -> Self {
        self.risk_per_trade = Some(value);
        self
    }

    #[must_use]
    pub fn with_risk_reward_ratio(mut self, value: f64) -> Self {
        self.risk_reward_ratio = Some(value);
        self
    }

    #[must_use]
    pub fn with_account_balance(mut self, value: f64) -> Self {
        self.account_balance = Some(value);
        self
    }
}

/// Target of an import: which journal, account and strategy the trades land in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportContext {
    pub mode: TradingMode,
    pub account_id: String,
    pub strategy_id: Option<String>,
}

impl ImportContext {
    pub fn new(mode: TradingMode, account_id: impl Into<String>) -> Self {
        Self {
            mode,
            account_id: account_id.into(),
            strategy_id: None,
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy_id: impl Into<String>) -> Self {
        self.strategy_id = Some(strategy_id.into());
        self
    }
}
