//! P&L fields computed from outcome, risk and reward.

use tj_model::{ParsedRow, TradeOutcome};

/// Derived P&L for one trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFields {
    /// Percent of account balance gained (positive) or lost (negative).
    pub pnl_percentage: f64,
    /// Money gained or lost; `None` without an account balance.
    pub calculated_profit: Option<f64>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Computes P&L for `trade` against `balance`.
///
/// Break-even trades are zero in both fields whatever their outcome.
pub fn derive(trade: &ParsedRow, balance: Option<f64>) -> DerivedFields {
    if trade.break_even {
        return DerivedFields {
            pnl_percentage: 0.0,
            calculated_profit: Some(0.0),
        };
    }
    let pnl = match trade.trade_outcome {
        TradeOutcome::Win => trade.risk_per_trade * trade.risk_reward_ratio,
        TradeOutcome::Lose => -trade.risk_per_trade,
    };
    let pnl_percentage = round_to(pnl, 4);
    DerivedFields {
        pnl_percentage,
        calculated_profit: balance.map(|balance| round_to(balance * pnl / 100.0, 2)),
    }
}

/// Writes derived P&L into `trade`.
///
/// A profit value read from the CSV is kept when no balance is known.
pub fn apply_derived(trade: &mut ParsedRow, balance: Option<f64>) {
    let derived = derive(trade, balance);
    trade.pnl_percentage = Some(derived.pnl_percentage);
    if derived.calculated_profit.is_some() {
        trade.calculated_profit = derived.calculated_profit;
    }
}
