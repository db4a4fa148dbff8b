//! The typed trade record produced for each accepted CSV row.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::enums::{Direction, TradeOutcome};
use crate::field::keys;

/// A fully typed trade ready for storage.
///
/// Required fields are constructor arguments; optional fields default to an
/// empty string, `0.0`, `false` or `None` depending on their type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRow {
    /// Serialized as `YYYY-MM-DD`.
    pub trade_date: NaiveDate,
    pub trade_time: Option<NaiveTime>,
    pub day_of_week: String,
    pub market: String,
    pub direction: Direction,
    pub trade_outcome: TradeOutcome,
    pub risk_per_trade: f64,
    pub risk_reward_ratio: f64,
    pub risk_reward_ratio_long: f64,
    pub sl_size: f64,
    pub break_even: bool,
    pub be_final_result: Option<TradeOutcome>,
    pub reentry: bool,
    pub news_related: bool,
    pub local_high_low: bool,
    pub partials_taken: bool,
    pub executed: bool,
    pub launch_hour: bool,
    pub mss: String,
    pub liquidity: String,
    pub setup_type: String,
    pub displacement_size: f64,
    pub fvg_size: f64,
    pub notes: String,
    pub trade_link: String,
    pub evaluation: String,
    pub calculated_profit: Option<f64>,
    pub pnl_percentage: Option<f64>,
}

impl ParsedRow {
    pub fn new(
        trade_date: NaiveDate,
        market: impl Into<String>,
        direction: Direction,
        trade_outcome: TradeOutcome,
        risk_per_trade: f64,
        risk_reward_ratio: f64,
    ) -> Self {
        Self {
            trade_date,
            trade_time: None,
            day_of_week: weekday_name(trade_date.weekday()).to_string(),
            market: market.into(),
            direction,
            trade_outcome,
            risk_per_trade,
            risk_reward_ratio,
            risk_reward_ratio_long: 0.0,
            sl_size: 0.0,
            break_even: false,
            be_final_result: None,
            reentry: false,
            news_related: false,
            local_high_low: false,
            partials_taken: false,
            executed: false,
            launch_hour: false,
            mss: String::new(),
            liquidity: String::new(),
            setup_type: String::new(),
            displacement_size: 0.0,
            fvg_size: 0.0,
            notes: String::new(),
            trade_link: String::new(),
            evaluation: String::new(),
            calculated_profit: None,
            pnl_percentage: None,
        }
    }

    /// Sets an optional text field. Returns false for keys that are not text fields.
    pub fn set_text(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            keys::MSS => &mut self.mss,
            keys::LIQUIDITY => &mut self.liquidity,
            keys::SETUP_TYPE => &mut self.setup_type,
            keys::NOTES => &mut self.notes,
            keys::TRADE_LINK => &mut self.trade_link,
            keys::EVALUATION => &mut self.evaluation,
            keys::DAY_OF_WEEK => &mut self.day_of_week,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Sets an optional numeric field. Returns false for keys that are not numeric fields.
    pub fn set_number(&mut self, key: &str, value: f64) -> bool {
        match key {
            keys::RISK_REWARD_RATIO_LONG => self.risk_reward_ratio_long = value,
            keys::SL_SIZE => self.sl_size = value,
            keys::DISPLACEMENT_SIZE => self.displacement_size = value,
            keys::FVG_SIZE => self.fvg_size = value,
            keys::CALCULATED_PROFIT => self.calculated_profit = Some(value),
            keys::PNL_PERCENTAGE => self.pnl_percentage = Some(value),
            _ => return false,
        }
        true
    }

    /// Sets a boolean field. Returns false for keys that are not boolean fields.
    pub fn set_flag(&mut self, key: &str, value: bool) -> bool {
        let slot = match key {
            keys::BREAK_EVEN => &mut self.break_even,
            keys::REENTRY => &mut self.reentry,
            keys::NEWS_RELATED => &mut self.news_related,
            keys::LOCAL_HIGH_LOW => &mut self.local_high_low,
            keys::PARTIALS_TAKEN => &mut self.partials_taken,
            keys::EXECUTED => &mut self.executed,
            keys::LAUNCH_HOUR => &mut self.launch_hour,
            _ => return false,
        };
        *slot = value;
        true
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
