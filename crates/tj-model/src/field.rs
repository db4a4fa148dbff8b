//! Schema field catalog.
//!
//! Every CSV column is matched against this fixed set of fields. Each field
//! carries a display label, a required flag, the kind of value it stores and a
//! curated list of header aliases used by the header matcher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field keys as used by storage and by the translator contract.
pub mod keys {
    pub const TRADE_DATE: &str = "trade_date";
    pub const TRADE_TIME: &str = "trade_time";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const MARKET: &str = "market";
    pub const DIRECTION: &str = "direction";
    pub const TRADE_OUTCOME: &str = "trade_outcome";
    pub const RISK_PER_TRADE: &str = "risk_per_trade";
    pub const RISK_REWARD_RATIO: &str = "risk_reward_ratio";
    pub const RISK_REWARD_RATIO_LONG: &str = "risk_reward_ratio_long";
    pub const SL_SIZE: &str = "sl_size";
    pub const BREAK_EVEN: &str = "break_even";
    pub const BE_FINAL_RESULT: &str = "be_final_result";
    pub const REENTRY: &str = "reentry";
    pub const NEWS_RELATED: &str = "news_related";
    pub const LOCAL_HIGH_LOW: &str = "local_high_low";
    pub const PARTIALS_TAKEN: &str = "partials_taken";
    pub const EXECUTED: &str = "executed";
    pub const LAUNCH_HOUR: &str = "launch_hour";
    pub const MSS: &str = "mss";
    pub const LIQUIDITY: &str = "liquidity";
    pub const SETUP_TYPE: &str = "setup_type";
    pub const DISPLACEMENT_SIZE: &str = "displacement_size";
    pub const FVG_SIZE: &str = "fvg_size";
    pub const NOTES: &str = "notes";
    pub const TRADE_LINK: &str = "trade_link";
    pub const EVALUATION: &str = "evaluation";
    pub const CALCULATED_PROFIT: &str = "calculated_profit";
    pub const PNL_PERCENTAGE: &str = "pnl_percentage";
}

/// Kind of value a schema field stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Date,
    Time,
    Text,
    Number,
    Boolean,
    Enum,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical import target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    /// Unique storage key (e.g. `trade_date`).
    pub key: &'static str,
    /// Human-readable label shown next to the mapping.
    pub label: &'static str,
    /// Whether every imported trade must carry this field.
    pub required: bool,
    pub value_type: ValueType,
    /// Known header spellings, lowercase, compared after normalization.
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

const fn schema(
    key: &'static str,
    label: &'static str,
    required: bool,
    value_type: ValueType,
    aliases: &'static [&'static str],
) -> SchemaField {
    SchemaField {
        key,
        label,
        required,
        value_type,
        aliases,
    }
}

/// The full field catalog, in display order.
pub static TRADE_FIELDS: &[SchemaField] = &[
    schema(
        keys::TRADE_DATE,
        "Date",
        true,
        ValueType::Date,
        &[
            "date",
            "trade date",
            "open date",
            "entry date",
            "open time",
            "datetime",
            "date time",
            "day",
        ],
    ),
    schema(
        keys::TRADE_TIME,
        "Time",
        false,
        ValueType::Time,
        &["time", "trade time", "entry time", "hour", "open hour"],
    ),
    schema(
        keys::DAY_OF_WEEK,
        "Day of Week",
        false,
        ValueType::Text,
        &["day of week", "weekday", "dow"],
    ),
    schema(
        keys::MARKET,
        "Market",
        true,
        ValueType::Text,
        &[
            "market",
            "symbol",
            "instrument",
            "pair",
            "asset",
            "ticker",
            "item",
            "currency pair",
        ],
    ),
    schema(
        keys::DIRECTION,
        "Direction",
        true,
        ValueType::Enum,
        &[
            "direction",
            "side",
            "type",
            "buy sell",
            "long short",
            "position",
            "action",
            "order type",
            "trade type",
        ],
    ),
    schema(
        keys::TRADE_OUTCOME,
        "Outcome",
        true,
        ValueType::Enum,
        &[
            "outcome",
            "result",
            "trade result",
            "win loss",
            "status",
            "trade outcome",
        ],
    ),
    schema(
        keys::RISK_PER_TRADE,
        "Risk %",
        true,
        ValueType::Number,
        &[
            "risk",
            "risk %",
            "risk percent",
            "risk percentage",
            "risk per trade",
            "risk pct",
        ],
    ),
    schema(
        keys::RISK_REWARD_RATIO,
        "Risk:Reward",
        true,
        ValueType::Number,
        &[
            "rr",
            "r r",
            "r:r",
            "risk reward",
            "risk reward ratio",
            "rrr",
            "r multiple",
            "reward",
        ],
    ),
    schema(
        keys::RISK_REWARD_RATIO_LONG,
        "Potential R:R",
        false,
        ValueType::Number,
        &["potential rr", "max rr", "rr long", "potential risk reward"],
    ),
    schema(
        keys::SL_SIZE,
        "SL Size",
        false,
        ValueType::Number,
        &["sl", "sl size", "stop loss", "stop size", "sl pips", "stop"],
    ),
    schema(
        keys::BREAK_EVEN,
        "Break Even",
        false,
        ValueType::Boolean,
        &["be", "break even", "breakeven", "moved to be"],
    ),
    schema(
        keys::BE_FINAL_RESULT,
        "BE Final Result",
        false,
        ValueType::Enum,
        &["be result", "be final result", "final result", "be outcome"],
    ),
    schema(
        keys::REENTRY,
        "Re-entry",
        false,
        ValueType::Boolean,
        &["reentry", "re entry", "re-entry", "second entry"],
    ),
    schema(
        keys::NEWS_RELATED,
        "News",
        false,
        ValueType::Boolean,
        &["news", "news related", "news event", "high impact news"],
    ),
    schema(
        keys::LOCAL_HIGH_LOW,
        "Local High/Low",
        false,
        ValueType::Boolean,
        &["local high low", "local high", "local low", "hl"],
    ),
    schema(
        keys::PARTIALS_TAKEN,
        "Partials",
        false,
        ValueType::Boolean,
        &["partials", "partials taken", "partial close", "partial"],
    ),
    schema(
        keys::EXECUTED,
        "Executed",
        false,
        ValueType::Boolean,
        &["executed", "taken", "entered", "trade taken"],
    ),
    schema(
        keys::LAUNCH_HOUR,
        "Launch Hour",
        false,
        ValueType::Boolean,
        &["launch hour", "launch", "opening hour"],
    ),
    schema(
        keys::MSS,
        "MSS",
        false,
        ValueType::Text,
        &["mss", "market structure shift", "structure shift", "bos"],
    ),
    schema(
        keys::LIQUIDITY,
        "Liquidity",
        false,
        ValueType::Text,
        &["liquidity", "liquidity taken", "liq", "sweep"],
    ),
    schema(
        keys::SETUP_TYPE,
        "Setup",
        false,
        ValueType::Text,
        &["setup", "setup type", "strategy", "pattern", "model"],
    ),
    schema(
        keys::DISPLACEMENT_SIZE,
        "Displacement Size",
        false,
        ValueType::Number,
        &["displacement", "displacement size", "displacement pips"],
    ),
    schema(
        keys::FVG_SIZE,
        "FVG Size",
        false,
        ValueType::Number,
        &["fvg", "fvg size", "fair value gap", "imbalance"],
    ),
    schema(
        keys::NOTES,
        "Notes",
        false,
        ValueType::Text,
        &["notes", "note", "comment", "comments", "remarks", "description"],
    ),
    schema(
        keys::TRADE_LINK,
        "Link",
        false,
        ValueType::Text,
        &["link", "trade link", "screenshot", "chart", "url", "tradingview"],
    ),
    schema(
        keys::EVALUATION,
        "Evaluation",
        false,
        ValueType::Text,
        &["evaluation", "grade", "rating", "review"],
    ),
    schema(
        keys::CALCULATED_PROFIT,
        "Profit",
        false,
        ValueType::Number,
        &[
            "profit",
            "pnl",
            "p l",
            "p&l",
            "net profit",
            "gain",
            "profit loss",
            "amount",
        ],
    ),
    schema(
        keys::PNL_PERCENTAGE,
        "P&L %",
        false,
        ValueType::Number,
        &["pnl %", "p&l %", "return %", "gain %", "pnl percentage", "return"],
    ),
];

/// Categorical fields resolved through a normalization table.
pub const CATEGORICAL_FIELDS: &[&str] = &[
    keys::DIRECTION,
    keys::TRADE_OUTCOME,
    keys::BE_FINAL_RESULT,
];

/// Required numeric fields that an import-wide default may satisfy.
pub const DEFAULTABLE_FIELDS: &[&str] = &[keys::RISK_PER_TRADE, keys::RISK_REWARD_RATIO];

/// Looks up a schema field by key (case-insensitive).
pub fn field(key: &str) -> Option<&'static SchemaField> {
    TRADE_FIELDS
        .iter()
        .find(|f| f.key.eq_ignore_ascii_case(key.trim()))
}

/// Fields every trade must carry.
pub fn required_fields() -> impl Iterator<Item = &'static SchemaField> {
    TRADE_FIELDS.iter().filter(|f| f.required)
}

impl SchemaField {
    /// True for fields whose absence can be covered by an `ImportDefaults` value.
    pub fn is_defaultable(&self) -> bool {
        DEFAULTABLE_FIELDS.contains(&self.key)
    }

    pub fn is_categorical(&self) -> bool {
        CATEGORICAL_FIELDS.contains(&self.key)
    }
}
