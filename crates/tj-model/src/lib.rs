//! Data model for the trade CSV import pipeline.
//!
//! - **field**: the fixed catalog of schema fields a CSV column can map to
//! - **enums**: canonical categorical values (direction, outcome, trading mode)
//! - **mapping**: column match state and sampled column values
//! - **trade**: the typed trade record produced for each accepted row
//! - **context**: per-import defaults and the account/strategy being imported into

pub mod context;
pub mod enums;
pub mod error;
pub mod field;
pub mod mapping;
pub mod trade;

pub use context::{ImportContext, ImportDefaults};
pub use enums::{Direction, TradeOutcome, TradingMode};
pub use error::RowError;
pub use field::{
    CATEGORICAL_FIELDS, DEFAULTABLE_FIELDS, SchemaField, TRADE_FIELDS, ValueType, field,
    required_fields,
};
pub use mapping::{ColumnMatch, ColumnSample, ColumnSamples, MANUAL_SCORE};
pub use trade::ParsedRow;
