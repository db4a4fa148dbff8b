//! Value normalization for trade imports.
//!
//! This crate turns raw CSV cell strings into canonical typed values:
//!
//! - **aliases**: built-in spellings for direction, outcome, and flag values
//! - **datetime**: date and time parsing across common export formats
//! - **numeric**: numbers with currency symbols, percent signs, and ratio notation
//! - **table**: per-import lookup of observed categorical values
//! - **normalizers**: the per-field dispatcher used by the row parser

pub mod aliases;
pub mod datetime;
pub mod error;
pub mod normalizers;
pub mod numeric;
pub mod table;

pub use aliases::{
    fold_token, is_numeric_code, parse_flag, parse_flag_lenient, resolve_categorical,
    resolve_direction, resolve_outcome,
};
pub use datetime::{
    format_date, is_date_like, is_date_time_like, is_time_like, parse_date_time, parse_trade_date,
    parse_trade_time,
};
pub use error::NormalizeError;
pub use normalizers::{NormalizedValue, Normalizers};
pub use numeric::{parse_number, parse_ratio};
pub use table::{EntrySource, NormalizationEntry, NormalizationTable};
