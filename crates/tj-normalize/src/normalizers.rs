//! Per-field normalization dispatch.

use chrono::{NaiveDate, NaiveTime};
use tj_model::field::keys;
use tj_model::{Direction, SchemaField, TradeOutcome, ValueType};

use crate::aliases::parse_flag_lenient;
use crate::datetime::{parse_date_time, parse_trade_time};
use crate::error::NormalizeError;
use crate::numeric::{parse_number, parse_ratio};
use crate::table::NormalizationTable;

/// A raw cell turned into the value its field stores.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    /// Date with the time part of a combined date/time cell, if any.
    Date(NaiveDate, Option<NaiveTime>),
    Time(NaiveTime),
    Number(f64),
    Flag(bool),
    Direction(Direction),
    Outcome(TradeOutcome),
    Text(String),
}

/// Normalizers for one import, built once the categorical table is final.
#[derive(Debug, Clone, Default)]
pub struct Normalizers {
    table: NormalizationTable,
}

impl Normalizers {
    pub fn new(table: NormalizationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &NormalizationTable {
        &self.table
    }

    /// Normalizes one non-empty cell for `field`.
    ///
    /// Boolean fields never fail; unrecognized tokens read as `false`.
    pub fn normalize(
        &self,
        field: &SchemaField,
        raw: &str,
    ) -> Result<NormalizedValue, NormalizeError> {
        let trimmed = raw.trim();
        match field.value_type {
            ValueType::Date => parse_date_time(trimmed)
                .map(|(date, time)| NormalizedValue::Date(date, time))
                .ok_or_else(|| NormalizeError::InvalidDate(trimmed.to_string())),
            ValueType::Time => parse_trade_time(trimmed)
                .or_else(|| parse_date_time(trimmed).and_then(|(_, time)| time))
                .map(NormalizedValue::Time)
                .ok_or_else(|| NormalizeError::InvalidTime(trimmed.to_string())),
            ValueType::Number => {
                let parsed = if is_ratio_field(field.key) {
                    parse_ratio(trimmed)
                } else {
                    parse_number(trimmed)
                };
                parsed
                    .map(NormalizedValue::Number)
                    .ok_or_else(|| NormalizeError::InvalidNumber(trimmed.to_string()))
            }
            ValueType::Boolean => Ok(NormalizedValue::Flag(parse_flag_lenient(trimmed))),
            ValueType::Enum => self.normalize_category(field.key, trimmed),
            ValueType::Text => Ok(NormalizedValue::Text(trimmed.to_string())),
        }
    }

    fn normalize_category(&self, key: &str, raw: &str) -> Result<NormalizedValue, NormalizeError> {
        let unknown = || NormalizeError::UnknownCategory {
            field: key.to_string(),
            value: raw.to_string(),
        };
        let canonical = self.table.resolve(key, raw).ok_or_else(unknown)?;
        let value = match key {
            keys::DIRECTION => canonical.parse().map(NormalizedValue::Direction).ok(),
            _ => canonical.parse().map(NormalizedValue::Outcome).ok(),
        };
        value.ok_or_else(unknown)
    }
}

fn is_ratio_field(key: &str) -> bool {
    key == keys::RISK_REWARD_RATIO || key == keys::RISK_REWARD_RATIO_LONG
}

#[cfg(test)]
mod tests {
    use super::*;
    use tj_model::field;

    fn schema(key: &str) -> &'static SchemaField {
        field(key).unwrap()
    }

    #[test]
    fn test_dispatch_by_value_type() {
        let normalizers = Normalizers::default();
        assert_eq!(
            normalizers.normalize(schema(keys::RISK_REWARD_RATIO), "1:3"),
            Ok(NormalizedValue::Number(3.0))
        );
        assert_eq!(
            normalizers.normalize(schema(keys::DIRECTION), "Sell"),
            Ok(NormalizedValue::Direction(Direction::Short))
        );
        assert_eq!(
            normalizers.normalize(schema(keys::BREAK_EVEN), "perhaps"),
            Ok(NormalizedValue::Flag(false))
        );
        assert_eq!(
            normalizers.normalize(schema(keys::MARKET), " EURUSD "),
            Ok(NormalizedValue::Text("EURUSD".to_string()))
        );
    }

    #[test]
    fn test_time_taken_from_combined_cell() {
        let normalizers = Normalizers::default();
        assert_eq!(
            normalizers.normalize(schema(keys::TRADE_TIME), "2024-01-02 14:05"),
            Ok(NormalizedValue::Time(NaiveTime::from_hms_opt(14, 5, 0).unwrap()))
        );
    }

    #[test]
    fn test_errors() {
        let normalizers = Normalizers::default();
        assert_eq!(
            normalizers.normalize(schema(keys::TRADE_DATE), "yesterday"),
            Err(NormalizeError::InvalidDate("yesterday".to_string()))
        );
        assert!(matches!(
            normalizers.normalize(schema(keys::TRADE_OUTCOME), "Gagné"),
            Err(NormalizeError::UnknownCategory { .. })
        ));
    }
}
