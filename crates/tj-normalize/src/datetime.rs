//! Date and time parsing for trade exports.
//!
//! Dates are emitted as `YYYY-MM-DD`. Input formats are tried in a fixed
//! priority order, so an ambiguous value such as `03/04/2024` always resolves
//! the same way (day first).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical output format for dates.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date formats in priority order. Day-first precedes month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%Y-%b-%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y%m%d",
    "%d.%m.%y",
    "%d/%m/%y",
    "%m/%d/%y",
    "%d-%m-%y",
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S",
    "%H:%M",
    "%H:%M:%S%.f",
    "%I:%M %p",
    "%I:%M:%S %p",
    "%I:%M%p",
    "%I:%M:%S%p",
];

/// Plausible trade years; rejects `%Y` reading a two-digit year literally.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2100;

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;
    YEAR_RANGE.contains(&date.year()).then_some(date)
}

/// Parses a date-only value.
pub fn parse_trade_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok().and_then(plausible))
}

/// Parses a time-only value, including compact `HHMM`.
pub fn parse_trade_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() == 4 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let hour = trimmed[..2].parse().ok()?;
        let minute = trimmed[2..].parse().ok()?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(trimmed, fmt).ok())
}

/// Parses a value that holds a date, optionally followed by a time.
///
/// Accepts RFC 3339 timestamps, `T`-separated ISO values and any supported
/// date followed by whitespace and a supported time.
pub fn parse_date_time(raw: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = parse_trade_date(trimmed) {
        return Some((date, None));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        let naive = dt.naive_local();
        return plausible(naive.date()).map(|date| (date, Some(naive.time())));
    }
    let bare = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(bare, fmt) {
            return plausible(dt.date()).map(|date| (date, Some(dt.time())));
        }
    }
    // Try every whitespace split, leftmost first.
    for (idx, ch) in bare.char_indices() {
        if !ch.is_whitespace() {
            continue;
        }
        let (date_part, time_part) = bare.split_at(idx);
        if let (Some(date), Some(time)) =
            (parse_trade_date(date_part), parse_trade_time(time_part))
        {
            return Some((date, Some(time)));
        }
    }
    None
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

pub fn is_date_like(raw: &str) -> bool {
    parse_trade_date(raw).is_some()
}

pub fn is_time_like(raw: &str) -> bool {
    parse_trade_time(raw).is_some()
}

/// True when the value carries both a date and a time.
pub fn is_date_time_like(raw: &str) -> bool {
    matches!(parse_date_time(raw), Some((_, Some(_))))
}
