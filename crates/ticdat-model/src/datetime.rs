//! Best-effort datetime interpretation for datetime-typed fields.
//!
//! Parsing runs a fixed chain: strict timestamp forms first (RFC 3339 and
//! ISO 8601 with or without a time part), then a set of lenient free-text
//! layouts. Every failure is swallowed and reported as `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::value::Value;

/// Timestamp layouts accepted without a timezone.
const STRICT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const STRICT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Free-text layouts tried after the strict forms.
const LENIENT_DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%d.%m.%Y %H:%M",
    "%b %d, %Y %H:%M",
    "%B %d, %Y %H:%M",
];

const LENIENT_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%a, %d %b %Y",
    "%A, %B %d, %Y",
];

/// Interpret a value as a datetime, if possible.
///
/// Datetime values pass through. Text is parsed with the strict chain, then
/// the lenient chain. Numbers, booleans and nulls are never datetimes.
pub fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(datetime) => Some(*datetime),
        Value::Text(text) => parse_strict(text).or_else(|| parse_lenient(text)),
        _ => None,
    }
}

/// Parse well-formed timestamps.
pub fn parse_strict(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.naive_utc());
    }
    parse_with(trimmed, STRICT_DATETIME_FORMATS, STRICT_DATE_FORMATS)
}

/// Parse common human-written date layouts.
pub fn parse_lenient(text: &str) -> Option<NaiveDateTime> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(&normalized) {
        return Some(datetime.naive_utc());
    }
    parse_with(&normalized, LENIENT_DATETIME_FORMATS, LENIENT_DATE_FORMATS)
}

fn parse_with(text: &str, datetime_formats: &[&str], date_formats: &[&str]) -> Option<NaiveDateTime> {
    datetime_formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            date_formats
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
