use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

// Candidate string formats, tried in this order; first successful parse wins.
// Datetime inputs truncate to their calendar date.
//
//   1. ISO calendar date            2024-01-15
//   2. RFC 3339 datetime            2024-01-15T08:30:00Z
//   3. ISO datetime, no offset      2024-01-15 08:30:00 / 2024-01-15T08:30:00
//   4. Epoch seconds/milliseconds   1705305600 / 1705305600000
//   5. US slash date                01/15/2024
//   6. US dash date                 01-15-2024
//   7. Long month date              January 15, 2024 / Jan 15, 2024

/// Coerce a raw date value (string or epoch number) to a calendar date.
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    // Platform timestamps often arrive as stringified epochs
    if s.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(epoch) = s.parse::<i64>() {
            return from_epoch(epoch);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%m-%d-%Y") {
        return Some(d);
    }
    for fmt in ["%B %d, %Y", "%b %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

// Values at or above this magnitude are read as milliseconds, below as seconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

fn from_epoch(epoch: i64) -> Option<NaiveDate> {
    let dt = if epoch.abs() >= EPOCH_MILLIS_CUTOFF {
        DateTime::from_timestamp_millis(epoch)?
    } else {
        DateTime::from_timestamp(epoch, 0)?
    };
    Some(dt.date_naive())
}
