//! Timestamp normalization.
//!
//! Notion date properties hold either a full RFC3339 datetime or a bare
//! `YYYY-MM-DD` date. Calendar providers want a datetime, so both are
//! widened to a UTC RFC3339 string here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use thiserror::Error;

/// Errors from timestamp normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The value was neither RFC3339, a naive datetime, nor a date.
    #[error("unrecognized timestamp '{0}'")]
    Unrecognized(String),
}

/// Normalizes a timestamp to a UTC RFC3339 string with second precision.
///
/// - `2024-01-01T10:00:00+02:00` becomes `2024-01-01T08:00:00Z`
/// - `2024-01-01T10:00:00` is taken as UTC
/// - `2024-01-01` becomes midnight UTC
pub fn normalize_timestamp(value: &str) -> Result<String, TimeError> {
    let value = value.trim();
    parse_utc(value)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| TimeError::Unrecognized(value.to_string()))
}

fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
