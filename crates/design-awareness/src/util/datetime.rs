//! ISO-8601 timestamp parsing and formatting.
//!
//! Timestamps travel as RFC 3339 strings. Internally they are `DateTime<Utc>`
//! with millisecond precision, which is the precision producers of the format
//! write. Parsing accepts any offset, converts to UTC and drops sub-millisecond
//! digits; formatting always emits `YYYY-MM-DDTHH:MM:SS.mmmZ`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Error type for timestamp parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

/// Drops everything below the millisecond.
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}

/// Returns the current wall-clock time at millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

/// Parses an RFC 3339 timestamp into a millisecond-precision UTC instant.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DateTimeParseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| truncate_to_millis(dt.with_timezone(&Utc)))
        .map_err(|e| DateTimeParseError {
            message: format!("Invalid RFC 3339 timestamp {s:?}: {e}"),
        })
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` adapter for timestamp fields.
pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(dt))
}
