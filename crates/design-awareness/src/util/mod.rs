//! Utility modules for the Design Awareness format.

pub mod datetime;
pub mod period;

pub use datetime::{
    format_timestamp, now_millis, parse_timestamp, truncate_to_millis, DateTimeParseError,
};
pub use period::{
    normalize_period, start_of_day, weekday_from_index, weekday_index, ReportingPeriod,
};
