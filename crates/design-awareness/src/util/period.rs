//! Reporting-period calendar arithmetic for async entries.
//!
//! Periods are bucketed on UTC calendar days. Normalization only ever
//! truncates or steps backwards, never forwards, which makes it idempotent.

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc, Weekday};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Cadence at which an async project's entries are bucketed, together with
/// the week alignment that is only meaningful for weekly reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportingPeriod {
    Daily,
    Weekly { alignment: Weekday },
}

impl ReportingPeriod {
    /// Weekly reporting aligned on Sunday.
    pub const WEEKLY: ReportingPeriod = ReportingPeriod::Weekly {
        alignment: Weekday::Sun,
    };

    /// Builds the period from its wire fields.
    ///
    /// Returns `None` for an unknown period name. The alignment is ignored
    /// for daily reporting.
    pub fn from_wire(reporting_period: &str, alignment: Weekday) -> Option<Self> {
        match reporting_period {
            "day" => Some(ReportingPeriod::Daily),
            "week" => Some(ReportingPeriod::Weekly { alignment }),
            _ => None,
        }
    }

    /// The wire name: `"day"` or `"week"`.
    pub fn name(&self) -> &'static str {
        match self {
            ReportingPeriod::Daily => "day",
            ReportingPeriod::Weekly { .. } => "week",
        }
    }

    /// The wire `periodAlignment`; 0 (Sunday) for daily reporting.
    pub fn alignment_index(&self) -> u8 {
        match self {
            ReportingPeriod::Daily => 0,
            ReportingPeriod::Weekly { alignment } => weekday_index(*alignment),
        }
    }

    /// Normalizes `period` under this reporting period.
    pub fn normalize(&self, period: DateTime<Utc>) -> DateTime<Utc> {
        normalize_period(period, *self)
    }

    /// Returns true if `period` is already normalized.
    pub fn is_normalized(&self, period: DateTime<Utc>) -> bool {
        self.normalize(period) == period
    }
}

// Flattened into the owning project as `reportingPeriod` + `periodAlignment`.
impl Serialize for ReportingPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ReportingPeriod", 2)?;
        s.serialize_field("reportingPeriod", self.name())?;
        s.serialize_field("periodAlignment", &self.alignment_index())?;
        s.end()
    }
}

/// Maps a wire weekday (0 = Sunday .. 6 = Saturday) to a [`Weekday`].
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Maps a [`Weekday`] to its wire index (0 = Sunday).
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Truncates an instant to the start of its UTC calendar day.
pub fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Normalizes a reporting period timestamp.
///
/// - `Daily`: start of the UTC day.
/// - `Weekly`: start of the UTC day, then back to the most recent day whose
///   weekday equals the alignment (the day itself if it already matches).
pub fn normalize_period(period: DateTime<Utc>, reporting: ReportingPeriod) -> DateTime<Utc> {
    let day = start_of_day(period);
    match reporting {
        ReportingPeriod::Daily => day,
        ReportingPeriod::Weekly { alignment } => {
            let current = day.weekday().num_days_from_sunday();
            let target = alignment.num_days_from_sunday();
            let back = (current + 7 - target) % 7;
            day.checked_sub_days(Days::new(u64::from(back)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        }
    }
}
