//! Async tracking: minutes per activity, reported per day or week.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::id::Id;
use crate::model::project::ProjectMetadata;
use crate::util::period::ReportingPeriod;

/// Minutes spent on one activity during a reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsyncActivityData {
    pub value: u64,
    pub note: String,
}

/// One reporting period's worth of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsyncEntry {
    pub id: Id,
    /// One item per activity, index-aligned with the design model.
    pub data: Vec<AsyncActivityData>,
    /// Normalized start of the reporting period.
    #[serde(serialize_with = "crate::util::datetime::serialize")]
    pub period: DateTime<Utc>,
    pub note: String,
    #[serde(serialize_with = "crate::util::datetime::serialize")]
    pub created: DateTime<Utc>,
    #[serde(serialize_with = "crate::util::datetime::serialize")]
    pub modified: DateTime<Utc>,
}

impl AsyncEntry {
    /// Total minutes across all activities.
    pub fn total_minutes(&self) -> u64 {
        self.data.iter().map(|d| d.value).sum()
    }
}

/// A project whose time is reported after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsyncProject {
    pub id: Id,
    #[serde(flatten)]
    pub metadata: ProjectMetadata,
    /// Written as `reportingPeriod` and `periodAlignment`.
    #[serde(flatten)]
    pub reporting_period: ReportingPeriod,
    pub entries: Vec<AsyncEntry>,
}

impl AsyncProject {
    /// Finds the entry covering the reporting period that contains `at`.
    pub fn entry_for(&self, at: DateTime<Utc>) -> Option<&AsyncEntry> {
        let period = self.reporting_period.normalize(at);
        self.entries.iter().find(|e| e.period == period)
    }

    /// Total minutes recorded for the activity at `index`.
    pub fn minutes_for(&self, index: usize) -> u64 {
        self.entries
            .iter()
            .filter_map(|e| e.data.get(index))
            .map(|d| d.value)
            .sum()
    }
}
