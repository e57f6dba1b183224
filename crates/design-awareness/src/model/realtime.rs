//! Realtime tracking: sessions of activity on/off intervals.

use chrono::{DateTime, Utc};
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::limits::OPEN_PAIR_END;
use crate::model::id::Id;
use crate::model::note::TimedNote;
use crate::model::project::ProjectMetadata;

/// One activation of an activity: `[onTimeMs, offTimeMs]`, both relative
/// to the session start.
///
/// An off-time of `-1` marks an activity that is still on; such a pair can
/// only exist while its session is ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingPair {
    pub on: i64,
    pub off: i64,
}

impl TimingPair {
    pub fn new(on: i64, off: i64) -> Self {
        Self { on, off }
    }

    /// A pair whose activity has not been switched off yet.
    pub fn open(on: i64) -> Self {
        Self { on, off: OPEN_PAIR_END }
    }

    pub fn is_open(&self) -> bool {
        self.off == OPEN_PAIR_END
    }

    /// Length in milliseconds, or `None` for an open pair.
    pub fn length(&self) -> Option<u64> {
        if self.is_open() {
            None
        } else {
            self.off
                .checked_sub(self.on)
                .and_then(|d| u64::try_from(d).ok())
        }
    }
}

impl Serialize for TimingPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&self.on)?;
        t.serialize_element(&self.off)?;
        t.end()
    }
}

/// Sorted, non-overlapping timing pairs of one activity.
pub type ActivityRecord = Vec<TimingPair>;

/// A realtime tracking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealtimeSession {
    pub id: Id,
    /// Session length in milliseconds.
    pub duration: u64,
    #[serde(serialize_with = "crate::util::datetime::serialize")]
    pub start: DateTime<Utc>,
    /// One record per activity, index-aligned with the design model.
    pub data: Vec<ActivityRecord>,
    pub notes: Vec<TimedNote>,
}

impl RealtimeSession {
    /// Returns true if any activity is still on.
    pub fn is_ongoing(&self) -> bool {
        self.data.iter().flatten().any(TimingPair::is_open)
    }

    /// Total time the activity at `index` was on, in milliseconds.
    ///
    /// An open pair counts up to the current session duration.
    pub fn active_time(&self, index: usize) -> Option<u64> {
        let record = self.data.get(index)?;
        Some(
            record
                .iter()
                .map(|p| {
                    p.length()
                        .unwrap_or_else(|| self.duration.saturating_sub(p.on.max(0) as u64))
                })
                .sum(),
        )
    }

    /// End of the session as an absolute instant.
    pub fn end(&self) -> DateTime<Utc> {
        i64::try_from(self.duration)
            .ok()
            .and_then(chrono::TimeDelta::try_milliseconds)
            .and_then(|d| self.start.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// A project tracked live, session by session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealtimeProject {
    pub id: Id,
    #[serde(flatten)]
    pub metadata: ProjectMetadata,
    pub sessions: Vec<RealtimeSession>,
}

impl RealtimeProject {
    /// Total tracked time of an activity across all sessions.
    pub fn active_time(&self, index: usize) -> u64 {
        self.sessions
            .iter()
            .filter_map(|s| s.active_time(index))
            .sum()
    }
}
