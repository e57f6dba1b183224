//! Builder API for design models and realtime sessions.
//!
//! # Example
//!
//! ```rust
//! use design_awareness::model::builder::{DesignModelBuilder, SessionRecorder};
//! use design_awareness::util::now_millis;
//!
//! let model = DesignModelBuilder::new("Double Diamond")
//!     .activity("Discover", "DI", "ff8800", "cc6600")
//!     .activity("Define", "DE", "0088ff", "0066cc")
//!     .build();
//!
//! let mut recorder = SessionRecorder::new(model.activity_count(), now_millis());
//! recorder.toggle(0, 0).unwrap();
//! recorder.toggle(1, 5_000).unwrap();
//! recorder.toggle(0, 7_500).unwrap();
//! let session = recorder.finish(10_000);
//!
//! assert_eq!(session.active_time(0), Some(7_500));
//! assert_eq!(session.active_time(1), Some(5_000));
//! ```

use chrono::{DateTime, Utc};

use crate::limits::OPEN_PAIR_END;
use crate::model::design_model::{Activity, ActivityColor, DesignModel, DesignModelDescription};
use crate::model::id::{generate_id, is_well_known, Id};
use crate::model::note::{GenericNote, TimedNote};
use crate::model::realtime::{ActivityRecord, RealtimeSession, TimingPair};
use crate::util::datetime::truncate_to_millis;

/// Builder for a [`DesignModel`].
#[derive(Debug, Clone)]
pub struct DesignModelBuilder {
    id: Id,
    name: String,
    activities: Vec<Activity>,
    description: Option<DesignModelDescription>,
}

impl DesignModelBuilder {
    /// Starts a user-defined model with a generated ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(generate_id(), name)
    }

    /// Starts a model with an explicit ID. The `wellKnown` flag of the built
    /// model follows the shape of the ID.
    pub fn with_id(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            activities: Vec::new(),
            description: None,
        }
    }

    /// Appends an activity.
    pub fn activity(
        mut self,
        name: impl Into<String>,
        code: impl Into<String>,
        light: impl Into<String>,
        dark: impl Into<String>,
    ) -> Self {
        self.activities.push(Activity {
            name: name.into(),
            code: code.into(),
            color: ActivityColor::new(light, dark),
            description: String::new(),
        });
        self
    }

    /// Sets the description of the most recently added activity.
    pub fn activity_description(mut self, description: impl Into<String>) -> Self {
        if let Some(last) = self.activities.last_mut() {
            last.description = description.into();
        }
        self
    }

    pub fn description(mut self, description: DesignModelDescription) -> Self {
        self.description = Some(description);
        self
    }

    pub fn build(self) -> DesignModel {
        DesignModel {
            well_known: is_well_known(&self.id),
            id: self.id,
            name: self.name,
            activities: self.activities,
            description: self.description,
        }
    }
}

/// Error returned by [`SessionRecorder`] for an out-of-order or unknown
/// toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("activity index {index} out of range ({count} activities)")]
    UnknownActivity { index: usize, count: usize },

    #[error("toggle at {at} ms is earlier than the last event at {last} ms")]
    TimeWentBackwards { at: u64, last: u64 },

    #[error("activity {index} switched off at {at} ms, the instant it was switched on")]
    EmptyInterval { index: usize, at: u64 },
}

/// Records activity on/off events of a live session.
///
/// While recording, an activity that is on holds an open pair (off-time
/// `-1`). [`SessionRecorder::finish`] closes every open pair at the final
/// duration and yields a closed session.
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    id: Id,
    start: DateTime<Utc>,
    data: Vec<ActivityRecord>,
    notes: Vec<TimedNote>,
    last_event: u64,
}

impl SessionRecorder {
    /// Starts recording. `start` is kept at millisecond precision.
    pub fn new(activity_count: usize, start: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            start: truncate_to_millis(start),
            data: vec![Vec::new(); activity_count],
            notes: Vec::new(),
            last_event: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns true if the activity at `index` is currently on.
    pub fn is_on(&self, index: usize) -> bool {
        self.data
            .get(index)
            .and_then(|r| r.last())
            .is_some_and(TimingPair::is_open)
    }

    /// Flips the activity at `index` on or off at `at` ms into the session.
    pub fn toggle(&mut self, index: usize, at: u64) -> Result<(), RecordError> {
        let count = self.data.len();
        if index >= count {
            return Err(RecordError::UnknownActivity { index, count });
        }
        if at < self.last_event {
            return Err(RecordError::TimeWentBackwards {
                at,
                last: self.last_event,
            });
        }
        let at_ms = i64::try_from(at).unwrap_or(i64::MAX);
        let record = &mut self.data[index];
        match record.last().copied() {
            Some(pair) if pair.is_open() => {
                if pair.on == at_ms {
                    return Err(RecordError::EmptyInterval { index, at });
                }
                set_last_off(record, at_ms);
            }
            // Pairs never touch: switching back on at the same instant
            // extends the previous interval instead.
            Some(pair) if pair.off == at_ms => set_last_off(record, OPEN_PAIR_END),
            _ => record.push(TimingPair::open(at_ms)),
        }
        self.last_event = at;
        Ok(())
    }

    /// Adds a note at `at` ms into the session.
    pub fn note(&mut self, content: impl Into<String>, at: u64, created: DateTime<Utc>) {
        self.notes.push(TimedNote {
            note: GenericNote {
                id: generate_id(),
                content: content.into(),
                created: truncate_to_millis(created),
            },
            time: at,
        });
    }

    /// Snapshot of the session as it stands, with open pairs left open.
    pub fn snapshot(&self, duration: u64) -> RealtimeSession {
        RealtimeSession {
            id: self.id.clone(),
            duration,
            start: self.start,
            data: self.data.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Ends the session at `duration` ms, switching every activity off.
    pub fn finish(mut self, duration: u64) -> RealtimeSession {
        let end = i64::try_from(duration.max(self.last_event)).unwrap_or(i64::MAX);
        for record in &mut self.data {
            match record.last().copied() {
                Some(pair) if pair.is_open() && pair.on < end => set_last_off(record, end),
                Some(pair) if pair.is_open() => {
                    record.pop();
                }
                _ => {}
            }
        }
        RealtimeSession {
            id: self.id,
            duration: duration.max(self.last_event),
            start: self.start,
            data: self.data,
            notes: self.notes,
        }
    }
}

fn set_last_off(record: &mut ActivityRecord, off: i64) {
    if let Some(last) = record.last_mut() {
        last.off = off;
    }
}
