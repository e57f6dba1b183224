//! Notes attached to projects and sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::id::Id;

/// Free-text note with a creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericNote {
    pub id: Id,
    pub content: String,
    #[serde(serialize_with = "crate::util::datetime::serialize")]
    pub created: DateTime<Utc>,
}

/// A note attached to a project.
pub type ProjectNote = GenericNote;

/// A note pinned to a session-relative time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedNote {
    #[serde(flatten)]
    pub note: GenericNote,
    /// Milliseconds since session start, within `[0, duration]`.
    pub time: u64,
}

impl TimedNote {
    pub fn id(&self) -> &str {
        &self.note.id
    }
}
