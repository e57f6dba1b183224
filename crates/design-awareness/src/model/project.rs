//! Metadata shared by realtime and async projects.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::design_model::DesignModel;
use crate::model::note::ProjectNote;

/// Fields common to both project kinds.
///
/// The design model is embedded, not referenced: a project carries its own
/// copy of the model so its tracking data can always be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "crate::util::datetime::serialize")]
    pub created: DateTime<Utc>,
    #[serde(serialize_with = "crate::util::datetime::serialize")]
    pub modified: DateTime<Utc>,
    pub active: bool,
    pub design_model: DesignModel,
    pub notes: Vec<ProjectNote>,
}
