//! The seven entity types a document can carry.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::model::async_tracking::{AsyncEntry, AsyncProject};
use crate::model::design_model::DesignModel;
use crate::model::note::{ProjectNote, TimedNote};
use crate::model::realtime::{RealtimeProject, RealtimeSession};

/// Entity type names as written in the envelope `type` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    DesignModel,
    RealtimeProject,
    RealtimeSession,
    AsyncProject,
    AsyncEntry,
    ProjectNote,
    TimedNote,
}

impl EntityType {
    pub const ALL: [EntityType; 7] = [
        EntityType::DesignModel,
        EntityType::RealtimeProject,
        EntityType::RealtimeSession,
        EntityType::AsyncProject,
        EntityType::AsyncEntry,
        EntityType::ProjectNote,
        EntityType::TimedNote,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityType::DesignModel => "DesignModel",
            EntityType::RealtimeProject => "RealtimeProject",
            EntityType::RealtimeSession => "RealtimeSession",
            EntityType::AsyncProject => "AsyncProject",
            EntityType::AsyncEntry => "AsyncEntry",
            EntityType::ProjectNote => "ProjectNote",
            EntityType::TimedNote => "TimedNote",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Project types are the ones a host imports and exports as whole
    /// documents; the rest travel as components.
    pub fn is_root_document(&self) -> bool {
        matches!(self, EntityType::RealtimeProject | EntityType::AsyncProject)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated entity of any of the seven types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    DesignModel(DesignModel),
    RealtimeProject(RealtimeProject),
    RealtimeSession(RealtimeSession),
    AsyncProject(AsyncProject),
    AsyncEntry(AsyncEntry),
    ProjectNote(ProjectNote),
    TimedNote(TimedNote),
}

impl Entity {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Entity::DesignModel(_) => EntityType::DesignModel,
            Entity::RealtimeProject(_) => EntityType::RealtimeProject,
            Entity::RealtimeSession(_) => EntityType::RealtimeSession,
            Entity::AsyncProject(_) => EntityType::AsyncProject,
            Entity::AsyncEntry(_) => EntityType::AsyncEntry,
            Entity::ProjectNote(_) => EntityType::ProjectNote,
            Entity::TimedNote(_) => EntityType::TimedNote,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::DesignModel(e) => &e.id,
            Entity::RealtimeProject(e) => &e.id,
            Entity::RealtimeSession(e) => &e.id,
            Entity::AsyncProject(e) => &e.id,
            Entity::AsyncEntry(e) => &e.id,
            Entity::ProjectNote(e) => &e.id,
            Entity::TimedNote(e) => e.id(),
        }
    }

    /// Serializes the entity to the JSON value carried in the envelope
    /// `data` key. Every field is written, defaulted or not.
    pub fn to_data(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entity::DesignModel(e) => e.serialize(serializer),
            Entity::RealtimeProject(e) => e.serialize(serializer),
            Entity::RealtimeSession(e) => e.serialize(serializer),
            Entity::AsyncProject(e) => e.serialize(serializer),
            Entity::AsyncEntry(e) => e.serialize(serializer),
            Entity::ProjectNote(e) => e.serialize(serializer),
            Entity::TimedNote(e) => e.serialize(serializer),
        }
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Entity {
                fn from(e: $ty) -> Self {
                    Entity::$variant(e)
                }
            }
        )*
    };
}

impl_from_entity!(
    DesignModel(DesignModel),
    RealtimeProject(RealtimeProject),
    RealtimeSession(RealtimeSession),
    AsyncProject(AsyncProject),
    AsyncEntry(AsyncEntry),
    ProjectNote(ProjectNote),
    TimedNote(TimedNote),
);
