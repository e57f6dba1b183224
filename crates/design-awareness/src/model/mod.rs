//! Data model types for the Design Awareness format.
//!
//! This module contains the typed entity graph produced by validation:
//! - Identifiers (generated and well-known)
//! - Design models and activities
//! - Realtime projects, sessions and timing pairs
//! - Async projects and entries
//! - Notes
//! - Builders (ergonomic construction)

pub mod async_tracking;
pub mod builder;
pub mod design_model;
pub mod entity;
pub mod id;
pub mod note;
pub mod project;
pub mod realtime;

pub use async_tracking::{AsyncActivityData, AsyncEntry, AsyncProject};
pub use builder::{DesignModelBuilder, RecordError, SessionRecorder};
pub use design_model::{
    check_well_known_flag, is_hex_color, Activity, ActivityColor, DesignModel,
    DesignModelDescription,
};
pub use entity::{Entity, EntityType};
pub use id::{classify, generate_id, is_well_known, parse_well_known, Id, IdClass, IdKind};
pub use note::{GenericNote, ProjectNote, TimedNote};
pub use project::ProjectMetadata;
pub use realtime::{ActivityRecord, RealtimeProject, RealtimeSession, TimingPair};
