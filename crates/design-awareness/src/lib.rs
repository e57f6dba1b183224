//! Design Awareness: a portable interchange format for design-process
//! tracking data.
//!
//! This crate decodes, validates, normalizes and encodes Design Awareness
//! documents: design models, realtime and async tracked projects, sessions,
//! entries and notes.
//!
//! # Overview
//!
//! Every document crossing a trust boundary goes through the same pipeline:
//! - **Envelope**: `{ "$format", "version", "type", "data", "meta"? }` is
//!   checked fail-fast
//! - **Validation**: the `data` tree is checked in full and every violation
//!   is reported with its path
//! - **Normalization**: absent optional fields get their defaults, so the
//!   typed entity is always complete
//!
//! # Quick Start
//!
//! ```rust
//! use design_awareness::{decode_document, encode_document, DecodeOptions, EncodeOptions, Entity};
//! use design_awareness::model::builder::{DesignModelBuilder, SessionRecorder};
//! use design_awareness::util::now_millis;
//!
//! let model = DesignModelBuilder::new("Double Diamond")
//!     .activity("Discover", "DI", "ff8800", "cc6600")
//!     .activity("Deliver", "DL", "0088ff", "0066cc")
//!     .build();
//!
//! let mut recorder = SessionRecorder::new(model.activity_count(), now_millis());
//! recorder.toggle(0, 0).unwrap();
//! recorder.toggle(0, 60_000).unwrap();
//! let session = recorder.finish(90_000);
//!
//! let bytes = encode_document(&Entity::from(session.clone()), None, &EncodeOptions::new()).unwrap();
//! let decoded = decode_document(&bytes, &DecodeOptions::new()).unwrap();
//! assert_eq!(decoded, Entity::RealtimeSession(session));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Entity types, IDs and builders
//! - [`codec`]: Envelope encoding/decoding
//! - [`validate`]: Validation and normalization of untrusted data
//! - [`document`]: The decode/encode pipeline
//! - [`well_known`]: Registry of standard design models
//! - [`util`]: Timestamp and reporting-period arithmetic
//! - [`error`]: Error types
//! - [`limits`]: Format constants and limits
//!
//! # Errors
//!
//! Decoding never stops at the first problem inside `data`. A rejected
//! document yields a [`DocumentErrors`] listing every [`Violation`], each
//! tagged with a path such as `sessions[2].data[0][1]` and classified by
//! [`ErrorKind`].

pub mod codec;
pub mod document;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;
pub mod validate;
pub mod well_known;

// Re-export commonly used types at crate root
pub use codec::{decode_envelope, encode_envelope, EncodeOptions, Envelope};
pub use document::{decode_document, encode_document};
pub use error::{
    DocumentErrors, EncodeError, EnvelopeError, ErrorKind, ErrorSource, TimingViolation,
    ValidationError, Violation,
};
pub use model::{
    generate_id, Activity, ActivityColor, AsyncActivityData, AsyncEntry, AsyncProject,
    DesignModel, DesignModelBuilder, DesignModelDescription, Entity, EntityType, Id,
    ProjectMetadata, ProjectNote, RealtimeProject, RealtimeSession, SessionRecorder, TimedNote,
    TimingPair,
};
pub use util::ReportingPeriod;
pub use validate::{validate_entity, validate_record, DecodeOptions};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Document format version written by this crate.
pub const FORMAT_VERSION: &str = limits::FORMAT_VERSION;
