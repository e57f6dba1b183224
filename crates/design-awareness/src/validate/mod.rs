//! Validation and normalization of untrusted entity data.
//!
//! The validator walks the whole `data` tree of a document and does not stop
//! at the first problem: every violation is collected and tagged with its
//! path (e.g. `sessions[2].data[0][1]`). For each entity it
//! 1. checks required fields and their primitive shape,
//! 2. fills absent optional fields with their defaults,
//! 3. runs cross-field and cross-entity invariant checks.
//!
//! A structural failure only suppresses the checks that depend on the
//! missing structure. A typed [`Entity`] is produced only when the tree is
//! free of violations.

mod entity;
mod fields;
pub mod timing;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde_json::Value;
use tracing::debug;

use crate::error::{DocumentErrors, ValidationError, Violation};
use crate::limits::MAX_DOCUMENT_SIZE;
use crate::model::{DesignModel, Entity, EntityType};
use crate::util::datetime::{now_millis, truncate_to_millis};
use crate::util::period::ReportingPeriod;

pub use timing::{is_valid_record, validate_record, TimingReport};

/// Options controlling decoding and validation.
///
/// The `now` instant is captured once, so every timestamp defaulted while
/// decoding one document carries the same value. Inject it for
/// deterministic output.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Instant used for absent `created` / `modified` fields.
    pub now: DateTime<Utc>,
    /// Maximum accepted size of an encoded document in bytes.
    pub max_document_size: usize,
    /// Treat the last session of a realtime project (or a lone session) as
    /// ongoing, allowing its records to end with an open pair.
    pub ongoing_session: bool,
    /// Design model used to check a lone `RealtimeSession` or `AsyncEntry`.
    pub design_model: Option<DesignModel>,
    /// Reporting period used to check the period of a lone `AsyncEntry`.
    pub reporting_period: Option<ReportingPeriod>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            now: now_millis(),
            max_document_size: MAX_DOCUMENT_SIZE,
            ongoing_session: false,
            design_model: None,
            reporting_period: None,
        }
    }
}

impl DecodeOptions {
    /// Creates default options stamped with the current time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the instant used for defaulted timestamps.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = truncate_to_millis(now);
        self
    }

    pub fn with_max_document_size(mut self, max: usize) -> Self {
        self.max_document_size = max;
        self
    }

    pub fn with_ongoing_session(mut self, ongoing: bool) -> Self {
        self.ongoing_session = ongoing;
        self
    }

    /// Context for decoding a lone session or entry as a component.
    pub fn with_design_model(mut self, model: DesignModel) -> Self {
        self.design_model = Some(model);
        self
    }

    /// Context for decoding a lone async entry as a component.
    pub fn with_reporting_period(mut self, period: ReportingPeriod) -> Self {
        self.reporting_period = Some(period);
        self
    }
}

/// Validates the `data` value of a document of the given type.
///
/// Returns the typed, default-filled entity, or every violation found.
pub fn validate_entity(
    entity_type: EntityType,
    data: &Value,
    options: &DecodeOptions,
) -> Result<Entity, DocumentErrors> {
    let mut v = Validator::new(options);
    let entity = v.entity(entity_type, data);
    v.finish(entity)
}

/// Walk state: options plus every violation found so far.
pub(crate) struct Validator<'o> {
    options: &'o DecodeOptions,
    violations: Vec<Violation>,
    seen_ids: FxHashSet<String>,
}

impl<'o> Validator<'o> {
    fn new(options: &'o DecodeOptions) -> Self {
        Self {
            options,
            violations: Vec::new(),
            seen_ids: FxHashSet::default(),
        }
    }

    fn report(&mut self, path: impl Into<String>, error: impl Into<ValidationError>) {
        self.violations.push(Violation::new(path, error));
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, DocumentErrors> {
        match value {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => {
                debug!(violations = self.violations.len(), "entity failed validation");
                Err(DocumentErrors::new(self.violations))
            }
        }
    }
}

/// Path of `key` inside the object at `parent`.
pub(crate) fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Path of element `index` of the array at `parent`.
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
