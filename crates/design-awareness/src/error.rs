//! Error types for envelope decoding, entity validation and encoding.

use std::fmt;

use thiserror::Error;

/// Error classes reported to consumers.
///
/// Every concrete error maps onto exactly one kind, so a consumer can decide
/// whether a list of violations is fatal without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Envelope, version or ID-shape mismatch.
    Format,
    /// Missing required field or wrong primitive type.
    Structural,
    /// Numeric value outside its legal bounds.
    Range,
    /// Timing pairs unsorted or overlapping.
    Ordering,
    /// Tracking data inconsistent with the owning design model.
    Referential,
    /// Envelope `type` is not one of the known entity names.
    UnknownType,
}

impl ErrorKind {
    /// Returns the error class name (e.g., "RangeError").
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Format => "FormatError",
            ErrorKind::Structural => "StructuralError",
            ErrorKind::Range => "RangeError",
            ErrorKind::Ordering => "OrderingError",
            ErrorKind::Referential => "ReferentialError",
            ErrorKind::UnknownType => "UnknownTypeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error while unwrapping the top-level envelope.
///
/// Envelope checks are fail-fast: nothing inside `data` is looked at until
/// the envelope itself is sound.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvelopeError {
    #[error("[FormatError] document is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("[FormatError] document root is not a JSON object")]
    NotAnObject,

    #[error("[FormatError] document size {len} exceeds maximum {max}")]
    DocumentTooLarge { len: usize, max: usize },

    #[error("[FormatError] invalid $format tag: expected \"design-awareness\", found {found:?}")]
    InvalidFormatTag { found: Option<String> },

    #[error("[FormatError] unsupported version: {version:?}")]
    UnsupportedVersion { version: String },

    #[error("[StructuralError] envelope is missing required key `{key}`")]
    MissingKey { key: &'static str },

    #[error("[StructuralError] envelope key `{key}` must be {expected}")]
    WrongKeyType { key: &'static str, expected: &'static str },

    #[error("[UnknownTypeError] unknown entity type: {type_name:?}")]
    UnknownType { type_name: String },
}

impl EnvelopeError {
    /// Returns the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnvelopeError::MissingKey { .. } | EnvelopeError::WrongKeyType { .. } => {
                ErrorKind::Structural
            }
            EnvelopeError::UnknownType { .. } => ErrorKind::UnknownType,
            _ => ErrorKind::Format,
        }
    }

    /// Returns the envelope key this error is about, if any.
    fn key(&self) -> &'static str {
        match self {
            EnvelopeError::InvalidFormatTag { .. } => "$format",
            EnvelopeError::UnsupportedVersion { .. } => "version",
            EnvelopeError::MissingKey { key } | EnvelopeError::WrongKeyType { key, .. } => *key,
            EnvelopeError::UnknownType { .. } => "type",
            _ => "",
        }
    }
}

/// A single offending pair found by the realtime timing validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimingViolation {
    #[error("on-time {on} is negative")]
    NegativeOnTime { on: i64 },

    #[error("on-time {on} exceeds session duration {duration}")]
    OnBeyondDuration { on: i64, duration: u64 },

    #[error("off-time {off} exceeds session duration {duration}")]
    OffBeyondDuration { off: i64, duration: u64 },

    #[error("open pair (off-time -1) is only allowed while the session is ongoing")]
    OpenPairOnClosedSession,

    #[error("open pair (off-time -1) is only allowed as the last pair of a record")]
    OpenPairNotLast,

    #[error("off-time {off} is not after on-time {on}")]
    OffNotAfterOn { on: i64, off: i64 },

    #[error("on-time {on} does not come strictly after previous off-time {previous_off}")]
    OverlapsPrevious { previous_off: i64, on: i64 },
}

impl TimingViolation {
    /// Returns the error kind for this violation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TimingViolation::OffNotAfterOn { .. } | TimingViolation::OverlapsPrevious { .. } => {
                ErrorKind::Ordering
            }
            _ => ErrorKind::Range,
        }
    }
}

/// A violation found while validating an entity tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    // === StructuralError ===
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("expected {expected}")]
    WrongType { expected: &'static str },

    #[error("timing pair must be an array of exactly two integers")]
    MalformedPair,

    // === FormatError ===
    #[error("invalid id {id:?}")]
    InvalidId { id: String },

    #[error("well-known id {id:?} is reserved for design models")]
    WellKnownReserved { id: String },

    #[error("wellKnown is {flag} but id {id:?} is {classified}")]
    WellKnownMismatch {
        id: String,
        flag: bool,
        classified: &'static str,
    },

    #[error("invalid timestamp {value:?}")]
    InvalidTimestamp { value: String },

    #[error("invalid color {value:?}: expected 6 hex digits")]
    InvalidColor { value: String },

    #[error("invalid activity code {code:?}")]
    InvalidActivityCode { code: String },

    #[error("invalid reporting period {value:?}: expected \"day\" or \"week\"")]
    InvalidReportingPeriod { value: String },

    // === RangeError ===
    #[error("value {value} must not be negative")]
    Negative { value: i64 },

    #[error("value {value} is outside {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("note time {time} lies outside the session [0, {duration}]")]
    NoteTimeOutOfSession { time: u64, duration: u64 },

    #[error("period {period} is not normalized (expected {expected})")]
    PeriodNotNormalized { period: String, expected: String },

    #[error("{0}")]
    Timing(TimingViolation),

    // === ReferentialError ===
    #[error("has {actual} activity records but the design model has {expected} activities")]
    ActivityCountMismatch { expected: usize, actual: usize },

    #[error("duplicate id {id:?}")]
    DuplicateId { id: String },
}

impl ValidationError {
    /// Returns the error kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::MissingField { .. }
            | ValidationError::WrongType { .. }
            | ValidationError::MalformedPair => ErrorKind::Structural,
            ValidationError::InvalidId { .. }
            | ValidationError::WellKnownReserved { .. }
            | ValidationError::WellKnownMismatch { .. }
            | ValidationError::InvalidTimestamp { .. }
            | ValidationError::InvalidColor { .. }
            | ValidationError::InvalidActivityCode { .. }
            | ValidationError::InvalidReportingPeriod { .. } => ErrorKind::Format,
            ValidationError::Negative { .. }
            | ValidationError::OutOfRange { .. }
            | ValidationError::NoteTimeOutOfSession { .. }
            | ValidationError::PeriodNotNormalized { .. } => ErrorKind::Range,
            ValidationError::Timing(v) => v.kind(),
            ValidationError::ActivityCountMismatch { .. } | ValidationError::DuplicateId { .. } => {
                ErrorKind::Referential
            }
        }
    }
}

impl From<TimingViolation> for ValidationError {
    fn from(v: TimingViolation) -> Self {
        ValidationError::Timing(v)
    }
}

/// Where an error was found.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSource {
    Envelope(EnvelopeError),
    Entity(ValidationError),
}

/// A path-tagged error, e.g. `sessions[2].data[0][1]: off-time ...`.
///
/// The path is relative to the envelope's `data` value for entity errors and
/// names the envelope key for envelope errors. An empty path is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: String,
    pub source: ErrorSource,
}

impl Violation {
    pub fn new(path: impl Into<String>, error: impl Into<ValidationError>) -> Self {
        Self {
            path: path.into(),
            source: ErrorSource::Entity(error.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.source {
            ErrorSource::Envelope(e) => e.kind(),
            ErrorSource::Entity(e) => e.kind(),
        }
    }

    /// Returns the entity error, if this violation came from validation.
    pub fn entity_error(&self) -> Option<&ValidationError> {
        match &self.source {
            ErrorSource::Entity(e) => Some(e),
            ErrorSource::Envelope(_) => None,
        }
    }
}

impl From<EnvelopeError> for Violation {
    fn from(e: EnvelopeError) -> Self {
        Self {
            path: e.key().to_string(),
            source: ErrorSource::Envelope(e),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        match &self.source {
            ErrorSource::Envelope(e) => write!(f, "{path}: {e}"),
            ErrorSource::Entity(e) => write!(f, "{path}: [{}] {e}", e.kind()),
        }
    }
}

/// Every violation found in one document.
///
/// Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentErrors {
    violations: Vec<Violation>,
}

impl DocumentErrors {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns true if any violation is of the given kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.violations.iter().any(|v| v.kind() == kind)
    }

    /// Returns the violations recorded at exactly `path`.
    pub fn at(&self, path: &str) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.path == path)
    }
}

impl From<EnvelopeError> for DocumentErrors {
    fn from(e: EnvelopeError) -> Self {
        Self::new(vec![e.into()])
    }
}

impl fmt::Display for DocumentErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.as_slice() {
            [] => write!(f, "document is invalid"),
            [only] => write!(f, "document is invalid: {only}"),
            all => {
                write!(f, "document is invalid ({} violations):", all.len())?;
                for v in all {
                    write!(f, "\n  {v}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DocumentErrors {}

/// Error during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize entity: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("refusing to encode invalid entity: {0}")]
    Invalid(DocumentErrors),
}
