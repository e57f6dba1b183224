//! Entity identifiers.
//!
//! Two ID shapes exist:
//! - *generated*: opaque, recommended 24 alphanumeric characters, never
//!   starting with the reserved prefix;
//! - *well-known*: `well-known:` + reverse-DNS token + optional `@<integer>`
//!   version, reserved for standard design models.

use uuid::Uuid;

use crate::limits::{GENERATED_ID_LEN, WELL_KNOWN_PREFIX};

/// An entity identifier as it appears on the wire.
pub type Id = String;

/// The shape an ID was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Generated,
    WellKnown,
}

impl IdKind {
    pub fn name(&self) -> &'static str {
        match self {
            IdKind::Generated => "generated",
            IdKind::WellKnown => "well-known",
        }
    }
}

/// Result of classifying an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdClass {
    pub kind: IdKind,
    pub valid: bool,
}

/// Classifies an ID by shape.
///
/// Any ID carrying the reserved prefix is well-known; it is valid only if
/// the rest is a reverse-DNS token with an optional `@<integer>` suffix.
/// Generated IDs are valid when non-empty and free of whitespace and control
/// characters.
pub fn classify(id: &str) -> IdClass {
    match id.strip_prefix(WELL_KNOWN_PREFIX) {
        Some(rest) => IdClass {
            kind: IdKind::WellKnown,
            valid: is_well_known_token(rest),
        },
        None => IdClass {
            kind: IdKind::Generated,
            valid: !id.is_empty() && !id.chars().any(|c| c.is_whitespace() || c.is_control()),
        },
    }
}

/// Returns true if `id` carries the reserved well-known prefix.
pub fn is_well_known(id: &str) -> bool {
    id.starts_with(WELL_KNOWN_PREFIX)
}

/// Splits a valid well-known ID into its token and optional version.
pub fn parse_well_known(id: &str) -> Option<(&str, Option<u64>)> {
    let rest = id.strip_prefix(WELL_KNOWN_PREFIX)?;
    if !is_well_known_token(rest) {
        return None;
    }
    match rest.split_once('@') {
        Some((token, version)) => Some((token, Some(version.parse().ok()?))),
        None => Some((rest, None)),
    }
}

/// `segment ("." segment)+ ["@" digits]`, segments lowercase alphanumeric
/// with inner hyphens.
fn is_well_known_token(s: &str) -> bool {
    let (token, version) = match s.split_once('@') {
        Some((t, v)) => (t, Some(v)),
        None => (s, None),
    };
    if let Some(v) = version {
        if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    let mut segments = 0;
    for segment in token.split('.') {
        if !is_dns_segment(segment) {
            return false;
        }
        segments += 1;
    }
    segments >= 2
}

fn is_dns_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    let alnum = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    alnum(first)
        && alnum(last)
        && bytes.iter().all(|b| alnum(b) || *b == b'-')
}

/// Generates a fresh 24-character lowercase alphanumeric ID.
pub fn generate_id() -> Id {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(GENERATED_ID_LEN);
    id
}
