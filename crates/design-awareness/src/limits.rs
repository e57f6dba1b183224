//! Format constants and decoding limits.
//!
//! The decoder handles untrusted input, so the size of a document accepted
//! for decoding is bounded before any JSON parsing happens.

/// Literal value of the envelope `$format` key.
pub const FORMAT_TAG: &str = "design-awareness";

/// Format version written by the encoder.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Versions accepted by the decoder. Matched exactly.
pub const SUPPORTED_VERSIONS: &[&str] = &[FORMAT_VERSION];

/// Reserved namespace prefix of well-known IDs.
pub const WELL_KNOWN_PREFIX: &str = "well-known:";

/// Length of IDs produced by [`crate::generate_id`].
pub const GENERATED_ID_LEN: usize = 24;

/// Maximum length of an activity code.
pub const MAX_ACTIVITY_CODE_LEN: usize = 8;

/// Default maximum size of an encoded document (16 MiB).
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Off-time marking a timing pair whose activity is still on.
pub const OPEN_PAIR_END: i64 = -1;

/// Returns true if `version` is an exactly-matching supported version.
pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}
