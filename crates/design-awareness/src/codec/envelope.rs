//! The top-level transport object.
//!
//! Envelope checks are fail-fast and happen before anything inside `data` is
//! looked at. Unknown top-level keys are ignored. `meta` is handed back
//! untouched and never validated.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::EnvelopeError;
use crate::limits::{is_supported_version, FORMAT_TAG, FORMAT_VERSION};
use crate::model::EntityType;

/// A decoded envelope whose payload has not been validated yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub entity_type: EntityType,
    pub data: Value,
    /// Opaque producer metadata, if present.
    pub meta: Option<Value>,
}

/// Options for encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Indent the output for human readers.
    pub pretty: bool,
}

impl EncodeOptions {
    /// Creates default (compact) encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates pretty-printing encoding options.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

#[derive(Serialize)]
struct WireEnvelope<'a, T: Serialize> {
    #[serde(rename = "$format")]
    format: &'static str,
    version: &'static str,
    #[serde(rename = "type")]
    entity_type: &'static str,
    data: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a Value>,
}

/// Unwraps an envelope.
///
/// Checks, in order: size, JSON syntax, root object, `$format`, `version`,
/// `type`, `data`. The first failure is returned.
pub fn decode_envelope(input: &[u8], max_size: usize) -> Result<Envelope, EnvelopeError> {
    if input.len() > max_size {
        return Err(EnvelopeError::DocumentTooLarge {
            len: input.len(),
            max: max_size,
        });
    }

    let root: Value =
        serde_json::from_slice(input).map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
    let Value::Object(mut obj) = root else {
        return Err(EnvelopeError::NotAnObject);
    };

    match obj.get("$format") {
        Some(Value::String(tag)) if tag == FORMAT_TAG => {}
        other => {
            return Err(EnvelopeError::InvalidFormatTag {
                found: other.map(|v| match v {
                    Value::String(s) => s.clone(),
                    v => v.to_string(),
                }),
            });
        }
    }

    let version = required_str(&obj, "version")?;
    if !is_supported_version(version) {
        return Err(EnvelopeError::UnsupportedVersion {
            version: version.to_string(),
        });
    }

    let type_name = required_str(&obj, "type")?;
    let entity_type = EntityType::from_name(type_name).ok_or_else(|| EnvelopeError::UnknownType {
        type_name: type_name.to_string(),
    })?;

    let data = obj
        .remove("data")
        .filter(|v| !v.is_null())
        .ok_or(EnvelopeError::MissingKey { key: "data" })?;
    let meta = obj.remove("meta").filter(|v| !v.is_null());

    Ok(Envelope {
        entity_type,
        data,
        meta,
    })
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, EnvelopeError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(EnvelopeError::MissingKey { key }),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(EnvelopeError::WrongKeyType {
            key,
            expected: "a string",
        }),
    }
}

/// Wraps `data` in a canonical envelope.
///
/// `meta` is written only when supplied for this call.
pub fn encode_envelope<T: Serialize>(
    entity_type: EntityType,
    data: &T,
    meta: Option<&Value>,
    options: &EncodeOptions,
) -> Result<Vec<u8>, serde_json::Error> {
    let wire = WireEnvelope {
        format: FORMAT_TAG,
        version: FORMAT_VERSION,
        entity_type: entity_type.name(),
        data,
        meta,
    };
    if options.pretty {
        serde_json::to_vec_pretty(&wire)
    } else {
        serde_json::to_vec(&wire)
    }
}
