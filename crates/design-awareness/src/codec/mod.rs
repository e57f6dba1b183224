//! Envelope encoding/decoding for the Design Awareness format.
//!
//! Every document is a JSON object wrapping one entity:
//! `{ "$format": "design-awareness", "version": "1.0.0", "type": ..., "data": ..., "meta"?: ... }`.

pub mod envelope;

pub use envelope::{decode_envelope, encode_envelope, EncodeOptions, Envelope};
