//! Field readers over untrusted JSON objects.
//!
//! Each reader records a violation and returns `None` when the field is
//! unusable. Optional readers return the documented default when the key is
//! absent or `null`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::model::id::{classify, Id, IdKind};
use crate::util::datetime::parse_timestamp;
use crate::validate::{field_path, Validator};

pub(crate) type Object = Map<String, Value>;

/// Looks up `key`, treating `null` as absent.
pub(crate) fn get<'v>(obj: &'v Object, key: &str) -> Option<&'v Value> {
    obj.get(key).filter(|v| !v.is_null())
}

impl Validator<'_> {
    pub(crate) fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Object> {
        let obj = value.as_object();
        if obj.is_none() {
            self.report(path, ValidationError::WrongType { expected: "object" });
        }
        obj
    }

    pub(crate) fn required<'v>(
        &mut self,
        obj: &'v Object,
        path: &str,
        key: &'static str,
    ) -> Option<&'v Value> {
        let value = get(obj, key);
        if value.is_none() {
            self.report(field_path(path, key), ValidationError::MissingField { field: key });
        }
        value
    }

    pub(crate) fn string(&mut self, value: &Value, path: &str) -> Option<String> {
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.report(path, ValidationError::WrongType { expected: "string" });
                None
            }
        }
    }

    pub(crate) fn required_string(
        &mut self,
        obj: &Object,
        path: &str,
        key: &'static str,
    ) -> Option<String> {
        let value = self.required(obj, path, key)?;
        self.string(value, &field_path(path, key))
    }

    /// Optional text field; absent means `""`.
    pub(crate) fn optional_string(&mut self, obj: &Object, path: &str, key: &str) -> Option<String> {
        match get(obj, key) {
            Some(value) => self.string(value, &field_path(path, key)),
            None => Some(String::new()),
        }
    }

    pub(crate) fn optional_bool(
        &mut self,
        obj: &Object,
        path: &str,
        key: &str,
        default: bool,
    ) -> Option<bool> {
        match get(obj, key) {
            Some(value) => {
                let b = value.as_bool();
                if b.is_none() {
                    self.report(field_path(path, key), ValidationError::WrongType { expected: "boolean" });
                }
                b
            }
            None => Some(default),
        }
    }

    /// Reads an integer. Floats, even integral ones, are rejected.
    pub(crate) fn integer(&mut self, value: &Value, path: &str) -> Option<i64> {
        let n = value.as_i64();
        if n.is_none() {
            self.report(path, ValidationError::WrongType { expected: "integer" });
        }
        n
    }

    /// Reads an integer that must be `>= 0`, up to `u64::MAX`.
    pub(crate) fn non_negative(&mut self, value: &Value, path: &str) -> Option<u64> {
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        match value.as_i64() {
            Some(n) => self.report(path, ValidationError::Negative { value: n }),
            None => self.report(path, ValidationError::WrongType { expected: "integer" }),
        }
        None
    }

    /// Required integer that must be `>= 0`.
    pub(crate) fn required_non_negative(
        &mut self,
        obj: &Object,
        path: &str,
        key: &'static str,
    ) -> Option<u64> {
        let value = self.required(obj, path, key)?;
        self.non_negative(value, &field_path(path, key))
    }

    pub(crate) fn timestamp(&mut self, value: &Value, path: &str) -> Option<DateTime<Utc>> {
        let s = self.string(value, path)?;
        match parse_timestamp(&s) {
            Ok(dt) => Some(dt),
            Err(_) => {
                self.report(path, ValidationError::InvalidTimestamp { value: s });
                None
            }
        }
    }

    pub(crate) fn required_timestamp(
        &mut self,
        obj: &Object,
        path: &str,
        key: &'static str,
    ) -> Option<DateTime<Utc>> {
        let value = self.required(obj, path, key)?;
        self.timestamp(value, &field_path(path, key))
    }

    /// Optional timestamp; absent means the decode instant.
    pub(crate) fn optional_timestamp(
        &mut self,
        obj: &Object,
        path: &str,
        key: &str,
    ) -> Option<DateTime<Utc>> {
        match get(obj, key) {
            Some(value) => self.timestamp(value, &field_path(path, key)),
            None => Some(self.options.now),
        }
    }

    pub(crate) fn array<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v [Value]> {
        match value.as_array() {
            Some(items) => Some(items.as_slice()),
            None => {
                self.report(path, ValidationError::WrongType { expected: "array" });
                None
            }
        }
    }

    pub(crate) fn required_array<'v>(
        &mut self,
        obj: &'v Object,
        path: &str,
        key: &'static str,
    ) -> Option<&'v [Value]> {
        let value = self.required(obj, path, key)?;
        self.array(value, &field_path(path, key))
    }

    /// Optional list; absent means empty.
    pub(crate) fn optional_array<'v>(
        &mut self,
        obj: &'v Object,
        path: &str,
        key: &str,
    ) -> Option<&'v [Value]> {
        match get(obj, key) {
            Some(value) => self.array(value, &field_path(path, key)),
            None => Some(&[]),
        }
    }

    /// Reads and checks an entity `id`.
    ///
    /// Well-known IDs are reserved for design models. IDs must be unique
    /// within a document.
    pub(crate) fn entity_id(
        &mut self,
        obj: &Object,
        path: &str,
        allow_well_known: bool,
    ) -> Option<Id> {
        let id = self.required_string(obj, path, "id")?;
        let id_path = field_path(path, "id");
        let class = classify(&id);
        if !class.valid {
            self.report(id_path, ValidationError::InvalidId { id });
            return None;
        }
        if class.kind == IdKind::WellKnown && !allow_well_known {
            self.report(id_path, ValidationError::WellKnownReserved { id });
            return None;
        }
        if !self.seen_ids.insert(id.clone()) {
            self.report(id_path, ValidationError::DuplicateId { id });
            return None;
        }
        Some(id)
    }
}
