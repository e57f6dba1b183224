//! Design models and their activities.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;
use crate::model::id::{classify, Id, IdKind};

/// Light-theme and dark-theme accent colors, each 6 hex digits.
///
/// Serialized as a two-element array `[light, dark]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityColor {
    pub light: String,
    pub dark: String,
}

impl ActivityColor {
    pub fn new(light: impl Into<String>, dark: impl Into<String>) -> Self {
        Self {
            light: light.into(),
            dark: dark.into(),
        }
    }
}

impl Serialize for ActivityColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(2)?;
        t.serialize_element(&self.light)?;
        t.serialize_element(&self.dark)?;
        t.end()
    }
}

/// Returns true if `s` is exactly six hex digits.
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A tracked activity. Activities have no ID; tracking data refers to them
/// by their index in the owning design model's activity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub name: String,
    /// Short uppercase abbreviation.
    pub code: String,
    pub color: ActivityColor,
    pub description: String,
}

/// Long-form documentation for a design model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignModelDescription {
    pub description: String,
    pub image_url: Vec<String>,
    pub citation: String,
    pub more_info_url: String,
}

/// A design process model: an ordered list of activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignModel {
    pub id: Id,
    pub name: String,
    pub activities: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<DesignModelDescription>,
    pub well_known: bool,
}

impl DesignModel {
    /// Number of activities, i.e. the required length of every tracking-data
    /// array recorded against this model.
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Looks up an activity by its code.
    pub fn activity_index(&self, code: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.code == code)
    }
}

/// Checks that the `wellKnown` flag agrees with the shape of `id`.
pub fn check_well_known_flag(id: &str, well_known: bool) -> Result<(), ValidationError> {
    let kind = classify(id).kind;
    if (kind == IdKind::WellKnown) == well_known {
        Ok(())
    } else {
        Err(ValidationError::WellKnownMismatch {
            id: id.to_string(),
            flag: well_known,
            classified: kind.name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_flag_mismatch() {
        let id = "well-known:edu.washington.hcde.engineering-design@1";
        assert!(check_well_known_flag(id, true).is_ok());
        let err = check_well_known_flag(id, false).unwrap_err();
        assert!(matches!(err, ValidationError::WellKnownMismatch { flag: false, .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::Format);
    }

    #[test]
    fn test_generated_id_flagged_well_known() {
        assert!(check_well_known_flag("abc123", false).is_ok());
        assert!(check_well_known_flag("abc123", true).is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("1a2B3c"));
        assert!(!is_hex_color("#1a2b3c"));
        assert!(!is_hex_color("1a2b3"));
        assert!(!is_hex_color("1a2b3g"));
    }

    #[test]
    fn test_color_serializes_as_pair() {
        let color = ActivityColor::new("ff0000", "aa0000");
        assert_eq!(
            serde_json::to_value(&color).unwrap(),
            serde_json::json!(["ff0000", "aa0000"])
        );
    }
}
