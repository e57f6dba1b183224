//! Per-entity validators.

use chrono::Weekday;
use serde_json::Value;
use tracing::debug;

use crate::error::ValidationError;
use crate::limits::MAX_ACTIVITY_CODE_LEN;
use crate::model::{
    check_well_known_flag, is_hex_color, Activity, ActivityColor, AsyncActivityData, AsyncEntry,
    AsyncProject, DesignModel, DesignModelDescription, Entity, EntityType, GenericNote,
    ProjectMetadata, ProjectNote, RealtimeProject, RealtimeSession, TimedNote, TimingPair,
};
use crate::util::period::{weekday_from_index, ReportingPeriod};
use crate::validate::fields::{get, Object};
use crate::validate::timing::validate_slots;
use crate::validate::{field_path, index_path, Validator};
use crate::well_known;

/// Default week alignment: Sunday.
const DEFAULT_PERIOD_ALIGNMENT: Weekday = Weekday::Sun;

/// Default for the project `active` flag.
const DEFAULT_ACTIVE: bool = true;

/// Default for the design model `wellKnown` flag.
const DEFAULT_WELL_KNOWN: bool = false;

impl Validator<'_> {
    pub(crate) fn entity(&mut self, entity_type: EntityType, data: &Value) -> Option<Entity> {
        let path = "";
        match entity_type {
            EntityType::DesignModel => self.design_model(data, path).map(Entity::DesignModel),
            EntityType::RealtimeProject => {
                self.realtime_project(data, path).map(Entity::RealtimeProject)
            }
            EntityType::RealtimeSession => {
                let count = self.context_activity_count(entity_type);
                let ongoing = self.options.ongoing_session;
                self.realtime_session(data, path, count, ongoing)
                    .map(Entity::RealtimeSession)
            }
            EntityType::AsyncProject => self.async_project(data, path).map(Entity::AsyncProject),
            EntityType::AsyncEntry => {
                let count = self.context_activity_count(entity_type);
                let reporting = self.options.reporting_period;
                if reporting.is_none() {
                    debug!("no reporting period in context; skipping period normalization check");
                }
                self.async_entry(data, path, count, reporting)
                    .map(Entity::AsyncEntry)
            }
            EntityType::ProjectNote => self.project_note(data, path).map(Entity::ProjectNote),
            EntityType::TimedNote => self.timed_note(data, path, None).map(Entity::TimedNote),
        }
    }

    fn context_activity_count(&self, entity_type: EntityType) -> Option<usize> {
        let count = self
            .options
            .design_model
            .as_ref()
            .map(DesignModel::activity_count);
        if count.is_none() {
            debug!(%entity_type, "no design model in context; skipping activity count check");
        }
        count
    }

    // =========================================================================
    // Design models
    // =========================================================================

    pub(crate) fn design_model(&mut self, value: &Value, path: &str) -> Option<DesignModel> {
        let obj = self.object(value, path)?;

        let id = self.entity_id(obj, path, true);
        let name = self.required_string(obj, path, "name");
        let activities = self.required_array(obj, path, "activities").map(|items| {
            let activities_path = field_path(path, "activities");
            items
                .iter()
                .enumerate()
                .map(|(i, item)| self.activity(item, &index_path(&activities_path, i)))
                .collect::<Vec<_>>()
        });

        let description = match get(obj, "description") {
            Some(v) => self
                .design_model_description(v, &field_path(path, "description"))
                .map(Some),
            None => Some(None),
        };
        let well_known_flag = self.optional_bool(obj, path, "wellKnown", DEFAULT_WELL_KNOWN);

        if let (Some(id), Some(flag)) = (&id, well_known_flag) {
            match check_well_known_flag(id, flag) {
                Ok(()) if flag && well_known::lookup(id).is_none() => {
                    debug!(%id, "well-known design model is not in the registry");
                }
                Ok(()) => {}
                Err(e) => self.report(field_path(path, "wellKnown"), e),
            }
        }

        Some(DesignModel {
            id: id?,
            name: name?,
            activities: activities?.into_iter().collect::<Option<Vec<_>>>()?,
            description: description?,
            well_known: well_known_flag?,
        })
    }

    fn activity(&mut self, value: &Value, path: &str) -> Option<Activity> {
        let obj = self.object(value, path)?;

        let name = self.required_string(obj, path, "name");
        let code = self.required_string(obj, path, "code");
        let color = self
            .required(obj, path, "color")
            .and_then(|v| self.activity_color(v, &field_path(path, "color")));

        let description = self.optional_string(obj, path, "description");

        if let Some(code) = &code {
            let bad = code.is_empty()
                || code.chars().count() > MAX_ACTIVITY_CODE_LEN
                || code.chars().any(char::is_lowercase);
            if bad {
                self.report(
                    field_path(path, "code"),
                    ValidationError::InvalidActivityCode { code: code.clone() },
                );
            }
        }

        Some(Activity {
            name: name?,
            code: code?,
            color: color?,
            description: description?,
        })
    }

    fn activity_color(&mut self, value: &Value, path: &str) -> Option<ActivityColor> {
        let pair = match value.as_array().map(Vec::as_slice) {
            Some([light, dark]) => (light.as_str(), dark.as_str()),
            _ => {
                self.report(path, ValidationError::WrongType {
                    expected: "array of two color strings",
                });
                return None;
            }
        };
        let (Some(light), Some(dark)) = pair else {
            self.report(path, ValidationError::WrongType {
                expected: "array of two color strings",
            });
            return None;
        };

        let mut ok = true;
        for (i, c) in [light, dark].into_iter().enumerate() {
            if !is_hex_color(c) {
                self.report(
                    index_path(path, i),
                    ValidationError::InvalidColor { value: c.to_string() },
                );
                ok = false;
            }
        }
        ok.then(|| ActivityColor::new(light, dark))
    }

    fn design_model_description(
        &mut self,
        value: &Value,
        path: &str,
    ) -> Option<DesignModelDescription> {
        let obj = self.object(value, path)?;

        let description = self.required_string(obj, path, "description");

        let image_path = field_path(path, "imageUrl");
        let image_url = match get(obj, "imageUrl") {
            None => Some(Vec::new()),
            Some(Value::String(s)) => Some(vec![s.clone()]),
            Some(v) => self.array(v, &image_path).and_then(|items| {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.string(item, &index_path(&image_path, i)))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
            }),
        };
        let citation = self.optional_string(obj, path, "citation");
        let more_info_url = self.optional_string(obj, path, "moreInfoUrl");

        Some(DesignModelDescription {
            description: description?,
            image_url: image_url?,
            citation: citation?,
            more_info_url: more_info_url?,
        })
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Reads the metadata shared by both project kinds.
    ///
    /// Also returns the activity count of the embedded design model, which
    /// is known as soon as its `activities` array is, even if other parts of
    /// the model are invalid.
    fn project_metadata(&mut self, obj: &Object, path: &str) -> (Option<ProjectMetadata>, Option<usize>) {
        let name = self.required_string(obj, path, "name");
        let model_value = self.required(obj, path, "designModel");
        let activity_count = model_value
            .and_then(|m| m.get("activities"))
            .and_then(Value::as_array)
            .map(Vec::len);
        let design_model =
            model_value.and_then(|m| self.design_model(m, &field_path(path, "designModel")));

        let description = self.optional_string(obj, path, "description");
        let created = self.optional_timestamp(obj, path, "created");
        let modified = self.optional_timestamp(obj, path, "modified");
        let active = self.optional_bool(obj, path, "active", DEFAULT_ACTIVE);
        let notes = self.optional_array(obj, path, "notes").map(|items| {
            let notes_path = field_path(path, "notes");
            items
                .iter()
                .enumerate()
                .map(|(i, item)| self.project_note(item, &index_path(&notes_path, i)))
                .collect::<Vec<_>>()
        });

        let metadata = (|| {
            Some(ProjectMetadata {
                name: name?,
                description: description?,
                created: created?,
                modified: modified?,
                active: active?,
                design_model: design_model?,
                notes: notes?.into_iter().collect::<Option<Vec<_>>>()?,
            })
        })();
        (metadata, activity_count)
    }

    fn realtime_project(&mut self, value: &Value, path: &str) -> Option<RealtimeProject> {
        let obj = self.object(value, path)?;

        let id = self.entity_id(obj, path, false);
        let (metadata, activity_count) = self.project_metadata(obj, path);
        let sessions = self.optional_array(obj, path, "sessions").map(|items| {
            let sessions_path = field_path(path, "sessions");
            let last = items.len().saturating_sub(1);
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let ongoing = self.options.ongoing_session && i == last;
                    self.realtime_session(item, &index_path(&sessions_path, i), activity_count, ongoing)
                })
                .collect::<Vec<_>>()
        });

        Some(RealtimeProject {
            id: id?,
            metadata: metadata?,
            sessions: sessions?.into_iter().collect::<Option<Vec<_>>>()?,
        })
    }

    fn async_project(&mut self, value: &Value, path: &str) -> Option<AsyncProject> {
        let obj = self.object(value, path)?;

        let id = self.entity_id(obj, path, false);
        let (metadata, activity_count) = self.project_metadata(obj, path);
        let period_name = self
            .required_string(obj, path, "reportingPeriod")
            .filter(|name| {
                let known = matches!(name.as_str(), "day" | "week");
                if !known {
                    self.report(
                        field_path(path, "reportingPeriod"),
                        ValidationError::InvalidReportingPeriod { value: name.clone() },
                    );
                }
                known
            });

        let alignment = match get(obj, "periodAlignment") {
            None => Some(DEFAULT_PERIOD_ALIGNMENT),
            Some(v) => {
                let alignment_path = field_path(path, "periodAlignment");
                self.integer(v, &alignment_path).and_then(|n| {
                    let weekday = weekday_from_index(n);
                    if weekday.is_none() {
                        self.report(
                            alignment_path,
                            ValidationError::OutOfRange { value: n, min: 0, max: 6 },
                        );
                    }
                    weekday
                })
            }
        };
        let reporting = match (period_name, alignment) {
            (Some(name), Some(alignment)) => ReportingPeriod::from_wire(&name, alignment),
            _ => None,
        };

        let entries = self.optional_array(obj, path, "entries").map(|items| {
            let entries_path = field_path(path, "entries");
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    self.async_entry(item, &index_path(&entries_path, i), activity_count, reporting)
                })
                .collect::<Vec<_>>()
        });

        Some(AsyncProject {
            id: id?,
            metadata: metadata?,
            reporting_period: reporting?,
            entries: entries?.into_iter().collect::<Option<Vec<_>>>()?,
        })
    }

    // =========================================================================
    // Realtime sessions
    // =========================================================================

    fn realtime_session(
        &mut self,
        value: &Value,
        path: &str,
        activity_count: Option<usize>,
        ongoing: bool,
    ) -> Option<RealtimeSession> {
        let obj = self.object(value, path)?;

        let id = self.entity_id(obj, path, false);
        let duration = self.required_non_negative(obj, path, "duration");
        let start = self.required_timestamp(obj, path, "start");
        let data_path = field_path(path, "data");
        let raw_data = self.required_array(obj, path, "data");
        let records = raw_data.map(|records| {
            records
                .iter()
                .enumerate()
                .map(|(i, record)| self.activity_record(record, &index_path(&data_path, i)))
                .collect::<Vec<_>>()
        });

        let notes = self.optional_array(obj, path, "notes").map(|items| {
            let notes_path = field_path(path, "notes");
            items
                .iter()
                .enumerate()
                .map(|(i, item)| self.timed_note(item, &index_path(&notes_path, i), duration))
                .collect::<Vec<_>>()
        });

        if let (Some(expected), Some(records)) = (activity_count, raw_data) {
            if records.len() != expected {
                self.report(
                    data_path.clone(),
                    ValidationError::ActivityCountMismatch {
                        expected,
                        actual: records.len(),
                    },
                );
            }
        }
        if let (Some(duration), Some(records)) = (duration, &records) {
            for (r, record) in records.iter().enumerate() {
                let Some(slots) = record else { continue };
                let record_path = index_path(&data_path, r);
                for (p, violation) in validate_slots(slots, duration, ongoing) {
                    self.report(index_path(&record_path, p), violation);
                }
            }
        }

        Some(RealtimeSession {
            id: id?,
            duration: duration?,
            start: start?,
            data: records?
                .into_iter()
                .map(|record| record?.into_iter().collect::<Option<Vec<_>>>())
                .collect::<Option<Vec<_>>>()?,
            notes: notes?.into_iter().collect::<Option<Vec<_>>>()?,
        })
    }

    /// Reads one record of `[on, off]` pairs, keeping a `None` slot for each
    /// malformed pair. Shape only; ordering and range checks need the
    /// session duration.
    fn activity_record(&mut self, value: &Value, path: &str) -> Option<Vec<Option<TimingPair>>> {
        let items = self.array(value, path)?;
        let slots = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let pair = match item.as_array().map(Vec::as_slice) {
                    Some([on, off]) => on.as_i64().zip(off.as_i64()),
                    _ => None,
                };
                if pair.is_none() {
                    self.report(index_path(path, i), ValidationError::MalformedPair);
                }
                pair.map(|(on, off)| TimingPair::new(on, off))
            })
            .collect();
        Some(slots)
    }

    // =========================================================================
    // Async entries
    // =========================================================================

    fn async_entry(
        &mut self,
        value: &Value,
        path: &str,
        activity_count: Option<usize>,
        reporting: Option<ReportingPeriod>,
    ) -> Option<AsyncEntry> {
        let obj = self.object(value, path)?;

        let id = self.entity_id(obj, path, false);
        let data_path = field_path(path, "data");
        let raw_data = self.required_array(obj, path, "data");
        let data = raw_data.map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| self.async_activity_data(item, &index_path(&data_path, i)))
                .collect::<Vec<_>>()
        });
        let period = self.required_timestamp(obj, path, "period");

        let note = self.optional_string(obj, path, "note");
        let created = self.optional_timestamp(obj, path, "created");
        let modified = self.optional_timestamp(obj, path, "modified");

        if let (Some(expected), Some(items)) = (activity_count, raw_data) {
            if items.len() != expected {
                self.report(
                    data_path,
                    ValidationError::ActivityCountMismatch {
                        expected,
                        actual: items.len(),
                    },
                );
            }
        }
        if let (Some(reporting), Some(period)) = (reporting, period) {
            let expected = reporting.normalize(period);
            if expected != period {
                self.report(
                    field_path(path, "period"),
                    ValidationError::PeriodNotNormalized {
                        period: crate::util::format_timestamp(&period),
                        expected: crate::util::format_timestamp(&expected),
                    },
                );
            }
        }

        Some(AsyncEntry {
            id: id?,
            data: data?.into_iter().collect::<Option<Vec<_>>>()?,
            period: period?,
            note: note?,
            created: created?,
            modified: modified?,
        })
    }

    fn async_activity_data(&mut self, value: &Value, path: &str) -> Option<AsyncActivityData> {
        let obj = self.object(value, path)?;

        let value = self.required_non_negative(obj, path, "value");
        let note = self.optional_string(obj, path, "note");

        Some(AsyncActivityData {
            value: value?,
            note: note?,
        })
    }

    // =========================================================================
    // Notes
    // =========================================================================

    fn generic_note(&mut self, obj: &Object, path: &str) -> Option<GenericNote> {
        let id = self.entity_id(obj, path, false);
        let content = self.required_string(obj, path, "content");
        let created = self.optional_timestamp(obj, path, "created");

        Some(GenericNote {
            id: id?,
            content: content?,
            created: created?,
        })
    }

    pub(crate) fn project_note(&mut self, value: &Value, path: &str) -> Option<ProjectNote> {
        let obj = self.object(value, path)?;
        self.generic_note(obj, path)
    }

    /// Reads a timed note. The time must not be negative, and with a known
    /// session duration it must lie within `[0, duration]`.
    fn timed_note(&mut self, value: &Value, path: &str, duration: Option<u64>) -> Option<TimedNote> {
        let obj = self.object(value, path)?;

        let note = self.generic_note(obj, path);
        let time = self.required_non_negative(obj, path, "time");

        let time = time.and_then(|t| match duration {
            Some(d) if t > d => {
                self.report(
                    field_path(path, "time"),
                    ValidationError::NoteTimeOutOfSession { time: t, duration: d },
                );
                None
            }
            _ => Some(t),
        });

        Some(TimedNote {
            note: note?,
            time: time?,
        })
    }
}
