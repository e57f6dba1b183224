//! The decode / encode pair exposed to hosts.
//!
//! Decoding unwraps the envelope and then validates the payload. Encoding
//! re-validates the entity and writes every field, defaulted or not.

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::{decode_envelope, encode_envelope, EncodeOptions};
use crate::error::{DocumentErrors, EncodeError};
use crate::model::Entity;
use crate::validate::{validate_entity, DecodeOptions};

/// Decodes and validates a document.
///
/// An envelope problem is reported as a single violation. Otherwise every
/// violation in the payload is reported at once. `meta` is accepted and
/// dropped.
pub fn decode_document(input: &[u8], options: &DecodeOptions) -> Result<Entity, DocumentErrors> {
    let envelope = decode_envelope(input, options.max_document_size).map_err(|e| {
        warn!(bytes = input.len(), error = %e, "rejected document envelope");
        DocumentErrors::from(e)
    })?;

    let entity_type = envelope.entity_type;
    debug!(%entity_type, bytes = input.len(), "decoding document");
    if envelope.meta.is_some() {
        debug!(%entity_type, "ignoring envelope meta");
    }

    validate_entity(entity_type, &envelope.data, options).inspect_err(|errors| {
        warn!(%entity_type, violations = errors.len(), "rejected document");
    })
}

/// Encodes an entity as a document.
///
/// The entity is validated first, with every session treated as closed, and
/// an invalid entity is refused. `meta` is written only for this call.
pub fn encode_document(
    entity: &Entity,
    meta: Option<&Value>,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let entity_type = entity.entity_type();
    let data = entity.to_data()?;

    let check = DecodeOptions::new().with_max_document_size(usize::MAX);
    validate_entity(entity_type, &data, &check).map_err(|errors| {
        warn!(%entity_type, violations = errors.len(), "refusing to encode invalid entity");
        EncodeError::Invalid(errors)
    })?;

    let bytes = encode_envelope(entity_type, entity, meta, options)?;
    debug!(%entity_type, bytes = bytes.len(), "encoded document");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc, Weekday};
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::error::{ErrorKind, TimingViolation, ValidationError, Violation};
    use crate::model::{
        AsyncActivityData, AsyncEntry, AsyncProject, DesignModel, DesignModelBuilder,
        ProjectMetadata, RealtimeProject, SessionRecorder, TimingPair,
    };
    use crate::util::datetime::parse_timestamp;
    use crate::util::period::ReportingPeriod;
    use crate::well_known::ENGINEERING_DESIGN;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    fn options() -> DecodeOptions {
        DecodeOptions::new().with_now(ts("2024-01-01T12:00:00Z"))
    }

    fn doc(entity_type: &str, data: Value) -> Vec<u8> {
        json!({
            "$format": "design-awareness",
            "version": "1.0.0",
            "type": entity_type,
            "data": data,
        })
        .to_string()
        .into_bytes()
    }

    fn model_json(id: &str, activities: usize) -> Value {
        let activities: Vec<Value> = (0..activities)
            .map(|i| json!({ "name": format!("Activity {i}"), "code": format!("A{i}"), "color": ["112233", "445566"] }))
            .collect();
        json!({ "id": id, "name": "Model", "activities": activities })
    }

    fn session_json(id: &str, duration: i64, data: Value) -> Value {
        json!({ "id": id, "duration": duration, "start": "2024-01-01T09:00:00.000Z", "data": data })
    }

    fn two_activity_model() -> DesignModel {
        DesignModelBuilder::with_id("m1", "Model")
            .activity("Explore", "EX", "ff0000", "aa0000")
            .activity("Build", "BD", "00ff00", "00aa00")
            .build()
    }

    fn metadata(model: DesignModel) -> ProjectMetadata {
        ProjectMetadata {
            name: "Capstone".to_string(),
            description: String::new(),
            created: ts("2024-01-01T00:00:00Z"),
            modified: ts("2024-01-02T00:00:00Z"),
            active: true,
            design_model: model,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_decode_project_fills_defaults() {
        let input = doc(
            "RealtimeProject",
            json!({ "id": "p1", "name": "Capstone", "designModel": model_json("m1", 2) }),
        );
        let Entity::RealtimeProject(project) = decode_document(&input, &options()).unwrap() else {
            panic!("expected a realtime project");
        };
        assert_eq!(project.metadata.description, "");
        assert!(project.metadata.active);
        assert_eq!(project.metadata.created, ts("2024-01-01T12:00:00Z"));
        assert_eq!(project.metadata.modified, project.metadata.created);
        assert!(project.metadata.notes.is_empty());
        assert!(project.sessions.is_empty());
        assert!(!project.metadata.design_model.well_known);
    }

    #[test]
    fn test_decode_null_is_absent() {
        let input = doc(
            "ProjectNote",
            json!({ "id": "n1", "content": "hello", "created": null }),
        );
        let Entity::ProjectNote(note) = decode_document(&input, &options()).unwrap() else {
            panic!("expected a project note");
        };
        assert_eq!(note.created, ts("2024-01-01T12:00:00Z"));
    }

    #[test]
    fn test_unknown_type_stops_early() {
        let input = doc("Foo", json!({ "garbage": true }));
        let errors = decode_document(&input, &options()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].kind(), ErrorKind::UnknownType);
        assert_eq!(errors.violations()[0].path, "type");
    }

    #[test]
    fn test_violations_accumulate_with_paths() {
        let sessions = json!([
            session_json("s0", 100, json!([[[0, 10]], []])),
            session_json("s1", 100, json!([[], []])),
            session_json("s2", 100, json!([[[50, 20]], [[0, 200]]])),
        ]);
        let input = doc(
            "RealtimeProject",
            json!({
                "id": "p1",
                "name": "Capstone",
                "designModel": model_json("m1", 2),
                "sessions": sessions,
                "active": "yes",
            }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();

        let at = |path: &str| errors.at(path).map(|v| v.kind()).collect::<Vec<_>>();
        assert_eq!(at("sessions[2].data[0][0]"), vec![ErrorKind::Ordering]);
        assert_eq!(at("sessions[2].data[1][0]"), vec![ErrorKind::Range]);
        assert_eq!(at("active"), vec![ErrorKind::Structural]);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_timing_violation_path_for_second_pair() {
        let sessions = json!([
            session_json("s0", 100, json!([[], []])),
            session_json("s1", 100, json!([[], []])),
            session_json("s2", 100, json!([[[0, 10], [5, 20]], []])),
        ]);
        let input = doc(
            "RealtimeProject",
            json!({ "id": "p1", "name": "Capstone", "designModel": model_json("m1", 2), "sessions": sessions }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        let found: Vec<_> = errors
            .at("sessions[2].data[0][1]")
            .filter_map(|v| v.entity_error().cloned())
            .collect();
        assert_eq!(
            found,
            vec![ValidationError::Timing(TimingViolation::OverlapsPrevious { previous_off: 10, on: 5 })]
        );
    }

    #[test]
    fn test_activity_count_mismatch() {
        let input = doc(
            "RealtimeProject",
            json!({
                "id": "p1",
                "name": "Capstone",
                "designModel": model_json("m1", 3),
                "sessions": [session_json("s0", 100, json!([[], []]))],
            }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        let v: Vec<_> = errors.at("sessions[0].data").collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind(), ErrorKind::Referential);
    }

    #[test]
    fn test_lone_session_with_model_context() {
        let input = doc("RealtimeSession", session_json("s0", 100, json!([[[0, 10]]])));

        assert!(decode_document(&input, &options()).is_ok());

        let with_model = options().with_design_model(two_activity_model());
        let errors = decode_document(&input, &with_model).unwrap_err();
        assert!(errors.has_kind(ErrorKind::Referential));
    }

    #[test]
    fn test_open_pair_needs_ongoing_session() {
        let input = doc("RealtimeSession", session_json("s0", 100, json!([[[0, -1]]])));

        let errors = decode_document(&input, &options()).unwrap_err();
        assert_eq!(errors.violations()[0].path, "data[0][0]");
        assert_eq!(errors.violations()[0].kind(), ErrorKind::Range);

        let Entity::RealtimeSession(session) =
            decode_document(&input, &options().with_ongoing_session(true)).unwrap()
        else {
            panic!("expected a realtime session");
        };
        assert!(session.is_ongoing());
    }

    #[test]
    fn test_well_known_flag_mismatch() {
        let mut model = model_json(ENGINEERING_DESIGN, 2);
        model["wellKnown"] = json!(false);
        let errors = decode_document(&doc("DesignModel", model), &options()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].path, "wellKnown");
        assert_eq!(errors.violations()[0].kind(), ErrorKind::Format);

        let mut model = model_json(ENGINEERING_DESIGN, 2);
        model["wellKnown"] = json!(true);
        assert!(decode_document(&doc("DesignModel", model), &options()).is_ok());
    }

    #[test]
    fn test_well_known_id_reserved_for_models() {
        let input = doc(
            "ProjectNote",
            json!({ "id": "well-known:org.example.note@1", "content": "x" }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        assert!(errors.has_kind(ErrorKind::Format));
        assert_eq!(errors.violations()[0].path, "id");
    }

    #[test]
    fn test_duplicate_ids() {
        let input = doc(
            "RealtimeProject",
            json!({
                "id": "p1",
                "name": "Capstone",
                "designModel": model_json("m1", 1),
                "notes": [{ "id": "p1", "content": "dup" }],
            }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        let v: Vec<_> = errors.at("notes[0].id").collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind(), ErrorKind::Referential);
    }

    #[test]
    fn test_async_project_period_checks() {
        let entry = |period: &str| {
            json!({ "id": format!("e-{period}"), "data": [{ "value": 30 }], "period": period })
        };
        let input = doc(
            "AsyncProject",
            json!({
                "id": "a1",
                "name": "Studio",
                "designModel": model_json("m1", 1),
                "reportingPeriod": "week",
                "periodAlignment": 1,
                "entries": [entry("2021-06-21T00:00:00.000Z"), entry("2021-06-23T15:30:00.000Z")],
            }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].path, "entries[1].period");
        assert_eq!(errors.violations()[0].kind(), ErrorKind::Range);
    }

    #[test]
    fn test_async_project_alignment_and_period_name() {
        let input = doc(
            "AsyncProject",
            json!({
                "id": "a1",
                "name": "Studio",
                "designModel": model_json("m1", 1),
                "reportingPeriod": "month",
                "periodAlignment": 9,
            }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        assert_eq!(errors.at("periodAlignment").next().map(|v| v.kind()), Some(ErrorKind::Range));
        assert_eq!(errors.at("reportingPeriod").next().map(|v| v.kind()), Some(ErrorKind::Format));
        assert_eq!(errors.len(), 2);

        let input = doc(
            "AsyncProject",
            json!({ "id": "a1", "name": "Studio", "designModel": model_json("m1", 1), "reportingPeriod": "month" }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        assert_eq!(errors.at("reportingPeriod").next().map(|v| v.kind()), Some(ErrorKind::Format));
    }

    #[test]
    fn test_malformed_pair_keeps_checking_the_rest() {
        let input = doc(
            "RealtimeSession",
            session_json("s0", 1000, json!([[[0, 100], ["x"], [300, 200], [150, 2000]]])),
        );
        let errors = decode_document(&input, &options()).unwrap_err();

        let at = |path: &str| errors.at(path).filter_map(|v| v.entity_error().cloned()).collect::<Vec<_>>();
        assert!(at("data[0][0]").is_empty());
        assert_eq!(at("data[0][1]"), vec![ValidationError::MalformedPair]);
        assert_eq!(
            at("data[0][2]"),
            vec![ValidationError::Timing(TimingViolation::OffNotAfterOn { on: 300, off: 200 })]
        );
        assert_eq!(
            at("data[0][3]"),
            vec![
                ValidationError::Timing(TimingViolation::OffBeyondDuration { off: 2000, duration: 1000 }),
                ValidationError::Timing(TimingViolation::OverlapsPrevious { previous_off: 200, on: 150 }),
            ]
        );
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_malformed_pair_shapes() {
        let input = doc(
            "RealtimeSession",
            session_json("s0", 1000, json!([[[1, 2, 3], 5, [1.5, 4], [10, 20]]])),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        for i in 0..3 {
            let path = format!("data[0][{i}]");
            let v: Vec<_> = errors.at(&path).collect();
            assert_eq!(v.len(), 1, "{path}");
            assert_eq!(v[0].kind(), ErrorKind::Structural);
        }
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_timed_note_within_session() {
        let mut session = session_json("s0", 100, json!([[]]));
        session["notes"] = json!([
            { "id": "n0", "content": "start", "time": 0 },
            { "id": "n1", "content": "end", "time": 100 },
            { "id": "n2", "content": "after", "time": 150 },
            { "id": "n3", "content": "before", "time": -5 },
        ]);
        let errors = decode_document(&doc("RealtimeSession", session), &options()).unwrap_err();
        assert_eq!(
            errors.at("notes[2].time").filter_map(|v| v.entity_error().cloned()).collect::<Vec<_>>(),
            vec![ValidationError::NoteTimeOutOfSession { time: 150, duration: 100 }]
        );
        assert_eq!(
            errors.at("notes[3].time").filter_map(|v| v.entity_error().cloned()).collect::<Vec<_>>(),
            vec![ValidationError::Negative { value: -5 }]
        );
        assert_eq!(errors.len(), 2);
        assert!(!errors.has_kind(ErrorKind::Structural));
    }

    #[test]
    fn test_async_entry_activity_count() {
        let input = doc(
            "AsyncProject",
            json!({
                "id": "a1",
                "name": "Studio",
                "designModel": model_json("m1", 2),
                "reportingPeriod": "day",
                "entries": [
                    { "id": "e0", "data": [{ "value": 1 }, { "value": 2 }], "period": "2021-06-21T00:00:00.000Z" },
                    { "id": "e1", "data": [{ "value": 1 }], "period": "2021-06-22T00:00:00.000Z" },
                ],
            }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        assert_eq!(
            errors.at("entries[1].data").filter_map(|v| v.entity_error().cloned()).collect::<Vec<_>>(),
            vec![ValidationError::ActivityCountMismatch { expected: 2, actual: 1 }]
        );
        assert_eq!(errors.len(), 1);

        let lone = doc(
            "AsyncEntry",
            json!({ "id": "e1", "data": [{ "value": 1 }], "period": "2021-06-22T00:00:00.000Z" }),
        );
        assert!(decode_document(&lone, &options()).is_ok());
        let errors = decode_document(&lone, &options().with_design_model(two_activity_model())).unwrap_err();
        assert!(errors.has_kind(ErrorKind::Referential));
    }

    #[test]
    fn test_large_minutes_accepted() {
        let minutes = u64::from(u32::MAX) + 1;
        let input = doc(
            "AsyncEntry",
            json!({ "id": "e1", "data": [{ "value": minutes }], "period": "2021-06-22T00:00:00.000Z" }),
        );
        let Entity::AsyncEntry(entry) = decode_document(&input, &options()).unwrap() else {
            panic!("expected an async entry");
        };
        assert_eq!(entry.total_minutes(), minutes);

        let input = doc(
            "AsyncEntry",
            json!({ "id": "e1", "data": [{ "value": u64::MAX }], "period": "2021-06-22T00:00:00.000Z" }),
        );
        assert!(decode_document(&input, &options()).is_ok());

        let input = doc(
            "AsyncEntry",
            json!({ "id": "e1", "data": [{ "value": -1 }], "period": "2021-06-22T00:00:00.000Z" }),
        );
        let errors = decode_document(&input, &options()).unwrap_err();
        assert_eq!(errors.at("data[0].value").next().map(|v| v.kind()), Some(ErrorKind::Range));
    }

    #[test]
    fn test_activity_color_and_code() {
        let model = json!({
            "id": "m1",
            "name": "Model",
            "activities": [
                { "name": "Bad color", "code": "BC", "color": ["12345", "zzzzzz"] },
                { "name": "Lowercase", "code": "ab", "color": ["112233", "445566"] },
                { "name": "Empty", "code": "", "color": ["112233", "445566"] },
                { "name": "Long", "code": "TOOLONGCODE", "color": ["112233", "445566"] },
                { "name": "Hash", "code": "H1", "color": ["#112233", "445566"] },
                { "name": "One color", "code": "OC", "color": ["112233"] },
            ],
        });
        let errors = decode_document(&doc("DesignModel", model), &options()).unwrap_err();

        let kinds = |path: &str| errors.at(path).map(|v| v.kind()).collect::<Vec<_>>();
        assert_eq!(kinds("activities[0].color[0]"), vec![ErrorKind::Format]);
        assert_eq!(kinds("activities[0].color[1]"), vec![ErrorKind::Format]);
        assert_eq!(kinds("activities[1].code"), vec![ErrorKind::Format]);
        assert_eq!(kinds("activities[2].code"), vec![ErrorKind::Format]);
        assert_eq!(kinds("activities[3].code"), vec![ErrorKind::Format]);
        assert_eq!(kinds("activities[4].color[0]"), vec![ErrorKind::Format]);
        assert_eq!(kinds("activities[5].color"), vec![ErrorKind::Structural]);
        assert_eq!(errors.len(), 7);
        assert!(matches!(
            errors.at("activities[1].code").next().and_then(Violation::entity_error),
            Some(ValidationError::InvalidActivityCode { .. })
        ));
    }

    #[test]
    fn test_image_url_string_or_array() {
        let mut model = model_json("m1", 1);
        model["description"] = json!({ "description": "About", "imageUrl": "https://example.org/a.png" });
        let Entity::DesignModel(decoded) = decode_document(&doc("DesignModel", model), &options()).unwrap() else {
            panic!("expected a design model");
        };
        let description = decoded.description.clone().unwrap();
        assert_eq!(description.image_url, vec!["https://example.org/a.png".to_string()]);
        assert_eq!(description.citation, "");
        assert_eq!(description.more_info_url, "");

        let bytes = encode_document(&Entity::DesignModel(decoded), None, &EncodeOptions::new()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["data"]["description"]["imageUrl"], json!(["https://example.org/a.png"]));

        let mut model = model_json("m1", 1);
        model["description"] = json!({ "description": "About", "imageUrl": ["a.png", "b.png"] });
        let Entity::DesignModel(decoded) = decode_document(&doc("DesignModel", model), &options()).unwrap() else {
            panic!("expected a design model");
        };
        assert_eq!(decoded.description.unwrap().image_url.len(), 2);

        let mut model = model_json("m1", 1);
        model["description"] = json!({ "description": "About", "imageUrl": ["a.png", 7] });
        let errors = decode_document(&doc("DesignModel", model), &options()).unwrap_err();
        assert_eq!(
            errors.at("description.imageUrl[1]").map(|v| v.kind()).collect::<Vec<_>>(),
            vec![ErrorKind::Structural]
        );
    }

    #[test]
    fn test_recorded_session_roundtrip_from_wall_clock() {
        let start = Utc::now();
        let mut recorder = SessionRecorder::new(2, start);
        recorder.toggle(0, 0).unwrap();
        recorder.note("note", 5, Utc::now());
        let entity = Entity::from(recorder.finish(1_000));

        let bytes = encode_document(&entity, None, &EncodeOptions::new()).unwrap();
        assert_eq!(decode_document(&bytes, &options()).unwrap(), entity);
    }

    #[test]
    fn test_meta_is_not_preserved() {
        let mut envelope: Value = serde_json::from_slice(&doc(
            "ProjectNote",
            json!({ "id": "n1", "content": "x", "created": "2024-01-01T00:00:00.000Z" }),
        ))
        .unwrap();
        envelope["meta"] = json!({ "exporter": "someone" });
        let entity = decode_document(envelope.to_string().as_bytes(), &options()).unwrap();

        let bytes = encode_document(&entity, None, &EncodeOptions::new()).unwrap();
        let reencoded: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(reencoded.get("meta").is_none());
    }

    #[test]
    fn test_encode_emits_all_fields() {
        let project = RealtimeProject {
            id: "p1".to_string(),
            metadata: metadata(two_activity_model()),
            sessions: Vec::new(),
        };
        let bytes = encode_document(&project.into(), None, &EncodeOptions::new()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        let data = &value["data"];
        assert_eq!(data["description"], "");
        assert_eq!(data["active"], true);
        assert_eq!(data["notes"], json!([]));
        assert_eq!(data["sessions"], json!([]));
        assert_eq!(data["created"], "2024-01-01T00:00:00.000Z");
        assert_eq!(data["designModel"]["wellKnown"], false);
        assert_eq!(data["designModel"]["activities"][0]["color"], json!(["ff0000", "aa0000"]));
    }

    #[test]
    fn test_encode_refuses_open_session() {
        let model = two_activity_model();
        let mut recorder = SessionRecorder::new(model.activity_count(), ts("2024-01-01T09:00:00Z"));
        recorder.toggle(0, 0).unwrap();
        let session = recorder.snapshot(1_000);

        let err = encode_document(&session.into(), None, &EncodeOptions::new()).unwrap_err();
        let EncodeError::Invalid(errors) = err else {
            panic!("expected a validation failure");
        };
        assert!(errors.has_kind(ErrorKind::Range));
    }

    #[test]
    fn test_async_roundtrip_and_entry_lookup() {
        let project = AsyncProject {
            id: "a1".to_string(),
            metadata: metadata(DesignModelBuilder::with_id("m1", "M").activity("A", "A", "000000", "ffffff").build()),
            reporting_period: ReportingPeriod::Weekly { alignment: Weekday::Mon },
            entries: vec![AsyncEntry {
                id: "e1".to_string(),
                data: vec![AsyncActivityData { value: 90, note: String::new() }],
                period: ts("2021-06-21T00:00:00Z"),
                note: "first week".to_string(),
                created: ts("2021-06-21T08:00:00Z"),
                modified: ts("2021-06-21T08:00:00Z"),
            }],
        };
        let entity = Entity::from(project.clone());
        let bytes = encode_document(&entity, None, &EncodeOptions::pretty()).unwrap();
        assert_eq!(decode_document(&bytes, &options()).unwrap(), entity);

        assert_eq!(project.entry_for(ts("2021-06-23T15:30:00Z")).map(|e| e.id.as_str()), Some("e1"));
        assert!(project.entry_for(ts("2021-06-28T00:00:00Z")).is_none());
        assert_eq!(project.minutes_for(0), 90);
    }

    #[test]
    fn test_document_size_limit() {
        let input = doc("ProjectNote", json!({ "id": "n1", "content": "x" }));
        let errors = decode_document(&input, &options().with_max_document_size(8)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.violations()[0].kind(), ErrorKind::Format);
    }

    fn arb_record(duration: i64) -> impl Strategy<Value = Vec<TimingPair>> {
        prop::collection::vec((0i64..50, 1i64..50), 0..6).prop_map(move |steps| {
            let mut pairs = Vec::new();
            let mut t = 0i64;
            for (gap, len) in steps {
                let on = t + gap + 1;
                let off = on + len;
                if off > duration {
                    break;
                }
                pairs.push(TimingPair::new(on, off));
                t = off;
            }
            pairs
        })
    }

    proptest! {
        #[test]
        fn test_realtime_roundtrip(
            records in prop::collection::vec(arb_record(1_000), 2..=2),
            note_time in 0u64..=1_000,
        ) {
            let model = two_activity_model();
            let mut recorder = SessionRecorder::new(model.activity_count(), ts("2024-01-01T09:00:00Z"));
            recorder.note("checkpoint", note_time, ts("2024-01-01T09:05:00Z"));
            let mut session = recorder.finish(1_000);
            session.data = records;

            let project = RealtimeProject {
                id: "p1".to_string(),
                metadata: metadata(model),
                sessions: vec![session],
            };
            let entity = Entity::from(project);
            let bytes = encode_document(&entity, None, &EncodeOptions::new()).unwrap();
            prop_assert_eq!(decode_document(&bytes, &options()).unwrap(), entity);
        }
    }
}
