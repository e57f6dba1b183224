//! Benchmark for Design Awareness encoding, decoding and validation.
//!
//! Synthesizes a large realtime project and a large async project with the
//! builder API and times the full document pipeline on both.
//!
//! Usage: `bench-projects [SESSIONS] [ENTRIES] [OUT_DIR]`

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Days, TimeZone, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use design_awareness::{
    decode_document, encode_document, validate_entity, AsyncActivityData, AsyncEntry,
    AsyncProject, DecodeOptions, DesignModel, DesignModelBuilder, EncodeOptions, Entity,
    ProjectMetadata, RealtimeProject, RealtimeSession, ReportingPeriod, SessionRecorder,
    generate_id,
};

const DECODE_ITERS: u32 = 10;

/// Length of every synthesized session: two hours.
const SESSION_MS: u64 = 2 * 60 * 60 * 1000;

/// Seed for the synthetic data, so runs are comparable.
const SEED: u64 = 0x5eed;

fn design_model() -> DesignModel {
    DesignModelBuilder::new("Engineering Design (bench)")
        .activity("Understand the problem", "UP", "1f77b4", "aec7e8")
        .activity("Gather information", "GI", "ff7f0e", "ffbb78")
        .activity("Generate ideas", "GE", "2ca02c", "98df8a")
        .activity("Model ideas", "MO", "d62728", "ff9896")
        .activity("Feasibility analysis", "FA", "9467bd", "c5b0d5")
        .activity("Evaluation", "EV", "8c564b", "c49c94")
        .activity("Decision", "DE", "e377c2", "f7b6d2")
        .activity("Communication", "CO", "7f7f7f", "c7c7c7")
        .build()
}

fn metadata(name: &str, model: DesignModel, start: DateTime<Utc>) -> ProjectMetadata {
    ProjectMetadata {
        name: name.to_string(),
        description: format!("Synthetic {name} project"),
        created: start,
        modified: start,
        active: true,
        design_model: model,
        notes: Vec::new(),
    }
}

/// Records one session by toggling random activities at increasing times.
fn synth_session(rng: &mut StdRng, activities: usize, start: DateTime<Utc>) -> RealtimeSession {
    let mut recorder = SessionRecorder::new(activities, start);
    let mut at = 0u64;
    loop {
        at += rng.gen_range(1..=5 * 60 * 1000);
        if at >= SESSION_MS {
            break;
        }
        let index = rng.gen_range(0..activities);
        // A toggle at the very instant an activity came on is refused; skip it.
        let _ = recorder.toggle(index, at);
        if rng.gen_bool(0.05) {
            recorder.note("checkpoint", at, start);
        }
    }
    recorder.finish(SESSION_MS)
}

fn synth_realtime(sessions: usize, rng: &mut StdRng, start: DateTime<Utc>) -> RealtimeProject {
    let model = design_model();
    let activities = model.activity_count();
    let sessions = (0..sessions)
        .map(|i| {
            let day = start
                .checked_add_days(Days::new(i as u64))
                .unwrap_or(start);
            synth_session(rng, activities, day)
        })
        .collect();
    RealtimeProject {
        id: generate_id(),
        metadata: metadata("realtime", model, start),
        sessions,
    }
}

fn synth_async(entries: usize, rng: &mut StdRng, start: DateTime<Utc>) -> AsyncProject {
    let model = design_model();
    let activities = model.activity_count();
    let reporting = ReportingPeriod::Weekly {
        alignment: Weekday::Mon,
    };
    let first = reporting.normalize(start);
    let entries = (0..entries)
        .map(|i| {
            let period = first
                .checked_add_days(Days::new(7 * i as u64))
                .unwrap_or(first);
            AsyncEntry {
                id: generate_id(),
                data: (0..activities)
                    .map(|_| AsyncActivityData {
                        value: rng.gen_range(0..600),
                        note: String::new(),
                    })
                    .collect(),
                period,
                note: String::new(),
                created: period,
                modified: period,
            }
        })
        .collect();
    AsyncProject {
        id: generate_id(),
        metadata: metadata("async", model, start),
        reporting_period: reporting,
        entries,
    }
}

fn throughput(bytes: usize, time: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / time.as_secs_f64()
}

/// Times encode, validate and decode of one entity and returns the encoding.
fn bench(label: &str, entity: &Entity) -> Vec<u8> {
    println!("\n=== {label} ===");

    let meta = json!({ "producer": "bench-projects", "label": label });
    let encode_start = Instant::now();
    let encoded =
        encode_document(entity, Some(&meta), &EncodeOptions::new()).expect("Failed to encode");
    let encode_time = encode_start.elapsed();
    println!("Encode: {} bytes in {:?}", encoded.len(), encode_time);
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), encode_time));

    let options = DecodeOptions::new().with_max_document_size(usize::MAX);

    let data = entity.to_data().expect("Failed to serialize");
    let validate_start = Instant::now();
    for _ in 0..DECODE_ITERS {
        validate_entity(entity.entity_type(), &data, &options).expect("Failed to validate");
    }
    let validate_time = validate_start.elapsed() / DECODE_ITERS;
    println!(
        "Validate: {:?} (avg of {} iterations)",
        validate_time, DECODE_ITERS
    );

    // Warmup
    for _ in 0..3 {
        let _ = decode_document(&encoded, &options).expect("Failed to decode");
    }

    let decode_start = Instant::now();
    let mut decoded = None;
    for _ in 0..DECODE_ITERS {
        decoded = Some(decode_document(&encoded, &options).expect("Failed to decode"));
    }
    let decode_time = decode_start.elapsed() / DECODE_ITERS;
    println!(
        "Decode: {:?} (avg of {} iterations)",
        decode_time, DECODE_ITERS
    );
    println!("  Throughput: {:.2} MB/s", throughput(encoded.len(), decode_time));

    assert_eq!(decoded.as_ref(), Some(entity), "Round trip should be lossless");
    encoded
}

fn main() {
    let mut args = std::env::args().skip(1);
    let sessions: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(1_000);
    let entries: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(520);
    let out_dir = args.next();

    let start = Utc
        .with_ymd_and_hms(2021, 6, 21, 9, 0, 0)
        .single()
        .expect("valid start date");
    let mut rng = StdRng::seed_from_u64(SEED);

    let synth_start = Instant::now();
    let realtime = synth_realtime(sessions, &mut rng, start);
    let asynchronous = synth_async(entries, &mut rng, start);
    let synth_time = synth_start.elapsed();

    let pairs: usize = realtime
        .sessions
        .iter()
        .flat_map(|s| s.data.iter())
        .map(Vec::len)
        .sum();
    println!(
        "Synthesized {} sessions ({} timing pairs) and {} entries in {:?}",
        realtime.sessions.len(),
        pairs,
        asynchronous.entries.len(),
        synth_time
    );

    let realtime_bytes = bench("RealtimeProject", &Entity::from(realtime.clone()));
    let async_bytes = bench("AsyncProject", &Entity::from(asynchronous.clone()));

    if let Some(dir) = out_dir {
        let dir = Path::new(&dir);
        fs::create_dir_all(dir).expect("Failed to create output directory");
        let realtime_path = dir.join("realtime.da.json");
        let async_path = dir.join("async.da.json");
        fs::write(&realtime_path, &realtime_bytes).expect("Failed to write realtime document");
        fs::write(&async_path, &async_bytes).expect("Failed to write async document");

        println!("\n=== Output Files ===");
        println!("Realtime: {}", realtime_path.display());
        println!("Async:    {}", async_path.display());
    }

    println!("\n=== Summary ===");
    let total_minutes: u64 = (0..asynchronous.metadata.design_model.activity_count())
        .map(|i| asynchronous.minutes_for(i))
        .sum();
    let total_active: u64 = (0..realtime.metadata.design_model.activity_count())
        .map(|i| realtime.active_time(i))
        .sum();
    println!(
        "Realtime: {} bytes ({:.1} MB), {:.1} h of tracked activity",
        realtime_bytes.len(),
        realtime_bytes.len() as f64 / 1_000_000.0,
        total_active as f64 / 3_600_000.0
    );
    println!(
        "Async: {} bytes ({:.1} MB), {:.1} h reported",
        async_bytes.len(),
        async_bytes.len() as f64 / 1_000_000.0,
        total_minutes as f64 / 60.0
    );
}
