//! Simple decoder to inspect Design Awareness documents.
//!
//! Usage: `cargo run --example inspect_document -- FILE [--ongoing]`
//! Set `RUST_LOG=design_awareness=debug` to see pipeline events.

use std::fs;
use std::process::ExitCode;

use design_awareness::{
    decode_document, AsyncProject, DecodeOptions, DesignModel, Entity, RealtimeProject,
    RealtimeSession,
};
use design_awareness::util::format_timestamp;
use tracing_subscriber::EnvFilter;

fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}h{:02}m{:02}s", secs / 3600, secs / 60 % 60, secs % 60)
}

fn print_model(model: &DesignModel) {
    println!("Design model: {} ({})", model.name, model.id);
    if model.well_known {
        println!("  Well-known: yes");
    }
    for (i, activity) in model.activities.iter().enumerate() {
        println!(
            "  [{}] {:<8} {} (#{} / #{})",
            i, activity.code, activity.name, activity.color.light, activity.color.dark
        );
    }
}

fn print_session(index: usize, session: &RealtimeSession) {
    let pairs: usize = session.data.iter().map(Vec::len).sum();
    println!(
        "  [{}] {} start {} length {} pairs {} notes {}{}",
        index,
        session.id,
        format_timestamp(&session.start),
        format_ms(session.duration),
        pairs,
        session.notes.len(),
        if session.is_ongoing() { " (ongoing)" } else { "" }
    );
}

fn print_realtime(project: &RealtimeProject) {
    println!("Realtime project: {} ({})", project.metadata.name, project.id);
    print_model(&project.metadata.design_model);

    println!("\n=== Sessions ({}) ===", project.sessions.len());
    for (i, session) in project.sessions.iter().enumerate() {
        print_session(i, session);
    }

    println!("\n=== Active Time ===");
    for (i, activity) in project.metadata.design_model.activities.iter().enumerate() {
        println!("  {:<8} {}", activity.code, format_ms(project.active_time(i)));
    }
}

fn print_async(project: &AsyncProject) {
    println!("Async project: {} ({})", project.metadata.name, project.id);
    println!(
        "Reporting period: {} (alignment {})",
        project.reporting_period.name(),
        project.reporting_period.alignment_index()
    );
    print_model(&project.metadata.design_model);

    println!("\n=== Entries ({}) ===", project.entries.len());
    for entry in &project.entries {
        println!(
            "  {} {} minutes {}",
            format_timestamp(&entry.period),
            entry.id,
            entry.total_minutes()
        );
    }

    println!("\n=== Reported Time ===");
    for (i, activity) in project.metadata.design_model.activities.iter().enumerate() {
        println!("  {:<8} {} min", activity.code, project.minutes_for(i));
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: inspect_document FILE [--ongoing]");
        return ExitCode::FAILURE;
    };
    let ongoing = args.any(|a| a == "--ongoing");

    println!("Reading: {}", path);
    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let options = DecodeOptions::new().with_ongoing_session(ongoing);
    let entity = match decode_document(&data, &options) {
        Ok(entity) => entity,
        Err(errors) => {
            println!("\n=== Violations ({}) ===", errors.len());
            for v in errors.violations() {
                println!("  {v}");
            }
            return ExitCode::FAILURE;
        }
    };

    println!("\n=== {} ===", entity.entity_type());
    if !entity.entity_type().is_root_document() {
        println!("(component document; hosts may not import it on its own)");
    }
    match &entity {
        Entity::DesignModel(model) => print_model(model),
        Entity::RealtimeProject(project) => print_realtime(project),
        Entity::AsyncProject(project) => print_async(project),
        Entity::RealtimeSession(session) => print_session(0, session),
        Entity::AsyncEntry(entry) => println!(
            "Entry {} for {}: {} minutes",
            entry.id,
            format_timestamp(&entry.period),
            entry.total_minutes()
        ),
        Entity::ProjectNote(note) => println!("Note {}: {}", note.id, note.content),
        Entity::TimedNote(note) => println!(
            "Note {} at {}: {}",
            note.id(),
            format_ms(note.time),
            note.note.content
        ),
    }
    ExitCode::SUCCESS
}
