//! Record command implementation

use anyhow::Result;
use tracing::warn;

use studykit::config::Config;
use studykit::progress::ActivityKind;

use super::{build_engine, print_events};

/// Record a quiz, practice or lesson session worth some XP
pub async fn record_command(
    user: &str,
    config: &Config,
    title: &str,
    kind: &str,
    xp: u32,
    answered: u64,
    correct: u64,
) -> Result<()> {
    let kind = match kind {
        "quiz" => ActivityKind::Quiz,
        "practice" => ActivityKind::Practice,
        "lesson" => ActivityKind::Lesson,
        other => {
            eprintln!("Unknown activity kind: {} (expected quiz, practice or lesson)", other);
            return Ok(());
        }
    };

    if correct > answered {
        eprintln!("--correct cannot exceed --answered");
        return Ok(());
    }

    let engine = build_engine(config)?;
    let mut snapshot = engine.start_session(user).await?;

    let events = engine.record_activity(&mut snapshot, kind, title, xp, answered, correct);
    println!("Recorded: {}", title);
    print_events(&events);

    if let Err(err) = engine.save(user, &snapshot).await {
        warn!(%err, "profile write failed; progress kept locally for this run");
        eprintln!("Warning: progress could not be saved ({})", err);
    }

    Ok(())
}
