//! Goal listing and toggling commands

use anyhow::Result;
use tracing::warn;

use studykit::config::Config;

use super::{build_engine, print_events};

/// List today's goals
pub async fn goals_command(user: &str, config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    let snapshot = engine.start_session(user).await?;

    for goal in &snapshot.daily_goals {
        let mark = if goal.completed { "x" } else { " " };
        println!("  [{}] {} (+{} XP)  {}", mark, goal.id, goal.xp, goal.title);
    }

    Ok(())
}

/// Toggle a daily goal and persist the result
pub async fn toggle_command(user: &str, config: &Config, goal_id: &str) -> Result<()> {
    let engine = build_engine(config)?;
    let mut snapshot = engine.start_session(user).await?;

    if !snapshot.daily_goals.iter().any(|g| g.id == goal_id) {
        eprintln!("Unknown goal: {}", goal_id);
        eprintln!("Run `studykit goals` to see today's goal ids.");
        return Ok(());
    }

    let events = engine.toggle_goal(&mut snapshot, goal_id);
    let goal = snapshot
        .daily_goals
        .iter()
        .find(|g| g.id == goal_id)
        .expect("goal checked above");

    if goal.completed {
        println!("Completed: {}", goal.title);
    } else {
        println!("Un-completed: {}", goal.title);
    }
    print_events(&events);

    // Local state stays authoritative even when the write fails.
    if let Err(err) = engine.save(user, &snapshot).await {
        warn!(%err, "profile write failed; progress kept locally for this run");
        eprintln!("Warning: progress could not be saved ({})", err);
    }

    Ok(())
}
