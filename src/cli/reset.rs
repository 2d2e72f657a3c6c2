//! Reset command implementation

use anyhow::Result;

use studykit::clock::{Clock, SystemClock};
use studykit::config::Config;
use studykit::progress::{GoalTemplate, ProgressSnapshot};

use super::build_engine;

/// Replace the profile with a fresh one
pub async fn reset_command(user: &str, config: &Config, force: bool) -> Result<()> {
    if !force {
        eprintln!("This deletes all progress for '{}'. Re-run with --force to confirm.", user);
        return Ok(());
    }

    let engine = build_engine(config)?;
    let goals = config.goals.iter().map(GoalTemplate::instantiate).collect();
    let snapshot = ProgressSnapshot::initial(goals, SystemClock.today());
    engine.save(user, &snapshot).await?;

    println!("Profile '{}' reset.", user);
    Ok(())
}
