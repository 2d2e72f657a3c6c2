//! Activity log command implementation

use anyhow::Result;
use chrono::DateTime;

use studykit::config::Config;

use super::build_engine;

/// Show the recent activity log, newest first
pub async fn log_command(user: &str, config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    let snapshot = engine.start_session(user).await?;

    if snapshot.recent_activities.is_empty() {
        println!("No activity recorded yet.");
        return Ok(());
    }

    for activity in &snapshot.recent_activities {
        let when = DateTime::from_timestamp_millis(activity.timestamp)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  [{}] {} (+{} XP)",
            when,
            activity.kind.as_str(),
            activity.title,
            activity.xp_earned
        );
    }

    Ok(())
}
