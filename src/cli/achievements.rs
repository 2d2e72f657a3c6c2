//! Achievements command implementation

use anyhow::Result;

use studykit::config::Config;
use studykit::progress::ACHIEVEMENTS;

use super::build_engine;

/// Show the full catalog with the user's unlock state
pub async fn achievements_command(user: &str, config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    let snapshot = engine.start_session(user).await?;

    let unlocked = engine.achievements(&snapshot);

    for achievement in ACHIEVEMENTS {
        let mark = if unlocked.iter().any(|a| a.id == achievement.id) {
            "x"
        } else {
            " "
        };
        println!(
            "  [{}] {} (+{} XP)  {}",
            mark, achievement.name, achievement.reward_xp, achievement.description
        );
    }

    Ok(())
}
