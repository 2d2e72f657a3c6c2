//! Status command implementation

use anyhow::Result;

use studykit::config::Config;
use studykit::progress::progress_to_next;

use super::build_engine;

/// Show today's progress dashboard
pub async fn status_command(user: &str, config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    let snapshot = engine.start_session(user).await?;

    println!(
        "Level {}  ({} / {} XP, {:.0}%)",
        snapshot.level,
        snapshot.xp,
        snapshot.xp_to_next_level,
        progress_to_next(&snapshot) * 100.0
    );
    println!("Streak: {} day(s)", snapshot.streak);

    let done = snapshot.daily_goals.iter().filter(|g| g.completed).count();
    println!("\nToday's goals ({}/{} done):", done, snapshot.daily_goals.len());
    for goal in &snapshot.daily_goals {
        let mark = if goal.completed { "x" } else { " " };
        println!("  [{}] {} (+{} XP)  {}", mark, goal.id, goal.xp, goal.title);
    }

    let unlocked = engine.achievements(&snapshot).len();
    println!(
        "\nAchievements: {}/{} unlocked",
        unlocked,
        studykit::progress::Achievement::total_count()
    );

    Ok(())
}
