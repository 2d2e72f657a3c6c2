//! CLI command implementations

pub mod achievements;
pub mod goals;
pub mod log;
pub mod record;
pub mod reset;
pub mod status;

use anyhow::Result;

use studykit::clock::SystemClock;
use studykit::config::Config;
use studykit::progress::{ProgressEngine, ProgressEvent};
use studykit::store::SqliteStore;

pub(crate) type Engine = ProgressEngine<SqliteStore, SystemClock>;

pub(crate) fn build_engine(config: &Config) -> Result<Engine> {
    let store = SqliteStore::open(&config.store_path())?;
    Ok(ProgressEngine::new(store, SystemClock, config.goals.clone()))
}

/// Print transition events the way the dashboard would surface them
pub(crate) fn print_events(events: &[ProgressEvent]) {
    for event in events {
        match event {
            ProgressEvent::XpAwarded { amount, reason } => {
                println!("  +{} XP - {}", amount, reason);
            }
            ProgressEvent::StreakExtended { count, bonus_xp } => {
                println!("  {}-day streak! (+{} XP)", count, bonus_xp);
            }
            ProgressEvent::LevelUp { new_level, bonus_xp } => {
                println!("  Level up! Now level {} (+{} bonus XP)", new_level, bonus_xp);
            }
            ProgressEvent::AchievementUnlocked(achievement) => {
                println!(
                    "  Achievement unlocked: {} - {}",
                    achievement.name, achievement.description
                );
            }
        }
    }
}
