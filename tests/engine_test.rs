//! End-to-end tests for the progress engine
//!
//! Drives full user flows over the in-memory store with a pinned clock:
//! first-session initialization, goal days with streak bonuses, multi-day
//! streak growth and resets, optimistic handling of failed writes, and
//! rejection of corrupt stored documents.

use std::sync::Arc;

use chrono::NaiveDate;

use studykit::clock::FixedClock;
use studykit::progress::{
    AchievementId, ActivityKind, GoalTemplate, ProgressEngine, ProgressEvent,
};
use studykit::store::{MemoryStore, ProfileStore, SqliteStore, StoreError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

/// Three 20-XP goals, so a completed day is worth 60 + 10 streak bonus
fn templates() -> Vec<GoalTemplate> {
    ["math-drill", "reading-passage", "vocab-cards"]
        .iter()
        .map(|id| GoalTemplate {
            id: (*id).into(),
            title: format!("do {id}"),
            xp: 20,
        })
        .collect()
}

fn engine_on(
    store: &Arc<MemoryStore>,
    clock: &Arc<FixedClock>,
) -> ProgressEngine<Arc<MemoryStore>, Arc<FixedClock>> {
    ProgressEngine::new(Arc::clone(store), Arc::clone(clock), templates())
}

fn has_unlock(events: &[ProgressEvent], id: AchievementId) -> bool {
    events
        .iter()
        .any(|e| matches!(e, ProgressEvent::AchievementUnlocked(a) if a.id == id))
}

#[tokio::test]
async fn first_session_initializes_and_persists_defaults() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let snapshot = engine.start_session("amy").await.unwrap();

    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.xp, 0);
    assert_eq!(snapshot.xp_to_next_level, 100);
    assert_eq!(snapshot.streak, 0);
    assert_eq!(snapshot.last_study_date, day(1));
    assert_eq!(snapshot.daily_goals.len(), 3);
    assert!(snapshot.daily_goals.iter().all(|g| !g.completed));
    assert!(snapshot.recent_activities.is_empty());
    assert!(store.contains("amy"));
}

#[tokio::test]
async fn starting_a_session_twice_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let first = engine.start_session("amy").await.unwrap();
    let second = engine.start_session("amy").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn completing_the_day_awards_goal_xp_and_streak_bonus() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let mut snapshot = engine.start_session("amy").await.unwrap();
    let first = engine.toggle_goal(&mut snapshot, "math-drill");
    assert!(has_unlock(&first, AchievementId::FirstGoal));

    engine.toggle_goal(&mut snapshot, "reading-passage");
    let last = engine.toggle_goal(&mut snapshot, "vocab-cards");

    // 3 x 20 goal XP plus the 10 XP first-day streak bonus
    assert_eq!(snapshot.xp, 70);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.streak, 1);
    assert!(snapshot.daily_goal_completed);
    assert!(last
        .iter()
        .any(|e| matches!(e, ProgressEvent::StreakExtended { count: 1, bonus_xp: 10 })));
    assert!(has_unlock(&last, AchievementId::PerfectDay));

    engine.save("amy", &snapshot).await.unwrap();
    assert_eq!(store.get("amy").await.unwrap(), snapshot);
}

#[tokio::test]
async fn streak_grows_across_consecutive_days_and_resets_after_a_gap() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let mut snapshot = engine.start_session("amy").await.unwrap();
    for id in ["math-drill", "reading-passage", "vocab-cards"] {
        engine.toggle_goal(&mut snapshot, id);
    }
    engine.save("amy", &snapshot).await.unwrap();
    assert_eq!(snapshot.streak, 1);

    // Next morning: goals reset, streak carries over and extends.
    clock.advance_days(1);
    let mut snapshot = engine.start_session("amy").await.unwrap();
    assert!(snapshot.daily_goals.iter().all(|g| !g.completed));
    assert_eq!(snapshot.streak, 1);
    for id in ["math-drill", "reading-passage", "vocab-cards"] {
        engine.toggle_goal(&mut snapshot, id);
    }
    engine.save("amy", &snapshot).await.unwrap();
    assert_eq!(snapshot.streak, 2);

    // Three silent days later the chain is broken.
    clock.advance_days(3);
    let snapshot = engine.start_session("amy").await.unwrap();
    assert_eq!(snapshot.streak, 0);
}

#[tokio::test]
async fn failed_save_keeps_local_state() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let mut snapshot = engine.start_session("amy").await.unwrap();
    engine.toggle_goal(&mut snapshot, "math-drill");
    assert_eq!(snapshot.xp, 20);

    store.set_fail_writes(true);
    let err = engine.save("amy", &snapshot).await.unwrap_err();
    assert!(matches!(err, StoreError::Write(_)));

    // Local state is not rolled back; the stored copy is simply stale.
    assert_eq!(snapshot.xp, 20);
    assert_eq!(store.get("amy").await.unwrap().xp, 0);
}

#[tokio::test]
async fn recording_a_quiz_levels_up_with_bonus_cascade() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let mut snapshot = engine.start_session("amy").await.unwrap();
    let events = engine.record_activity(
        &mut snapshot,
        ActivityKind::Quiz,
        "Algebra diagnostic",
        120,
        30,
        25,
    );

    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::LevelUp { new_level: 2, bonus_xp: 10 })));
    assert_eq!(snapshot.level, 2);
    // 120 - 100 threshold + 10 level-up bonus
    assert_eq!(snapshot.xp, 30);
    assert_eq!(snapshot.xp_to_next_level, 150);
    assert_eq!(snapshot.questions_answered, 30);
    assert_eq!(snapshot.questions_correct, 25);
    assert_eq!(snapshot.recent_activities[0].kind, ActivityKind::Quiz);
}

#[tokio::test]
async fn question_milestone_unlocks_via_recorded_practice() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let mut snapshot = engine.start_session("amy").await.unwrap();
    let first = engine.record_activity(
        &mut snapshot,
        ActivityKind::Practice,
        "Reading section",
        30,
        60,
        48,
    );
    assert!(!has_unlock(&first, AchievementId::Questions100));

    let second = engine.record_activity(
        &mut snapshot,
        ActivityKind::Practice,
        "Math section",
        30,
        60,
        51,
    );
    assert!(has_unlock(&second, AchievementId::Questions100));
}

#[tokio::test]
async fn toggling_an_unknown_goal_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = engine_on(&store, &clock);

    let mut snapshot = engine.start_session("amy").await.unwrap();
    let before = snapshot.clone();
    let events = engine.toggle_goal(&mut snapshot, "essay-outline");

    assert!(events.is_empty());
    assert_eq!(snapshot, before);
}

#[tokio::test]
async fn corrupt_stored_profile_is_rejected_at_the_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("profiles.db");
    let store = SqliteStore::open(&db_path).unwrap();

    // Plant a malformed document behind the engine's back.
    let conn = rusqlite::Connection::open(&db_path).unwrap();
    conn.execute(
        "INSERT INTO profiles (user_id, snapshot, updated_at) VALUES ('amy', 'not json', 0)",
        [],
    )
    .unwrap();

    let clock = Arc::new(FixedClock::new(day(1)));
    let engine = ProgressEngine::new(store, Arc::clone(&clock), templates());
    let err = engine.start_session("amy").await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}
