//! Progress tracking module for StudyKit
//!
//! Maintains the per-user progress profile: XP, levels, daily goals,
//! streaks, a bounded activity log, and derived achievements.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐      ┌───────────────┐
//! │  CLI / app   │──────▶ ProgressEngine │
//! └──────────────┘      └───────┬───────┘
//!          pure transitions     │ load/save
//!   (leveling, goals, streaks)  ▼
//!                        ProfileStore
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let engine = ProgressEngine::new(store, SystemClock, templates);
//! let mut snapshot = engine.start_session("user-1").await?;
//! let events = engine.toggle_goal(&mut snapshot, "math-drill");
//! engine.save("user-1", &snapshot).await?;
//! ```

mod achievements;
mod goals;
mod leveling;
mod snapshot;

pub use achievements::{Achievement, AchievementId, ACHIEVEMENTS, evaluate_achievements};
pub use goals::{
    DEFAULT_GOAL_TEMPLATES, GoalTemplate, ToggleOutcome, rollover_day, streak_bonus, toggle_goal,
};
pub use leveling::{apply_xp_delta, level_up_bonus, progress_to_next};
pub use snapshot::{
    Activity, ActivityKind, BASE_XP_TO_NEXT_LEVEL, DailyGoal, ProgressSnapshot,
    RECENT_ACTIVITY_CAP,
};

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::store::{ProfileStore, StoreError};

/// Events produced by a progress transition, for the caller to surface
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    XpAwarded {
        amount: u32,
        reason: String,
    },
    LevelUp {
        new_level: u32,
        bonus_xp: u32,
    },
    StreakExtended {
        count: u32,
        bonus_xp: u32,
    },
    AchievementUnlocked(&'static Achievement),
}

/// Coordinates progress transitions, the clock, and the profile store.
///
/// Transitions mutate a caller-held [`ProgressSnapshot`] and return events;
/// persistence is a separate, best-effort step so a failed write never
/// blocks or rolls back local state.
pub struct ProgressEngine<S, C> {
    store: S,
    clock: C,
    templates: Vec<GoalTemplate>,
}

impl<S: ProfileStore, C: Clock> ProgressEngine<S, C> {
    pub fn new(store: S, clock: C, templates: Vec<GoalTemplate>) -> Self {
        Self {
            store,
            clock,
            templates,
        }
    }

    pub fn templates(&self) -> &[GoalTemplate] {
        &self.templates
    }

    /// Load the user's snapshot, initializing a fresh profile on first
    /// access and rolling the day over if the calendar moved on.
    ///
    /// A missing profile is not an error; a malformed one is.
    pub async fn start_session(&self, user_id: &str) -> Result<ProgressSnapshot, StoreError> {
        let today = self.clock.today();
        let mut snapshot = match self.store.get(user_id).await {
            Ok(snapshot) => snapshot,
            Err(StoreError::NotFound(_)) => {
                debug!(user_id, "no stored profile, initializing defaults");
                let goals = self.templates.iter().map(GoalTemplate::instantiate).collect();
                let snapshot = ProgressSnapshot::initial(goals, today);
                self.persist(user_id, &snapshot).await;
                return Ok(snapshot);
            }
            Err(err) => return Err(err),
        };

        if rollover_day(&mut snapshot, &self.templates, today) {
            debug!(user_id, %today, "rolled over to a new study day");
            self.persist(user_id, &snapshot).await;
        }
        Ok(snapshot)
    }

    /// Toggle a daily goal and report everything that happened.
    ///
    /// An unknown goal id is a caller error and leaves the snapshot
    /// untouched.
    pub fn toggle_goal(&self, snapshot: &mut ProgressSnapshot, goal_id: &str) -> Vec<ProgressEvent> {
        let unlocked_before = unlocked_ids(snapshot);
        let mut events = Vec::new();

        let Some(outcome) = goals::toggle_goal(
            snapshot,
            goal_id,
            self.clock.today(),
            self.clock.now_ms(),
        ) else {
            warn!(goal_id, "toggle requested for a goal not in today's set");
            return events;
        };

        if outcome.completed {
            events.push(ProgressEvent::XpAwarded {
                amount: outcome.xp_delta as u32,
                reason: outcome.goal_title.clone(),
            });
        }
        if let Some(count) = outcome.streak_extended {
            events.push(ProgressEvent::StreakExtended {
                count,
                bonus_xp: outcome.streak_bonus_xp,
            });
        }

        self.settle_levels(snapshot, outcome.levels_gained, &mut events);
        self.unlock_pass(snapshot, &unlocked_before, &mut events);
        events
    }

    /// Record a non-goal XP source: a finished quiz, practice section, or
    /// lesson. Question counters feed the practice achievements.
    pub fn record_activity(
        &self,
        snapshot: &mut ProgressSnapshot,
        kind: ActivityKind,
        title: &str,
        xp: u32,
        questions_answered: u64,
        questions_correct: u64,
    ) -> Vec<ProgressEvent> {
        let unlocked_before = unlocked_ids(snapshot);
        let mut events = vec![ProgressEvent::XpAwarded {
            amount: xp,
            reason: title.to_string(),
        }];

        let gained = apply_xp_delta(snapshot, i64::from(xp));
        snapshot.questions_answered += questions_answered;
        snapshot.questions_correct += questions_correct;
        snapshot.push_activity(Activity::new(kind, title, self.clock.now_ms(), xp));
        snapshot.last_study_date = self.clock.today();

        self.settle_levels(snapshot, gained, &mut events);
        self.unlock_pass(snapshot, &unlocked_before, &mut events);
        events
    }

    /// Roll the snapshot into today's cycle; returns whether anything changed
    pub fn rollover(&self, snapshot: &mut ProgressSnapshot) -> bool {
        rollover_day(snapshot, &self.templates, self.clock.today())
    }

    /// Currently unlocked achievements, in catalog order
    pub fn achievements(&self, snapshot: &ProgressSnapshot) -> Vec<&'static Achievement> {
        evaluate_achievements(snapshot)
    }

    /// Persist the snapshot. Failures surface to the caller; local state is
    /// never rolled back.
    pub async fn save(&self, user_id: &str, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        self.store.put(user_id, snapshot).await
    }

    /// Best-effort write used on paths that must not fail the caller
    async fn persist(&self, user_id: &str, snapshot: &ProgressSnapshot) {
        if let Err(err) = self.store.put(user_id, snapshot).await {
            warn!(user_id, %err, "profile write failed, continuing with local state");
        }
    }

    /// Turn gained levels into events and cascade their bonus XP, which may
    /// itself cross further thresholds.
    fn settle_levels(
        &self,
        snapshot: &mut ProgressSnapshot,
        gained: Vec<u32>,
        events: &mut Vec<ProgressEvent>,
    ) {
        let mut queue = std::collections::VecDeque::from(gained);
        while let Some(new_level) = queue.pop_front() {
            let bonus_xp = level_up_bonus(new_level);
            events.push(ProgressEvent::LevelUp { new_level, bonus_xp });
            queue.extend(apply_xp_delta(snapshot, i64::from(bonus_xp)));
        }
    }

    /// Single pass over the catalog: report achievements whose predicates
    /// newly hold after this transition.
    ///
    /// Unlock state is derived, never stored, so `reward_xp` is catalog
    /// metadata rather than an applied delta: with no unlock memory there
    /// is no way to award it exactly once.
    fn unlock_pass(
        &self,
        snapshot: &ProgressSnapshot,
        unlocked_before: &HashSet<AchievementId>,
        events: &mut Vec<ProgressEvent>,
    ) {
        for achievement in evaluate_achievements(snapshot) {
            if !unlocked_before.contains(&achievement.id) {
                debug!(id = achievement.id.as_str(), "achievement unlocked");
                events.push(ProgressEvent::AchievementUnlocked(achievement));
            }
        }
    }
}

fn unlocked_ids(snapshot: &ProgressSnapshot) -> HashSet<AchievementId> {
    evaluate_achievements(snapshot).iter().map(|a| a.id).collect()
}
