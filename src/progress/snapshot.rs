//! Progress profile data model
//!
//! These structures represent the per-user progress document stored in and
//! loaded from the profile store. Stored documents are validated on read;
//! a malformed payload is rejected at the store boundary instead of being
//! trusted by the transition logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of entries kept in the recent-activity log
pub const RECENT_ACTIVITY_CAP: usize = 10;

/// XP required to go from level 1 to level 2
pub const BASE_XP_TO_NEXT_LEVEL: u32 = 100;

/// One daily goal in the current cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub id: String,
    pub title: String,
    pub xp: u32,
    pub completed: bool,
}

/// Kind of XP-earning event shown in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Goal,
    Quiz,
    Practice,
    Lesson,
    Streak,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Quiz => "quiz",
            Self::Practice => "practice",
            Self::Lesson => "lesson",
            Self::Streak => "streak",
        }
    }
}

/// One entry in the recent-activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    /// Milliseconds since the epoch
    pub timestamp: i64,
    pub xp_earned: u32,
}

impl Activity {
    pub fn new(kind: ActivityKind, title: impl Into<String>, timestamp: i64, xp_earned: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            timestamp,
            xp_earned,
        }
    }
}

/// Per-user progress document
///
/// Invariants maintained by every transition:
/// - `xp < xp_to_next_level`
/// - `recent_activities.len() <= RECENT_ACTIVITY_CAP`
/// - `daily_goal_completed` iff every goal in `daily_goals` is completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    /// Consecutive calendar days with all daily goals completed
    pub streak: u32,
    /// Calendar date of the last day progress was recorded
    pub last_study_date: NaiveDate,
    /// Date the daily goal set was last fully completed; the streak chain
    /// is judged against this, not against `last_study_date`, which moves
    /// on every toggle
    #[serde(default)]
    pub last_completed_date: Option<NaiveDate>,
    pub daily_goal_completed: bool,
    pub daily_goals: Vec<DailyGoal>,
    /// Newest first
    pub recent_activities: Vec<Activity>,
    /// Lifetime practice-question counters
    #[serde(default)]
    pub questions_answered: u64,
    #[serde(default)]
    pub questions_correct: u64,
}

impl ProgressSnapshot {
    /// Fresh profile for a user seen for the first time
    pub fn initial(goals: Vec<DailyGoal>, today: NaiveDate) -> Self {
        let daily_goal_completed = goals.iter().all(|g| g.completed);
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: BASE_XP_TO_NEXT_LEVEL,
            streak: 0,
            last_study_date: today,
            last_completed_date: None,
            daily_goal_completed,
            daily_goals: goals,
            recent_activities: Vec::new(),
            questions_answered: 0,
            questions_correct: 0,
        }
    }

    /// Prepend an activity, keeping only the most recent entries
    pub fn push_activity(&mut self, activity: Activity) {
        self.recent_activities.insert(0, activity);
        self.recent_activities.truncate(RECENT_ACTIVITY_CAP);
    }

    /// Recompute `daily_goal_completed` from the goal list
    pub fn refresh_goal_completion(&mut self) {
        self.daily_goal_completed = self.daily_goals.iter().all(|g| g.completed);
    }

    /// Check the structural invariants of a stored document
    ///
    /// Returns the first violation found, for error reporting at the store
    /// boundary.
    pub fn validate(&self) -> Result<(), String> {
        if self.level < 1 {
            return Err("level must be at least 1".into());
        }
        if self.xp_to_next_level == 0 {
            return Err("xp_to_next_level must be positive".into());
        }
        if self.xp >= self.xp_to_next_level {
            return Err(format!(
                "xp {} not below threshold {}",
                self.xp, self.xp_to_next_level
            ));
        }
        if self.recent_activities.len() > RECENT_ACTIVITY_CAP {
            return Err(format!(
                "activity log holds {} entries (cap {})",
                self.recent_activities.len(),
                RECENT_ACTIVITY_CAP
            ));
        }
        let all_done = self.daily_goals.iter().all(|g| g.completed);
        if self.daily_goal_completed != all_done {
            return Err("daily_goal_completed disagrees with goal list".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProgressSnapshot {
        ProgressSnapshot::initial(Vec::new(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    }

    #[test]
    fn activity_log_stays_bounded() {
        let mut snap = snapshot();
        for i in 0..25 {
            snap.push_activity(Activity::new(ActivityKind::Quiz, format!("quiz {i}"), i, 5));
        }
        assert_eq!(snap.recent_activities.len(), RECENT_ACTIVITY_CAP);
        // Newest first
        assert_eq!(snap.recent_activities[0].title, "quiz 24");
    }

    #[test]
    fn initial_snapshot_is_valid() {
        assert!(snapshot().validate().is_ok());
    }

    #[test]
    fn validate_rejects_xp_at_threshold() {
        let mut snap = snapshot();
        snap.xp = snap.xp_to_next_level;
        assert!(snap.validate().is_err());
    }

    #[test]
    fn validate_rejects_inconsistent_completion_flag() {
        let mut snap = snapshot();
        snap.daily_goals.push(DailyGoal {
            id: "math-drill".into(),
            title: "Finish a math drill set".into(),
            xp: 25,
            completed: false,
        });
        snap.daily_goal_completed = true;
        assert!(snap.validate().is_err());
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let mut snap = snapshot();
        snap.push_activity(Activity::new(ActivityKind::Lesson, "Algebra basics", 100, 15));
        let json = serde_json::to_string(&snap).unwrap();
        let back: ProgressSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
