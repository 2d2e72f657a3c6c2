//! Daily goal and streak transitions
//!
//! Goals are toggled through the day; the streak counts consecutive calendar
//! days on which every goal was completed. Toggling is increment-only for
//! the streak; the day rollover is the authoritative reset point.
//!
//! The streak chain is judged against `last_completed_date` (the last day
//! the whole goal set was finished), not `last_study_date`, which moves on
//! every toggle and would mask whether yesterday's set was done.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::leveling::apply_xp_delta;
use super::snapshot::{Activity, ActivityKind, DailyGoal, ProgressSnapshot};

/// XP bonus for extending the streak to `new_streak` days
pub fn streak_bonus(new_streak: u32) -> u32 {
    10 * new_streak
}

/// A configured goal, instantiated into the snapshot on each rollover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTemplate {
    pub id: String,
    pub title: String,
    pub xp: u32,
}

impl GoalTemplate {
    pub fn instantiate(&self) -> DailyGoal {
        DailyGoal {
            id: self.id.clone(),
            title: self.title.clone(),
            xp: self.xp,
            completed: false,
        }
    }
}

/// Built-in goal set used when the config file does not override it
pub static DEFAULT_GOAL_TEMPLATES: Lazy<Vec<GoalTemplate>> = Lazy::new(|| {
    vec![
        GoalTemplate {
            id: "math-drill".into(),
            title: "Finish a math drill set".into(),
            xp: 25,
        },
        GoalTemplate {
            id: "reading-passage".into(),
            title: "Read one passage and answer its questions".into(),
            xp: 25,
        },
        GoalTemplate {
            id: "vocab-cards".into(),
            title: "Review 20 vocabulary cards".into(),
            xp: 15,
        },
    ]
});

/// What a goal toggle did to the snapshot
#[derive(Debug, Clone, Default)]
pub struct ToggleOutcome {
    /// Goal state after the toggle
    pub completed: bool,
    pub goal_title: String,
    /// Positive on completion, negative on un-completion
    pub xp_delta: i64,
    /// Levels crossed by the goal XP and any streak bonus
    pub levels_gained: Vec<u32>,
    /// New streak count when this toggle extended it
    pub streak_extended: Option<u32>,
    pub streak_bonus_xp: u32,
}

/// Flip a goal's completed flag and apply all follow-on effects.
///
/// Returns `None` when `goal_id` is not in the current goal set; the caller
/// treats that as a precondition violation and leaves the snapshot untouched.
pub fn toggle_goal(
    snapshot: &mut ProgressSnapshot,
    goal_id: &str,
    today: NaiveDate,
    now_ms: i64,
) -> Option<ToggleOutcome> {
    let goal = snapshot.daily_goals.iter_mut().find(|g| g.id == goal_id)?;
    goal.completed = !goal.completed;
    let completed = goal.completed;
    let goal_xp = goal.xp;
    let goal_title = goal.title.clone();

    let xp_delta = if completed {
        i64::from(goal_xp)
    } else {
        -i64::from(goal_xp)
    };
    let mut levels_gained = apply_xp_delta(snapshot, xp_delta);

    let was_all_completed = snapshot.daily_goal_completed;
    snapshot.refresh_goal_completion();

    if completed {
        snapshot.push_activity(Activity::new(
            ActivityKind::Goal,
            goal_title.clone(),
            now_ms,
            goal_xp,
        ));
    }

    // Streak credit happens once per calendar day, on the transition into
    // all-complete. Un-completing never revokes it.
    let mut streak_extended = None;
    let mut streak_bonus_xp = 0;
    if snapshot.daily_goal_completed
        && !was_all_completed
        && snapshot.last_completed_date != Some(today)
    {
        let yesterday = today.pred_opt().expect("date has a predecessor");
        if snapshot.last_completed_date == Some(yesterday) || snapshot.streak == 0 {
            snapshot.streak += 1;
            streak_extended = Some(snapshot.streak);
            streak_bonus_xp = streak_bonus(snapshot.streak);
            levels_gained.extend(apply_xp_delta(snapshot, i64::from(streak_bonus_xp)));
            snapshot.push_activity(Activity::new(
                ActivityKind::Streak,
                format!("{}-day streak", snapshot.streak),
                now_ms,
                streak_bonus_xp,
            ));
        }
        snapshot.last_completed_date = Some(today);
    }

    snapshot.last_study_date = today;

    Some(ToggleOutcome {
        completed,
        goal_title,
        xp_delta,
        levels_gained,
        streak_extended,
        streak_bonus_xp,
    })
}

/// Start a new daily cycle if the calendar day has changed.
///
/// Resets the goal set from the templates and clears the completion flag.
/// The streak drops to zero when the chain is broken: more than one day
/// since the last recorded study, or a day passed without the goal set
/// being fully completed. Calling this again on the same day is a no-op,
/// so the caller may run it on every session start. Returns whether a
/// rollover happened.
pub fn rollover_day(
    snapshot: &mut ProgressSnapshot,
    templates: &[GoalTemplate],
    today: NaiveDate,
) -> bool {
    if snapshot.last_study_date == today {
        return false;
    }

    snapshot.daily_goals = templates.iter().map(GoalTemplate::instantiate).collect();
    snapshot.daily_goal_completed = false;

    let study_gap = (today - snapshot.last_study_date).num_days();
    let yesterday = today.pred_opt().expect("date has a predecessor");
    let chain_intact = matches!(snapshot.last_completed_date, Some(d) if d >= yesterday);
    if study_gap > 1 || !chain_intact {
        snapshot.streak = 0;
    }

    snapshot.last_study_date = today;
    true
}
