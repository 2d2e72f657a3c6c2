//! Achievement catalog and evaluation
//!
//! All achievements are defined here with their unlock predicates and XP
//! rewards. Unlocked state is derived: an achievement is unlocked iff its
//! predicate holds against the current snapshot. Nothing is stored per-user.

use super::snapshot::ProgressSnapshot;

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    // Goal achievements
    FirstGoal,
    PerfectDay,

    // Streak achievements
    Streak3,
    Streak7,
    Streak30,

    // Level achievements
    Level5,
    Level10,

    // Practice achievements
    Questions100,
    Questions500,
}

impl AchievementId {
    /// Stable string id for display and external callers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstGoal => "first_goal",
            Self::PerfectDay => "perfect_day",
            Self::Streak3 => "streak_3",
            Self::Streak7 => "streak_7",
            Self::Streak30 => "streak_30",
            Self::Level5 => "level_5",
            Self::Level10 => "level_10",
            Self::Questions100 => "questions_100",
            Self::Questions500 => "questions_500",
        }
    }
}

/// Achievement definition with its unlock predicate
#[derive(Clone)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: fn(&ProgressSnapshot) -> bool,
    pub reward_xp: u32,
}

impl std::fmt::Debug for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Achievement")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("reward_xp", &self.reward_xp)
            .finish()
    }
}

/// All achievement definitions, in display order
pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: AchievementId::FirstGoal,
        name: "First Steps",
        description: "Complete your first daily goal",
        requirement: |s| s.daily_goals.iter().any(|g| g.completed),
        reward_xp: 10,
    },
    Achievement {
        id: AchievementId::PerfectDay,
        name: "Perfect Day",
        description: "Complete every daily goal",
        requirement: |s| s.daily_goal_completed,
        reward_xp: 25,
    },
    Achievement {
        id: AchievementId::Streak3,
        name: "Consistency Champion",
        description: "Keep a 3-day study streak",
        requirement: |s| s.streak >= 3,
        reward_xp: 30,
    },
    Achievement {
        id: AchievementId::Streak7,
        name: "Weekly Warrior",
        description: "Keep a 7-day study streak",
        requirement: |s| s.streak >= 7,
        reward_xp: 75,
    },
    Achievement {
        id: AchievementId::Streak30,
        name: "Monthly Master",
        description: "Keep a 30-day study streak",
        requirement: |s| s.streak >= 30,
        reward_xp: 300,
    },
    Achievement {
        id: AchievementId::Level5,
        name: "Dedicated Scholar",
        description: "Reach level 5",
        requirement: |s| s.level >= 5,
        reward_xp: 50,
    },
    Achievement {
        id: AchievementId::Level10,
        name: "Knowledge Master",
        description: "Reach level 10",
        requirement: |s| s.level >= 10,
        reward_xp: 150,
    },
    Achievement {
        id: AchievementId::Questions100,
        name: "Century of Questions",
        description: "Answer 100 practice questions",
        requirement: |s| s.questions_answered >= 100,
        reward_xp: 50,
    },
    Achievement {
        id: AchievementId::Questions500,
        name: "Question Veteran",
        description: "Answer 500 practice questions",
        requirement: |s| s.questions_answered >= 500,
        reward_xp: 150,
    },
];

impl Achievement {
    /// Get achievement definition by ID
    pub fn get(id: AchievementId) -> &'static Achievement {
        ACHIEVEMENTS
            .iter()
            .find(|a| a.id == id)
            .expect("all achievements are defined")
    }

    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }
}

/// Evaluate the catalog against a snapshot, returning the unlocked entries
/// in catalog order.
pub fn evaluate_achievements(snapshot: &ProgressSnapshot) -> Vec<&'static Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| (a.requirement)(snapshot))
        .collect()
}
