//! XP and leveling core
//!
//! Converts raw XP deltas into level changes. Thresholds grow geometrically:
//! each level-up multiplies the XP needed for the next one by 1.5 (floored).

use super::snapshot::ProgressSnapshot;

/// Bonus XP awarded for reaching a level
pub fn level_up_bonus(new_level: u32) -> u32 {
    new_level * 5
}

/// Next XP threshold after crossing one: floor(current * 1.5)
fn grow_threshold(threshold: u32) -> u32 {
    threshold + threshold / 2
}

/// Apply an XP delta to the snapshot, processing every level-up it crosses.
///
/// A negative delta (un-completing a goal) clamps at zero XP and never
/// lowers the level. Returns the levels gained, in order.
pub fn apply_xp_delta(snapshot: &mut ProgressSnapshot, delta: i64) -> Vec<u32> {
    let mut xp = (i64::from(snapshot.xp) + delta).max(0) as u64;
    let mut threshold = u64::from(snapshot.xp_to_next_level);
    let mut gained = Vec::new();

    while xp >= threshold {
        xp -= threshold;
        snapshot.level += 1;
        threshold = u64::from(grow_threshold(threshold as u32));
        gained.push(snapshot.level);
    }

    snapshot.xp = xp as u32;
    snapshot.xp_to_next_level = threshold as u32;
    gained
}

/// Progress towards the next level (0.0 - 1.0), for display
pub fn progress_to_next(snapshot: &ProgressSnapshot) -> f32 {
    if snapshot.xp_to_next_level == 0 {
        return 1.0;
    }
    snapshot.xp as f32 / snapshot.xp_to_next_level as f32
}
