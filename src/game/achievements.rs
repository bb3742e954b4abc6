//! Achievement definitions and the unlock evaluator.
//!
//! Definitions are a static table scanned on every reward-relevant action.
//! State-based conditions (level, gold) are evaluated on every call no
//! matter which action triggered the scan; counter-based conditions only
//! fire when the action kind matches.

use chrono::{DateTime, Utc};
use log::debug;

use crate::game::progression::add_achievement;
use crate::game::types::{ActionKind, Player};

/// What it takes to unlock an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementCondition {
    /// Player level has reached the threshold.
    LevelReached { threshold: u32 },
    /// Gold on hand has reached the threshold.
    GoldCollected { threshold: u64 },
    /// A lifetime counter of the given kind has reached the threshold.
    Action { kind: ActionKind, threshold: u64 },
}

/// Reward noted on the definition and surfaced in the unlock notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementReward {
    pub xp: u64,
    pub gold: u64,
}

/// Static description of a single achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub condition: AchievementCondition,
    pub reward: AchievementReward,
}

/// Every achievement in the game, defined statically.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_monster",
        title: "Monster Slayer",
        description: "Defeat your first monster",
        condition: AchievementCondition::Action {
            kind: ActionKind::MonsterDefeated,
            threshold: 1,
        },
        reward: AchievementReward { xp: 50, gold: 20 },
    },
    AchievementDef {
        id: "first_treasure",
        title: "Treasure Hunter",
        description: "Find your first treasure",
        condition: AchievementCondition::Action {
            kind: ActionKind::TreasureFound,
            threshold: 1,
        },
        reward: AchievementReward { xp: 50, gold: 20 },
    },
    AchievementDef {
        id: "first_riddle",
        title: "Riddle Sage",
        description: "Solve your first riddle",
        condition: AchievementCondition::Action {
            kind: ActionKind::RiddleSolved,
            threshold: 1,
        },
        reward: AchievementReward { xp: 50, gold: 20 },
    },
    AchievementDef {
        id: "tab_master",
        title: "Tab Master",
        description: "Close 100 tabs",
        condition: AchievementCondition::Action {
            kind: ActionKind::TabClosed,
            threshold: 100,
        },
        reward: AchievementReward { xp: 200, gold: 100 },
    },
    AchievementDef {
        id: "marathon",
        title: "Marathon Browser",
        description: "Accumulate 10 hours of tab time",
        condition: AchievementCondition::Action {
            kind: ActionKind::TabTime,
            threshold: 600,
        },
        reward: AchievementReward { xp: 300, gold: 150 },
    },
    AchievementDef {
        id: "level_5",
        title: "Adventurer",
        description: "Reach level 5",
        condition: AchievementCondition::LevelReached { threshold: 5 },
        reward: AchievementReward { xp: 0, gold: 200 },
    },
    AchievementDef {
        id: "golden_hoard",
        title: "Dragon's Hoard",
        description: "Collect 1000 gold",
        condition: AchievementCondition::GoldCollected { threshold: 1000 },
        reward: AchievementReward { xp: 100, gold: 0 },
    },
];

/// Scan the definition table after an action and unlock everything the
/// player now qualifies for.
///
/// Skips already-earned ids, so repeated calls can never duplicate an
/// unlock. Returns the newly unlocked definitions for notification.
pub fn check_achievements(
    player: &mut Player,
    action: ActionKind,
    value: u64,
    now: DateTime<Utc>,
) -> Vec<&'static AchievementDef> {
    let mut unlocked = Vec::new();
    for def in ACHIEVEMENTS {
        if player.has_achievement(def.id) {
            continue;
        }
        let met = match def.condition {
            AchievementCondition::LevelReached { threshold } => player.level >= threshold,
            AchievementCondition::GoldCollected { threshold } => player.gold >= threshold,
            AchievementCondition::Action { kind, threshold } => {
                kind == action && value >= threshold
            }
        };
        if met && add_achievement(player, def, now) {
            debug!("achievement unlocked: {}", def.id);
            unlocked.push(def);
        }
    }
    unlocked
}
