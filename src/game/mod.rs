//! TabQuest game core: reward tables, the random event generator, player
//! progression arithmetic, quest tracking, and achievement evaluation.
//! Everything here is synchronous logic over plain records, with the clock
//! and the random source passed in by the caller.

pub mod achievements;
pub mod catalog;
pub mod errors;
pub mod events;
pub mod progression;
pub mod quests;
pub mod types;

pub use achievements::{
    check_achievements, AchievementCondition, AchievementDef, AchievementReward, ACHIEVEMENTS,
};
pub use errors::GameError;
pub use events::{
    generate_random_event, tab_closed_reward, TabReward, MONSTER_LEVEL_WINDOW, MONSTER_WEIGHT,
    POWER_UP_WEIGHT, RIDDLE_WEIGHT, TREASURE_WEIGHT,
};
pub use progression::{
    add_achievement, add_buff, add_gold, add_xp, has_monster_protection, set_character_class,
    update_buffs, GoldAward, XpAward,
};
pub use quests::update_quest_progress;
pub use types::*;
