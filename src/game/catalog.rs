//! Reward tables: the fixed monsters, treasures, riddles, power-ups, and
//! starter quests the generator and engine draw from.
//!
//! Tables are module data; every accessor builds owned records, so callers
//! get independent copies and can never mutate a shared template through a
//! returned value.

use crate::game::types::{ActionKind, BuffEffect, Monster, PowerUp, Quest, Riddle, Treasure};

pub fn monsters() -> Vec<Monster> {
    vec![
        Monster {
            id: "goblin".to_string(),
            name: "Goblin".to_string(),
            level: 1,
            xp: 10,
            gold: 5,
            icon: "goblin.png".to_string(),
        },
        Monster {
            id: "troll".to_string(),
            name: "Troll".to_string(),
            level: 3,
            xp: 25,
            gold: 15,
            icon: "troll.png".to_string(),
        },
        Monster {
            id: "dragon".to_string(),
            name: "Dragon".to_string(),
            level: 5,
            xp: 50,
            gold: 40,
            icon: "dragon.png".to_string(),
        },
        Monster {
            id: "virus".to_string(),
            name: "Computer Virus".to_string(),
            level: 2,
            xp: 15,
            gold: 10,
            icon: "virus.png".to_string(),
        },
        Monster {
            id: "popup".to_string(),
            name: "Evil Popup".to_string(),
            level: 1,
            xp: 8,
            gold: 4,
            icon: "popup.png".to_string(),
        },
    ]
}

pub fn treasures() -> Vec<Treasure> {
    vec![
        Treasure {
            id: "gold_pouch".to_string(),
            name: "Gold Pouch".to_string(),
            xp: 5,
            gold: 20,
            icon: "gold_pouch.png".to_string(),
        },
        Treasure {
            id: "scroll".to_string(),
            name: "Ancient Scroll".to_string(),
            xp: 15,
            gold: 10,
            icon: "scroll.png".to_string(),
        },
        Treasure {
            id: "gem".to_string(),
            name: "Valuable Gem".to_string(),
            xp: 10,
            gold: 50,
            icon: "gem.png".to_string(),
        },
        Treasure {
            id: "artifact".to_string(),
            name: "Strange Artifact".to_string(),
            xp: 30,
            gold: 30,
            icon: "artifact.png".to_string(),
        },
    ]
}

pub fn riddles() -> Vec<Riddle> {
    vec![
        Riddle {
            id: "riddle1".to_string(),
            question: "What has keys but no locks?".to_string(),
            answer: "A piano".to_string(),
            xp: 15,
            gold: 10,
        },
        Riddle {
            id: "riddle2".to_string(),
            question: "What can travel around the world while staying in a corner?".to_string(),
            answer: "A stamp".to_string(),
            xp: 15,
            gold: 10,
        },
        Riddle {
            id: "riddle3".to_string(),
            question: "What gets wetter and wetter the more it dries?".to_string(),
            answer: "A towel".to_string(),
            xp: 15,
            gold: 10,
        },
    ]
}

pub fn power_ups() -> Vec<PowerUp> {
    vec![
        PowerUp {
            id: "focus_potion".to_string(),
            name: "Focus Potion".to_string(),
            description: "Doubles XP gain for 5 minutes".to_string(),
            duration_secs: 300,
            effect: BuffEffect::XpMultiplier { factor: 2.0 },
            icon: "focus_potion.png".to_string(),
        },
        PowerUp {
            id: "lucky_charm".to_string(),
            name: "Lucky Charm".to_string(),
            description: "Doubles gold gain for 5 minutes".to_string(),
            duration_secs: 300,
            effect: BuffEffect::GoldMultiplier { factor: 2.0 },
            icon: "lucky_charm.png".to_string(),
        },
        PowerUp {
            id: "shield".to_string(),
            name: "Magic Shield".to_string(),
            description: "Protects from monsters for 5 minutes".to_string(),
            duration_secs: 300,
            effect: BuffEffect::MonsterProtection,
            icon: "shield.png".to_string(),
        },
    ]
}

/// Quests granted to every fresh profile.
pub fn starter_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "quest_tabs_10",
            "Tab Explorer",
            "Open 10 different tabs",
            ActionKind::TabOpened,
            10,
        )
        .with_reward(100, 50),
        Quest::new(
            "quest_tabs_50",
            "Tab Master",
            "Open 50 different tabs",
            ActionKind::TabOpened,
            50,
        )
        .with_reward(500, 250),
        Quest::new(
            "quest_time_60",
            "Focused Browsing",
            "Keep tabs open for a total of 60 minutes",
            ActionKind::TabTime,
            60,
        )
        .with_reward(200, 100),
        Quest::new(
            "quest_monsters_5",
            "Monster Hunter",
            "Defeat 5 monsters",
            ActionKind::MonsterDefeated,
            5,
        )
        .with_reward(150, 75),
        Quest::new(
            "treasure_hunter",
            "Treasure Hunter",
            "Find 10 treasures",
            ActionKind::TreasureFound,
            10,
        )
        .with_reward(120, 100)
        .with_item(
            "treasure_map",
            "Treasure Map",
            "Increases chances of finding treasure",
        ),
    ]
}
