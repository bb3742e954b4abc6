//! Notification boundary.
//!
//! The engine describes what happened as a [`Notification`] and hands it to
//! a [`Notifier`]. Delivery is fire-and-forget: implementations log or
//! collect, and no failure ever reaches game state.

use log::info;

use crate::game::achievements::AchievementDef;
use crate::game::types::{Event, Monster, PowerUp, Quest, Riddle, Treasure};

const DEFAULT_ICON: &str = "images/icon-48.png";

/// A title/message/icon triple ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon: Option<String>,
}

impl Notification {
    fn basic(title: &str, message: String) -> Self {
        Self {
            title: title.to_string(),
            message,
            icon: None,
        }
    }

    pub fn xp_gained(amount: u64) -> Self {
        Self::basic("XP Gained!", format!("You gained {amount} XP!"))
    }

    pub fn gold_gained(amount: u64) -> Self {
        Self::basic("Gold Found!", format!("You found {amount} gold!"))
    }

    pub fn level_up(level: u32) -> Self {
        Self::basic(
            "Level Up!",
            format!("Congratulations! You reached level {level}!"),
        )
    }

    pub fn monster(monster: &Monster) -> Self {
        Self {
            title: "Monster Encounter!".to_string(),
            message: format!(
                "You encountered a {}! Defeat it to earn {} XP and {} gold.",
                monster.name, monster.xp, monster.gold
            ),
            icon: Some(monster.icon.clone()),
        }
    }

    pub fn treasure(treasure: &Treasure) -> Self {
        Self {
            title: "Treasure Found!".to_string(),
            message: format!(
                "You found a {}! You gained {} XP and {} gold.",
                treasure.name, treasure.xp, treasure.gold
            ),
            icon: Some(treasure.icon.clone()),
        }
    }

    pub fn riddle(riddle: &Riddle) -> Self {
        Self::basic(
            "Riddle Challenge!",
            format!("Solve this riddle: {}", riddle.question),
        )
    }

    pub fn power_up(power_up: &PowerUp) -> Self {
        Self {
            title: "Power-Up Activated!".to_string(),
            message: power_up.description.clone(),
            icon: Some(power_up.icon.clone()),
        }
    }

    pub fn event(event: &Event) -> Self {
        Self {
            title: "New Event!".to_string(),
            message: event.message.clone(),
            icon: event.icon().map(str::to_string),
        }
    }

    pub fn event_completed(event: &Event) -> Self {
        Self {
            title: "Event Completed!".to_string(),
            message: format!("You completed: {}", event.message),
            icon: event.icon().map(str::to_string),
        }
    }

    pub fn quest_completed(quest: &Quest) -> Self {
        Self::basic(
            "Quest Complete!",
            format!(
                "You've completed \"{}\"! Rewards: {} XP and {} gold!",
                quest.name, quest.reward.xp, quest.reward.gold
            ),
        )
    }

    pub fn tab_closed(xp: u64, gold: u64) -> Self {
        Self::basic(
            "Tab Closed",
            format!("Tab closed! You earned {xp} XP and {gold} gold."),
        )
    }

    pub fn achievement(def: &AchievementDef) -> Self {
        let mut message = format!("You've earned the \"{}\" achievement!", def.title);
        if def.reward.xp > 0 || def.reward.gold > 0 {
            message.push_str(&format!(
                " Rewards: {} XP and {} gold.",
                def.reward.xp, def.reward.gold
            ));
        }
        Self::basic("Achievement Unlocked!", message)
    }

    /// Icon to render, falling back to the extension default.
    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }
}

/// Sink for notifications. Implementations must not fail loudly; whatever
/// goes wrong stays on their side of the boundary.
pub trait Notifier {
    fn notify(&mut self, note: Notification);
}

/// Writes every notification to the log. The default sink for the CLI.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, note: Notification) {
        info!("{} {}", note.title, note.message);
    }
}

/// Collects notifications in memory. Used by tests to assert on what the
/// engine announced.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notes: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.notes.iter().map(|n| n.title.as_str()).collect()
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.notes.iter().any(|n| n.title == title)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, note: Notification) {
        self.notes.push(note);
    }
}
