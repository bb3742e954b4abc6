use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const PLAYER_SCHEMA_VERSION: u32 = 1;
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// XP required to advance from `level` to `level + 1`.
///
/// Exponential curve: `floor(100 * 1.5^(level-1))`, so 100 at level 1,
/// 150 at level 2, 506 at level 5.
pub fn xp_for_next_level(level: u32) -> u64 {
    let exponent = level.saturating_sub(1);
    (100.0 * 1.5_f64.powi(exponent as i32)).floor() as u64
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 3] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
    ];

    /// Case-insensitive lookup; `None` for unrecognized names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "warrior" => Some(CharacterClass::Warrior),
            "mage" => Some(CharacterClass::Mage),
            "rogue" => Some(CharacterClass::Rogue),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "warrior",
            CharacterClass::Mage => "mage",
            CharacterClass::Rogue => "rogue",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Battle-hardened tab slayer. Earns 10% bonus XP.",
            CharacterClass::Mage => "Scholar of the open web. Earns 20% bonus XP.",
            CharacterClass::Rogue => "Collector of shiny things. Earns 20% bonus gold.",
        }
    }

    pub fn xp_multiplier(&self) -> f64 {
        match self {
            CharacterClass::Warrior => 1.1,
            CharacterClass::Mage => 1.2,
            CharacterClass::Rogue => 1.0,
        }
    }

    pub fn gold_multiplier(&self) -> f64 {
        match self {
            CharacterClass::Warrior => 1.0,
            CharacterClass::Mage => 1.0,
            CharacterClass::Rogue => 1.2,
        }
    }
}

/// Category of a game stimulus. Quests and achievement conditions key off
/// these, so the engine reports every reward-relevant action under exactly
/// one kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    TabOpened,
    TabClosed,
    /// Minutes of accumulated tab-open time.
    TabTime,
    MonsterDefeated,
    TreasureFound,
    RiddleSolved,
    PowerUpUsed,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::TabOpened => "tabs opened",
            ActionKind::TabClosed => "tabs closed",
            ActionKind::TabTime => "minutes of tab time",
            ActionKind::MonsterDefeated => "monsters defeated",
            ActionKind::TreasureFound => "treasures found",
            ActionKind::RiddleSolved => "riddles solved",
            ActionKind::PowerUpUsed => "power-ups used",
        }
    }
}

/// What a buff does while active. Multiplier factors compose by product
/// with the class multiplier of the matching resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BuffEffect {
    XpMultiplier { factor: f64 },
    GoldMultiplier { factor: f64 },
    MonsterProtection,
}

impl BuffEffect {
    pub fn kind(&self) -> BuffKind {
        match self {
            BuffEffect::XpMultiplier { .. } => BuffKind::XpMultiplier,
            BuffEffect::GoldMultiplier { .. } => BuffKind::GoldMultiplier,
            BuffEffect::MonsterProtection => BuffKind::MonsterProtection,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    XpMultiplier,
    GoldMultiplier,
    MonsterProtection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Buff {
    pub id: String,
    pub name: String,
    pub effect: BuffEffect,
    pub expires_at: DateTime<Utc>,
}

impl Buff {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestItem {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QuestReward {
    pub xp: u64,
    pub gold: u64,
    #[serde(default)]
    pub item: Option<QuestItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Action category this quest counts.
    pub kind: ActionKind,
    pub goal: u64,
    pub progress: u64,
    pub reward: QuestReward,
    pub completed: bool,
    /// Raised only on the incomplete -> complete transition; the engine
    /// consumes it for one-time payout and notification, then clears it
    /// before the record is persisted.
    #[serde(default)]
    pub is_new: bool,
}

impl Quest {
    pub fn new(id: &str, name: &str, description: &str, kind: ActionKind, goal: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind,
            goal,
            progress: 0,
            reward: QuestReward::default(),
            completed: false,
            is_new: false,
        }
    }

    pub fn with_reward(mut self, xp: u64, gold: u64) -> Self {
        self.reward.xp = xp;
        self.reward.gold = gold;
        self
    }

    pub fn with_item(mut self, id: &str, name: &str, description: &str) -> Self {
        self.reward.item = Some(QuestItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }
}

/// An achievement the player has unlocked, stamped at unlock time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EarnedAchievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed_at: DateTime<Utc>,
}

/// Lifetime counters. Quest progress is capped and resets with the quest;
/// these only ever go up, which is what threshold achievements need.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlayerStats {
    pub tabs_opened: u64,
    pub tabs_closed: u64,
    pub tab_seconds: u64,
    pub monsters_defeated: u64,
    pub treasures_found: u64,
    pub riddles_solved: u64,
    pub power_ups_used: u64,
    pub events_resolved: u64,
}

impl PlayerStats {
    pub fn bump(&mut self, kind: ActionKind, amount: u64) {
        match kind {
            ActionKind::TabOpened => self.tabs_opened += amount,
            ActionKind::TabClosed => self.tabs_closed += amount,
            ActionKind::TabTime => self.tab_seconds += amount * 60,
            ActionKind::MonsterDefeated => self.monsters_defeated += amount,
            ActionKind::TreasureFound => self.treasures_found += amount,
            ActionKind::RiddleSolved => self.riddles_solved += amount,
            ActionKind::PowerUpUsed => self.power_ups_used += amount,
        }
    }

    /// Counter value for a kind, in the unit quests track it in.
    pub fn counter(&self, kind: ActionKind) -> u64 {
        match kind {
            ActionKind::TabOpened => self.tabs_opened,
            ActionKind::TabClosed => self.tabs_closed,
            ActionKind::TabTime => self.tab_seconds / 60,
            ActionKind::MonsterDefeated => self.monsters_defeated,
            ActionKind::TreasureFound => self.treasures_found,
            ActionKind::RiddleSolved => self.riddles_solved,
            ActionKind::PowerUpUsed => self.power_ups_used,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Monster {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub xp: u64,
    pub gold: u64,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Treasure {
    pub id: String,
    pub name: String,
    pub xp: u64,
    pub gold: u64,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Riddle {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub xp: u64,
    pub gold: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerUp {
    pub id: String,
    pub name: String,
    pub description: String,
    pub duration_secs: u64,
    pub effect: BuffEffect,
    pub icon: String,
}

impl PowerUp {
    /// Buff granted when this power-up is used at `now`.
    pub fn to_buff(&self, now: DateTime<Utc>) -> Buff {
        Buff {
            id: self.id.clone(),
            name: self.name.clone(),
            effect: self.effect.clone(),
            expires_at: now + Duration::seconds(self.duration_secs as i64),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Monster,
    Treasure,
    Riddle,
    PowerUp,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Monster => "monster",
            EventKind::Treasure => "treasure",
            EventKind::Riddle => "riddle",
            EventKind::PowerUp => "power-up",
        }
    }
}

/// Payload of a generated encounter, one variant per category. Each carries
/// an owned copy of the catalog entry so callers can never corrupt the
/// shared tables through it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum EventDetails {
    Monster(Monster),
    Treasure(Treasure),
    Riddle(Riddle),
    PowerUp(PowerUp),
}

impl EventDetails {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetails::Monster(_) => EventKind::Monster,
            EventDetails::Treasure(_) => EventKind::Treasure,
            EventDetails::Riddle(_) => EventKind::Riddle,
            EventDetails::PowerUp(_) => EventKind::PowerUp,
        }
    }
}

/// A pending encounter. Transient from the core's point of view; the store
/// keeps at most one serialized copy until it is resolved or replaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub details: EventDetails,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u32,
}

impl Event {
    pub fn new(details: EventDetails, message: String, now: DateTime<Utc>) -> Self {
        Self {
            details,
            message,
            created_at: now,
            schema_version: EVENT_SCHEMA_VERSION,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.details.kind()
    }

    pub fn icon(&self) -> Option<&str> {
        match &self.details {
            EventDetails::Monster(m) => Some(&m.icon),
            EventDetails::Treasure(t) => Some(&t.icon),
            EventDetails::Riddle(_) => None,
            EventDetails::PowerUp(p) => Some(&p.icon),
        }
    }
}

/// The sole stateful entity: the locally persisted player profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    /// Progress toward the next level; normalized to stay below
    /// `xp_for_next_level(level)`.
    pub xp: u64,
    pub level: u32,
    pub gold: u64,
    /// `None` until the player picks one.
    pub character_class: Option<CharacterClass>,
    /// Unique by id.
    #[serde(default)]
    pub quests: Vec<Quest>,
    /// Unique by id; only ever grows.
    #[serde(default)]
    pub achievements: Vec<EarnedAchievement>,
    /// Pruned lazily whenever XP or gold is added.
    #[serde(default)]
    pub buffs: Vec<Buff>,
    #[serde(default)]
    pub stats: PlayerStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u32,
}

impl Player {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            xp: 0,
            level: 1,
            gold: 0,
            character_class: None,
            quests: Vec::new(),
            achievements: Vec::new(),
            buffs: Vec::new(),
            stats: PlayerStats::default(),
            created_at: now,
            updated_at: now,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    pub fn has_quest(&self, id: &str) -> bool {
        self.quests.iter().any(|q| q.id == id)
    }

    /// XP still needed to reach the next level.
    pub fn xp_to_next_level(&self) -> u64 {
        xp_for_next_level(self.level).saturating_sub(self.xp)
    }
}
