//! Game engine: the dispatcher that turns tab lifecycle stimuli and user
//! actions into progression updates.
//!
//! Every operation follows the same read-modify-write shape: load the
//! player record, run the pure core functions against it, persist, notify.
//! The engine owns the clock (`Utc::now`) and a seedable random source, so
//! a test can pin the seed and pre-date tab timestamps to get fully
//! deterministic flows.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::achievements::{check_achievements, AchievementDef};
use crate::game::catalog;
use crate::game::errors::GameError;
use crate::game::events::{generate_random_event, tab_closed_reward};
use crate::game::progression::{
    add_buff, add_gold, add_xp, has_monster_protection, set_character_class,
};
use crate::game::quests::update_quest_progress;
use crate::game::types::{ActionKind, Buff, Event, EventDetails, EventKind, Player, Quest};
use crate::notify::{Notification, Notifier};
use crate::storage::TabQuestStore;

/// Tunables for the dispatcher, normally sourced from the config file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSettings {
    /// Chance of an event appearing when a tab is opened.
    pub event_probability: f64,
    /// Chance of an event appearing when a tab is focused and none is
    /// pending.
    pub focus_event_probability: f64,
    /// Closes faster than this earn nothing at all.
    pub min_tab_secs: i64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            event_probability: 0.3,
            focus_event_probability: 0.05,
            min_tab_secs: 5,
        }
    }
}

/// What happened when a tab was closed.
#[derive(Debug, Clone)]
pub struct TabCloseOutcome {
    pub duration_secs: i64,
    /// False when the tab was unknown or closed before `min_tab_secs`.
    pub rewarded: bool,
    pub xp_gained: u64,
    pub gold_gained: u64,
    pub leveled_up: bool,
    pub completed_quests: Vec<Quest>,
    pub unlocked_achievements: Vec<&'static AchievementDef>,
}

impl TabCloseOutcome {
    fn unrewarded(duration_secs: i64) -> Self {
        Self {
            duration_secs,
            rewarded: false,
            xp_gained: 0,
            gold_gained: 0,
            leveled_up: false,
            completed_quests: Vec::new(),
            unlocked_achievements: Vec::new(),
        }
    }
}

/// What happened when the pending event was resolved.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub kind: EventKind,
    /// False only for a riddle answered wrongly (the event stays pending).
    pub resolved: bool,
    /// True when a protection buff dismissed a monster without a fight.
    pub protected: bool,
    pub xp_gained: u64,
    pub gold_gained: u64,
    pub leveled_up: bool,
    pub granted_buff: Option<Buff>,
    pub completed_quests: Vec<Quest>,
    pub unlocked_achievements: Vec<&'static AchievementDef>,
}

impl ResolveOutcome {
    fn pending(kind: EventKind) -> Self {
        Self {
            kind,
            resolved: false,
            protected: false,
            xp_gained: 0,
            gold_gained: 0,
            leveled_up: false,
            granted_buff: None,
            completed_quests: Vec::new(),
            unlocked_achievements: Vec::new(),
        }
    }
}

pub struct GameEngine<N: Notifier> {
    store: TabQuestStore,
    notifier: N,
    rng: StdRng,
    settings: GameSettings,
}

impl<N: Notifier> GameEngine<N> {
    pub fn new(store: TabQuestStore, notifier: N, settings: GameSettings) -> Self {
        Self {
            store,
            notifier,
            rng: StdRng::from_entropy(),
            settings,
        }
    }

    /// Like [`GameEngine::new`] but with a fixed random seed, for
    /// reproducible event generation.
    pub fn with_rng_seed(
        store: TabQuestStore,
        notifier: N,
        settings: GameSettings,
        seed: u64,
    ) -> Self {
        Self {
            store,
            notifier,
            rng: StdRng::seed_from_u64(seed),
            settings,
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &TabQuestStore {
        &self.store
    }

    /// Load the profile, creating and seeding a fresh one on first run.
    ///
    /// A fresh profile gets the starter quests and raises the
    /// needs-class-selection flag. An existing profile with an empty quest
    /// list is re-seeded, matching first-install behavior.
    pub fn init_profile(&mut self) -> Result<Player, GameError> {
        self.load_or_create_player(Utc::now())
    }

    /// The stored profile, if one exists.
    pub fn player(&self) -> Result<Option<Player>, GameError> {
        self.store.load_player()
    }

    /// The pending event, if any.
    pub fn current_event(&self) -> Result<Option<Event>, GameError> {
        self.store.load_current_event()
    }

    pub fn needs_class_selection(&self) -> Result<bool, GameError> {
        self.store.needs_class_selection()
    }

    /// A tab was opened: stamp it, advance open-count quests, and maybe
    /// spawn an event. Returns the event if one appeared.
    pub fn handle_tab_opened(&mut self, tab_id: u32) -> Result<Option<Event>, GameError> {
        let now = Utc::now();
        self.store.touch_tab(tab_id, now)?;

        let mut player = self.load_or_create_player(now)?;
        player.stats.bump(ActionKind::TabOpened, 1);
        player.quests = update_quest_progress(&player.quests, ActionKind::TabOpened, 1);
        let (completed, leveled) = self.settle_completed_quests(&mut player, now);
        if leveled {
            self.notifier.notify(Notification::level_up(player.level));
        }
        let tab_opened_count = player.stats.counter(ActionKind::TabOpened);
        let mut unlocked = check_achievements(
            &mut player,
            ActionKind::TabOpened,
            tab_opened_count,
            now,
        );
        for def in unlocked.drain(..) {
            self.notifier.notify(Notification::achievement(def));
        }
        debug!(
            "tab {} opened ({} quests completed)",
            tab_id,
            completed.len()
        );

        let event = self.maybe_spawn_event(&player, self.settings.event_probability, now)?;
        self.persist(&mut player, now)?;
        Ok(event)
    }

    /// A tab came into focus: refresh its stamp and, if nothing is pending,
    /// roll the smaller event chance.
    pub fn handle_tab_focused(&mut self, tab_id: u32) -> Result<Option<Event>, GameError> {
        let now = Utc::now();
        self.store.touch_tab(tab_id, now)?;
        let player = self.load_or_create_player(now)?;
        self.maybe_spawn_event(&player, self.settings.focus_event_probability, now)
    }

    /// A tab finished loading: refresh its stamp only.
    pub fn handle_tab_loaded(&mut self, tab_id: u32) -> Result<(), GameError> {
        self.store.touch_tab(tab_id, Utc::now())
    }

    /// A tab was closed: convert its open duration into rewards.
    ///
    /// Unknown tabs and closes under `min_tab_secs` are ignored entirely
    /// (no reward, no counters), so rapid open/close cycles earn nothing.
    pub fn handle_tab_closed(&mut self, tab_id: u32) -> Result<TabCloseOutcome, GameError> {
        let now = Utc::now();
        let Some(opened_at) = self.store.remove_tab(tab_id)? else {
            debug!("tab {} closed without a stored timestamp", tab_id);
            return Ok(TabCloseOutcome::unrewarded(0));
        };
        let duration_secs = (now - opened_at).num_seconds();
        if duration_secs < self.settings.min_tab_secs {
            debug!("tab {} closed after {}s, below minimum", tab_id, duration_secs);
            return Ok(TabCloseOutcome::unrewarded(duration_secs));
        }

        let mut player = self.load_or_create_player(now)?;
        let reward = tab_closed_reward(duration_secs);
        let xp = add_xp(&mut player, reward.xp, now);
        let gold = add_gold(&mut player, reward.gold, now);

        player.stats.tabs_closed += 1;
        player.stats.tab_seconds += duration_secs as u64;
        let minutes = (duration_secs / 60) as u64;

        let mut quests = update_quest_progress(&player.quests, ActionKind::TabClosed, 1);
        if minutes > 0 {
            quests = update_quest_progress(&quests, ActionKind::TabTime, minutes);
        }
        player.quests = quests;

        self.notifier
            .notify(Notification::tab_closed(xp.xp_gained, gold.gold_gained));
        let (completed_quests, quest_leveled) = self.settle_completed_quests(&mut player, now);
        let leveled_up = xp.leveled_up || quest_leveled;
        if leveled_up {
            self.notifier.notify(Notification::level_up(player.level));
        }

        let tab_closed_count = player.stats.counter(ActionKind::TabClosed);
        let mut unlocked = check_achievements(
            &mut player,
            ActionKind::TabClosed,
            tab_closed_count,
            now,
        );
        let tab_time_count = player.stats.counter(ActionKind::TabTime);
        unlocked.extend(check_achievements(
            &mut player,
            ActionKind::TabTime,
            tab_time_count,
            now,
        ));
        for def in &unlocked {
            self.notifier.notify(Notification::achievement(def));
        }

        self.persist(&mut player, now)?;
        Ok(TabCloseOutcome {
            duration_secs,
            rewarded: true,
            xp_gained: xp.xp_gained,
            gold_gained: gold.gold_gained,
            leveled_up,
            completed_quests,
            unlocked_achievements: unlocked,
        })
    }

    /// Generate and persist an event right now, replacing any pending one.
    pub fn force_event(&mut self) -> Result<Event, GameError> {
        let now = Utc::now();
        let player = self.load_or_create_player(now)?;
        let event = generate_random_event(player.level, now, &mut self.rng);
        self.store.save_current_event(&event)?;
        self.notifier.notify(Notification::event(&event));
        Ok(event)
    }

    /// Resolve the pending event.
    ///
    /// Monsters pay out unless a protection buff dismisses them first;
    /// treasures always pay; riddles need a correct `answer` and stay
    /// pending otherwise; power-ups grant their buff. Completion advances
    /// matching quests, pays quest rewards once, and re-scans achievements.
    pub fn resolve_event(&mut self, answer: Option<&str>) -> Result<ResolveOutcome, GameError> {
        let now = Utc::now();
        let Some(event) = self.store.load_current_event()? else {
            return Err(GameError::NoActiveEvent);
        };

        let mut player = self.load_or_create_player(now)?;
        let mut outcome = ResolveOutcome::pending(event.kind());
        let mut action: Option<ActionKind> = None;

        match &event.details {
            EventDetails::Monster(monster) => {
                if has_monster_protection(&player, now) {
                    debug!("protection buff dismissed {}", monster.name);
                    outcome.protected = true;
                } else {
                    let xp = add_xp(&mut player, monster.xp, now);
                    let gold = add_gold(&mut player, monster.gold, now);
                    outcome.xp_gained = xp.xp_gained;
                    outcome.gold_gained = gold.gold_gained;
                    outcome.leveled_up = xp.leveled_up;
                    player.stats.bump(ActionKind::MonsterDefeated, 1);
                    action = Some(ActionKind::MonsterDefeated);
                }
            }
            EventDetails::Treasure(treasure) => {
                let xp = add_xp(&mut player, treasure.xp, now);
                let gold = add_gold(&mut player, treasure.gold, now);
                outcome.xp_gained = xp.xp_gained;
                outcome.gold_gained = gold.gold_gained;
                outcome.leveled_up = xp.leveled_up;
                player.stats.bump(ActionKind::TreasureFound, 1);
                action = Some(ActionKind::TreasureFound);
            }
            EventDetails::Riddle(riddle) => {
                let correct = answer
                    .map(|a| answers_match(a, &riddle.answer))
                    .unwrap_or(false);
                if !correct {
                    // Wrong or missing answer: the riddle stays pending.
                    return Ok(outcome);
                }
                let xp = add_xp(&mut player, riddle.xp, now);
                let gold = add_gold(&mut player, riddle.gold, now);
                outcome.xp_gained = xp.xp_gained;
                outcome.gold_gained = gold.gold_gained;
                outcome.leveled_up = xp.leveled_up;
                player.stats.bump(ActionKind::RiddleSolved, 1);
                action = Some(ActionKind::RiddleSolved);
            }
            EventDetails::PowerUp(power_up) => {
                let buff = power_up.to_buff(now);
                add_buff(&mut player, buff.clone());
                self.notifier.notify(Notification::power_up(power_up));
                outcome.granted_buff = Some(buff);
                player.stats.bump(ActionKind::PowerUpUsed, 1);
                action = Some(ActionKind::PowerUpUsed);
            }
        }

        outcome.resolved = true;
        player.stats.events_resolved += 1;

        if let Some(kind) = action {
            player.quests = update_quest_progress(&player.quests, kind, 1);
        }
        let (completed_quests, quest_leveled) = self.settle_completed_quests(&mut player, now);
        outcome.leveled_up = outcome.leveled_up || quest_leveled;
        outcome.completed_quests = completed_quests;
        if outcome.leveled_up {
            self.notifier.notify(Notification::level_up(player.level));
        }

        if let Some(kind) = action {
            let count = player.stats.counter(kind);
            let unlocked = check_achievements(&mut player, kind, count, now);
            for def in &unlocked {
                self.notifier.notify(Notification::achievement(def));
            }
            outcome.unlocked_achievements = unlocked;
        }

        self.store.clear_current_event()?;
        self.notifier.notify(Notification::event_completed(&event));
        self.persist(&mut player, now)?;
        Ok(outcome)
    }

    /// Pick (or change) the character class. Clears the selection flag on
    /// success; unknown names change nothing.
    pub fn set_character_class(&mut self, name: &str) -> Result<bool, GameError> {
        let now = Utc::now();
        let mut player = self.load_or_create_player(now)?;
        if !set_character_class(&mut player, name) {
            return Ok(false);
        }
        self.store.set_needs_class_selection(false)?;
        self.persist(&mut player, now)?;
        Ok(true)
    }

    /// Append a quest to the player's log. Ids are unique; a duplicate is
    /// rejected.
    pub fn add_quest(&mut self, quest: Quest) -> Result<bool, GameError> {
        let now = Utc::now();
        let mut player = self.load_or_create_player(now)?;
        if player.has_quest(&quest.id) {
            return Ok(false);
        }
        player.quests.push(quest);
        self.persist(&mut player, now)?;
        Ok(true)
    }

    /// Overwrite the stored profile with an imported one.
    pub fn replace_player(&mut self, player: Player) -> Result<(), GameError> {
        let mut player = player;
        self.persist(&mut player, Utc::now())
    }

    /// Wipe everything and start a fresh profile.
    pub fn reset(&mut self) -> Result<Player, GameError> {
        let now = Utc::now();
        self.store.clear()?;
        let mut player = Player::new(now);
        player.quests = catalog::starter_quests();
        self.store.set_needs_class_selection(true)?;
        self.persist(&mut player, now)?;
        Ok(player)
    }

    fn load_or_create_player(&mut self, now: DateTime<Utc>) -> Result<Player, GameError> {
        match self.store.load_player()? {
            Some(mut player) => {
                if player.quests.is_empty() {
                    player.quests = catalog::starter_quests();
                    self.persist(&mut player, now)?;
                }
                Ok(player)
            }
            None => {
                let mut player = Player::new(now);
                player.quests = catalog::starter_quests();
                self.store.set_needs_class_selection(true)?;
                self.persist(&mut player, now)?;
                debug!("created fresh player profile");
                Ok(player)
            }
        }
    }

    /// Roll for a spontaneous event. Never replaces a pending one.
    fn maybe_spawn_event(
        &mut self,
        player: &Player,
        probability: f64,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, GameError> {
        if self.store.load_current_event()?.is_some() {
            return Ok(None);
        }
        if self.rng.gen::<f64>() >= probability {
            return Ok(None);
        }
        let event = generate_random_event(player.level, now, &mut self.rng);
        self.store.save_current_event(&event)?;
        self.notifier.notify(Notification::event(&event));
        Ok(Some(event))
    }

    /// Pay and announce every quest that just crossed its goal, then lower
    /// the transient flags so payout can never run twice.
    fn settle_completed_quests(
        &mut self,
        player: &mut Player,
        now: DateTime<Utc>,
    ) -> (Vec<Quest>, bool) {
        let mut completed = Vec::new();
        let mut leveled = false;
        let fresh: Vec<usize> = player
            .quests
            .iter()
            .enumerate()
            .filter(|(_, q)| q.is_new)
            .map(|(i, _)| i)
            .collect();
        for index in fresh {
            let quest = player.quests[index].clone();
            let award = add_xp(player, quest.reward.xp, now);
            leveled |= award.leveled_up;
            add_gold(player, quest.reward.gold, now);
            self.notifier.notify(Notification::quest_completed(&quest));
            player.quests[index].is_new = false;
            completed.push(player.quests[index].clone());
        }
        (completed, leveled)
    }

    fn persist(&mut self, player: &mut Player, now: DateTime<Utc>) -> Result<(), GameError> {
        player.updated_at = now;
        if let Err(err) = self.store.save_player(player) {
            warn!("failed to persist player: {err}");
            return Err(err);
        }
        Ok(())
    }
}

/// Riddle answers compare loosely: case-insensitive, surrounding whitespace
/// ignored, and a leading article ("a piano" vs "piano") does not count
/// against the player.
fn answers_match(given: &str, expected: &str) -> bool {
    normalize_answer(given) == normalize_answer(expected)
}

fn normalize_answer(answer: &str) -> String {
    let lowered = answer.trim().to_lowercase();
    for article in ["a ", "an ", "the "] {
        if let Some(rest) = lowered.strip_prefix(article) {
            return rest.trim().to_string();
        }
    }
    lowered
}
