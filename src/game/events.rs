//! Random encounter generation and the tab-close reward curve.
//!
//! Category selection partitions [0,1) into four fixed bands (monster 40%,
//! treasure 30%, riddle 15%, power-up 15%). Monsters are additionally
//! filtered to the player's level neighborhood; an empty eligible set falls
//! back to treasure or riddle so the generator always produces an event.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::game::catalog;
use crate::game::types::{Event, EventDetails, Monster};

pub const MONSTER_WEIGHT: f64 = 0.40;
pub const TREASURE_WEIGHT: f64 = 0.30;
pub const RIDDLE_WEIGHT: f64 = 0.15;
pub const POWER_UP_WEIGHT: f64 = 0.15;

/// Monsters are eligible when their level is within this many levels of the
/// player's.
pub const MONSTER_LEVEL_WINDOW: u32 = 2;

/// Base reward for closing any tab, regardless of how long it was open.
pub const BASE_TAB_XP: u64 = 5;
pub const BASE_TAB_GOLD: u64 = 2;

/// Generate a random encounter for a player at `player_level`.
///
/// Pure apart from the supplied random source: no catalog state is touched
/// and the returned payload is an owned copy. Never fails, even when no
/// monster matches the player's level.
pub fn generate_random_event(
    player_level: u32,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Event {
    let roll: f64 = rng.gen();

    if roll < MONSTER_WEIGHT {
        let mut eligible: Vec<Monster> = catalog::monsters()
            .into_iter()
            .filter(|m| m.level.abs_diff(player_level) <= MONSTER_LEVEL_WINDOW)
            .collect();
        if eligible.is_empty() {
            return fallback_event(now, rng);
        }
        let monster = eligible.swap_remove(rng.gen_range(0..eligible.len()));
        let message = format!("A {} appears!", monster.name);
        Event::new(EventDetails::Monster(monster), message, now)
    } else if roll < MONSTER_WEIGHT + TREASURE_WEIGHT {
        treasure_event(now, rng)
    } else if roll < MONSTER_WEIGHT + TREASURE_WEIGHT + RIDDLE_WEIGHT {
        riddle_event(now, rng)
    } else {
        power_up_event(now, rng)
    }
}

/// Stand-in when the level-filtered monster set is empty: 50/50 treasure or
/// riddle.
fn fallback_event(now: DateTime<Utc>, rng: &mut impl Rng) -> Event {
    if rng.gen::<f64>() < 0.5 {
        treasure_event(now, rng)
    } else {
        riddle_event(now, rng)
    }
}

fn treasure_event(now: DateTime<Utc>, rng: &mut impl Rng) -> Event {
    let mut treasures = catalog::treasures();
    let treasure = treasures.swap_remove(rng.gen_range(0..treasures.len()));
    let message = format!("You found {}!", treasure.name);
    Event::new(EventDetails::Treasure(treasure), message, now)
}

fn riddle_event(now: DateTime<Utc>, rng: &mut impl Rng) -> Event {
    let mut riddles = catalog::riddles();
    let riddle = riddles.swap_remove(rng.gen_range(0..riddles.len()));
    let message = format!("A mysterious riddle appears: {}", riddle.question);
    Event::new(EventDetails::Riddle(riddle), message, now)
}

fn power_up_event(now: DateTime<Utc>, rng: &mut impl Rng) -> Event {
    let mut power_ups = catalog::power_ups();
    let power_up = power_ups.swap_remove(rng.gen_range(0..power_ups.len()));
    let message = format!("You found {}!", power_up.name);
    Event::new(EventDetails::PowerUp(power_up), message, now)
}

/// Reward for a closed tab that was open for `duration_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabReward {
    pub xp: u64,
    pub gold: u64,
}

/// Convert elapsed open time (seconds) into a reward.
///
/// Negative durations clamp to zero. The base reward is always granted; on
/// top of it, each full minute adds 1 XP and each two full minutes add
/// 1 gold. Uncapped.
pub fn tab_closed_reward(duration_secs: i64) -> TabReward {
    let secs = duration_secs.max(0) as u64;
    let minutes = secs / 60;
    TabReward {
        xp: BASE_TAB_XP + minutes,
        gold: BASE_TAB_GOLD + minutes / 2,
    }
}
