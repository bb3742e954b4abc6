//! Player progression: XP/level/gold arithmetic, class selection, buff
//! bookkeeping, and achievement appending.
//!
//! Every mutating operation takes `now` explicitly so callers control the
//! clock. Expired buffs are pruned as a side effect of any XP or gold award,
//! which keeps the stored record tidy without a background sweep.

use chrono::{DateTime, Utc};
use log::debug;

use crate::game::achievements::AchievementDef;
use crate::game::types::{
    xp_for_next_level, Buff, BuffEffect, CharacterClass, EarnedAchievement, Player,
};

/// Outcome of an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    /// XP actually credited, after multipliers.
    pub xp_gained: u64,
    /// True if at least one level threshold was crossed.
    pub leveled_up: bool,
}

/// Outcome of a gold award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldAward {
    pub gold_gained: u64,
}

/// Award XP, applying the class multiplier and any active `xp_multiplier`
/// buffs, then normalize the level.
///
/// The credited amount is `round(amount * multiplier)`, unlike gold which
/// floors. Level-up runs as a loop, so one large award can cross several
/// thresholds.
pub fn add_xp(player: &mut Player, amount: u64, now: DateTime<Utc>) -> XpAward {
    update_buffs(player, now);
    let multiplier = xp_multiplier(player);
    let xp_gained = (amount as f64 * multiplier).round() as u64;
    player.xp += xp_gained;

    let mut leveled_up = false;
    while player.xp >= xp_for_next_level(player.level) {
        player.xp -= xp_for_next_level(player.level);
        player.level += 1;
        leveled_up = true;
        debug!("player reached level {}", player.level);
    }
    XpAward {
        xp_gained,
        leveled_up,
    }
}

/// Award gold, applying the class multiplier and any active
/// `gold_multiplier` buffs. Credits `floor(amount * multiplier)`.
pub fn add_gold(player: &mut Player, amount: u64, now: DateTime<Utc>) -> GoldAward {
    update_buffs(player, now);
    let multiplier = gold_multiplier(player);
    let gold_gained = (amount as f64 * multiplier).floor() as u64;
    player.gold += gold_gained;
    GoldAward { gold_gained }
}

/// Set the character class by name. Unrecognized names leave the player
/// untouched and return false. Re-selection is allowed.
pub fn set_character_class(player: &mut Player, name: &str) -> bool {
    match CharacterClass::parse(name) {
        Some(class) => {
            debug!("character class set to {}", class.name());
            player.character_class = Some(class);
            true
        }
        None => false,
    }
}

/// Grant a buff, replacing any existing buff of the same effect kind.
/// No stacking: the incoming buff wins outright, whatever the old expiry.
pub fn add_buff(player: &mut Player, buff: Buff) {
    let kind = buff.effect.kind();
    player.buffs.retain(|b| b.effect.kind() != kind);
    player.buffs.push(buff);
}

/// Drop every buff whose expiry has passed. Idempotent; safe to call at any
/// frequency, and invoked internally before every multiplier computation.
pub fn update_buffs(player: &mut Player, now: DateTime<Utc>) {
    player.buffs.retain(|b| b.is_active(now));
}

/// Record an unlocked achievement. Returns false without mutation when the
/// id is already present.
pub fn add_achievement(player: &mut Player, def: &AchievementDef, now: DateTime<Utc>) -> bool {
    if player.has_achievement(def.id) {
        return false;
    }
    player.achievements.push(EarnedAchievement {
        id: def.id.to_string(),
        title: def.title.to_string(),
        description: def.description.to_string(),
        completed_at: now,
    });
    true
}

/// True while a `monster_protection` buff is active.
pub fn has_monster_protection(player: &Player, now: DateTime<Utc>) -> bool {
    player
        .buffs
        .iter()
        .any(|b| b.effect == BuffEffect::MonsterProtection && b.is_active(now))
}

// Multiplier composition: class multiplier times the product of matching
// buff factors. Callers prune expired buffs first.

fn xp_multiplier(player: &Player) -> f64 {
    let class = player
        .character_class
        .map(|c| c.xp_multiplier())
        .unwrap_or(1.0);
    player
        .buffs
        .iter()
        .filter_map(|b| match &b.effect {
            BuffEffect::XpMultiplier { factor } => Some(*factor),
            _ => None,
        })
        .fold(class, |acc, factor| acc * factor)
}

fn gold_multiplier(player: &Player) -> f64 {
    let class = player
        .character_class
        .map(|c| c.gold_multiplier())
        .unwrap_or(1.0);
    player
        .buffs
        .iter()
        .filter_map(|b| match &b.effect {
            BuffEffect::GoldMultiplier { factor } => Some(*factor),
            _ => None,
        })
        .fold(class, |acc, factor| acc * factor)
}
