/// Integration tests for event spawning and resolution: monsters, treasures,
/// riddles, and power-ups, plus the one-pending-event rule.
///
/// Tests plant a specific event through the store so each category can be
/// exercised without depending on the generator's random draw.
use chrono::{Duration, Utc};
use tabquest::engine::{GameEngine, GameSettings};
use tabquest::game::types::{
    Buff, BuffEffect, Event, EventDetails, EventKind, Monster, PowerUp, Riddle, Treasure,
};
use tabquest::game::GameError;
use tabquest::notify::RecordingNotifier;
use tabquest::storage::TabQuestStore;
use tempfile::TempDir;

fn settings(event_probability: f64) -> GameSettings {
    GameSettings {
        event_probability,
        focus_event_probability: event_probability,
        min_tab_secs: 5,
    }
}

fn setup_engine(event_probability: f64) -> (GameEngine<RecordingNotifier>, TempDir) {
    let temp = TempDir::new().expect("tempdir");
    let store = TabQuestStore::open(temp.path()).expect("open store");
    let engine = GameEngine::with_rng_seed(
        store,
        RecordingNotifier::new(),
        settings(event_probability),
        42,
    );
    (engine, temp)
}

fn plant_monster(engine: &GameEngine<RecordingNotifier>, xp: u64, gold: u64) {
    let monster = Monster {
        id: "goblin".to_string(),
        name: "Goblin".to_string(),
        level: 1,
        xp,
        gold,
        icon: "images/goblin.png".to_string(),
    };
    let event = Event::new(
        EventDetails::Monster(monster),
        "A Goblin appears!".to_string(),
        Utc::now(),
    );
    engine.store().save_current_event(&event).expect("plant");
}

fn plant_treasure(engine: &GameEngine<RecordingNotifier>, xp: u64, gold: u64) {
    let treasure = Treasure {
        id: "gem".to_string(),
        name: "Sparkling Gem".to_string(),
        xp,
        gold,
        icon: "images/gem.png".to_string(),
    };
    let event = Event::new(
        EventDetails::Treasure(treasure),
        "You found Sparkling Gem!".to_string(),
        Utc::now(),
    );
    engine.store().save_current_event(&event).expect("plant");
}

fn plant_riddle(engine: &GameEngine<RecordingNotifier>, answer: &str) {
    let riddle = Riddle {
        id: "keys".to_string(),
        question: "What has keys but can't open locks?".to_string(),
        answer: answer.to_string(),
        xp: 15,
        gold: 10,
    };
    let event = Event::new(
        EventDetails::Riddle(riddle),
        "A mysterious riddle appears: What has keys but can't open locks?".to_string(),
        Utc::now(),
    );
    engine.store().save_current_event(&event).expect("plant");
}

fn plant_power_up(engine: &GameEngine<RecordingNotifier>, effect: BuffEffect) {
    let power_up = PowerUp {
        id: "focus_potion".to_string(),
        name: "Focus Potion".to_string(),
        description: "Doubles XP for 5 minutes".to_string(),
        duration_secs: 300,
        effect,
        icon: "images/potion.png".to_string(),
    };
    let event = Event::new(
        EventDetails::PowerUp(power_up),
        "You found Focus Potion!".to_string(),
        Utc::now(),
    );
    engine.store().save_current_event(&event).expect("plant");
}

#[test]
fn defeating_a_monster_pays_its_reward() {
    let (mut engine, _temp) = setup_engine(0.0);
    engine.init_profile().expect("init");
    plant_monster(&engine, 10, 5);

    let outcome = engine.resolve_event(None).expect("resolve");
    assert!(outcome.resolved);
    assert_eq!(outcome.kind, EventKind::Monster);
    assert!(!outcome.protected);
    assert_eq!(outcome.xp_gained, 10);
    assert_eq!(outcome.gold_gained, 5);

    let player = engine.player().expect("load").expect("player");
    assert_eq!(player.xp, 10);
    assert_eq!(player.gold, 5);
    assert_eq!(player.stats.monsters_defeated, 1);
    assert_eq!(player.stats.events_resolved, 1);

    let monster_quest = player
        .quests
        .iter()
        .find(|q| q.id == "quest_monsters_5")
        .expect("starter quest present");
    assert_eq!(monster_quest.progress, 1);

    assert!(engine.current_event().expect("load event").is_none());
    assert!(engine.notifier().contains_title("Event Completed!"));
}

#[test]
fn protection_buff_dismisses_a_monster_without_reward() {
    let (mut engine, _temp) = setup_engine(0.0);
    let mut player = engine.init_profile().expect("init");
    player.buffs.push(Buff {
        id: "shield".to_string(),
        name: "Protective Shield".to_string(),
        effect: BuffEffect::MonsterProtection,
        expires_at: Utc::now() + Duration::seconds(300),
    });
    engine.replace_player(player).expect("replace");

    plant_monster(&engine, 10, 5);
    let outcome = engine.resolve_event(None).expect("resolve");

    assert!(outcome.resolved);
    assert!(outcome.protected);
    assert_eq!(outcome.xp_gained, 0);
    assert_eq!(outcome.gold_gained, 0);

    let player = engine.player().expect("load").expect("player");
    assert_eq!(player.xp, 0, "dismissal pays nothing");
    assert_eq!(player.stats.monsters_defeated, 0, "no kill is counted");
    assert_eq!(player.stats.events_resolved, 1, "the event is still spent");
    assert!(engine.current_event().expect("load event").is_none());
}

#[test]
fn finding_a_treasure_pays_its_reward() {
    let (mut engine, _temp) = setup_engine(0.0);
    engine.init_profile().expect("init");
    plant_treasure(&engine, 10, 50);

    let outcome = engine.resolve_event(None).expect("resolve");
    assert!(outcome.resolved);
    assert_eq!(outcome.kind, EventKind::Treasure);
    assert_eq!(outcome.xp_gained, 10);
    assert_eq!(outcome.gold_gained, 50);

    let player = engine.player().expect("load").expect("player");
    assert_eq!(player.stats.treasures_found, 1);
    let hunter_quest = player
        .quests
        .iter()
        .find(|q| q.id == "treasure_hunter")
        .expect("starter quest present");
    assert_eq!(hunter_quest.progress, 1);
}

#[test]
fn wrong_riddle_answer_keeps_the_event_pending() {
    let (mut engine, _temp) = setup_engine(0.0);
    engine.init_profile().expect("init");
    plant_riddle(&engine, "A piano");

    // No answer at all.
    let outcome = engine.resolve_event(None).expect("resolve without answer");
    assert!(!outcome.resolved);
    assert!(engine.current_event().expect("load").is_some());

    // Wrong answer.
    let outcome = engine.resolve_event(Some("guitar")).expect("resolve wrong");
    assert!(!outcome.resolved);
    assert!(engine.current_event().expect("load").is_some());

    let player = engine.player().expect("load").expect("player");
    assert_eq!(player.xp, 0);
    assert_eq!(player.stats.riddles_solved, 0);
    assert_eq!(player.stats.events_resolved, 0);
}

#[test]
fn riddle_answers_tolerate_case_whitespace_and_articles() {
    let (mut engine, _temp) = setup_engine(0.0);
    engine.init_profile().expect("init");
    plant_riddle(&engine, "A piano");

    let outcome = engine
        .resolve_event(Some("  THE PIANO "))
        .expect("resolve loose answer");
    assert!(outcome.resolved);
    assert_eq!(outcome.xp_gained, 15);
    assert_eq!(outcome.gold_gained, 10);

    let player = engine.player().expect("load").expect("player");
    assert_eq!(player.stats.riddles_solved, 1);
    assert!(engine.current_event().expect("load").is_none());
}

#[test]
fn power_up_grants_a_buff_that_boosts_later_rewards() {
    let (mut engine, _temp) = setup_engine(0.0);
    engine.init_profile().expect("init");
    plant_power_up(&engine, BuffEffect::XpMultiplier { factor: 2.0 });

    let outcome = engine.resolve_event(None).expect("resolve");
    assert!(outcome.resolved);
    assert_eq!(outcome.kind, EventKind::PowerUp);
    let buff = outcome.granted_buff.expect("buff granted");
    assert_eq!(buff.name, "Focus Potion");

    let player = engine.player().expect("load").expect("player");
    assert_eq!(player.buffs.len(), 1);
    assert_eq!(player.stats.power_ups_used, 1);
    assert!(engine.notifier().contains_title("Power-Up Activated!"));

    // A ten minute close normally pays 15 XP; the buff doubles it.
    engine
        .store()
        .touch_tab(1, Utc::now() - Duration::seconds(600))
        .expect("touch tab");
    let close = engine.handle_tab_closed(1).expect("close tab");
    assert_eq!(close.xp_gained, 30);
    assert_eq!(close.gold_gained, 7, "XP buff leaves gold alone");
}

#[test]
fn resolving_with_nothing_pending_is_an_error() {
    let (mut engine, _temp) = setup_engine(0.0);
    engine.init_profile().expect("init");

    let result = engine.resolve_event(None);
    assert!(matches!(result, Err(GameError::NoActiveEvent)));
}

#[test]
fn tab_open_always_spawns_an_event_at_probability_one() {
    let (mut engine, _temp) = setup_engine(1.0);

    let event = engine
        .handle_tab_opened(1)
        .expect("open tab")
        .expect("event spawns");
    let stored = engine
        .current_event()
        .expect("load event")
        .expect("event stored");
    assert_eq!(stored.message, event.message);
    assert!(engine.notifier().contains_title("New Event!"));
}

#[test]
fn tab_open_never_spawns_an_event_at_probability_zero() {
    let (mut engine, _temp) = setup_engine(0.0);

    for tab_id in 1..=20 {
        let event = engine.handle_tab_opened(tab_id).expect("open tab");
        assert!(event.is_none());
    }
    assert!(engine.current_event().expect("load event").is_none());
}

#[test]
fn spawn_roll_never_replaces_a_pending_event() {
    let (mut engine, _temp) = setup_engine(1.0);
    engine.init_profile().expect("init");
    plant_riddle(&engine, "A piano");

    let event = engine.handle_tab_opened(1).expect("open tab");
    assert!(event.is_none(), "pending event blocks new spawns");

    let stored = engine
        .current_event()
        .expect("load event")
        .expect("still pending");
    assert_eq!(stored.kind(), EventKind::Riddle);
}

#[test]
fn force_event_replaces_a_pending_event() {
    let (mut engine, _temp) = setup_engine(0.0);
    engine.init_profile().expect("init");
    plant_riddle(&engine, "A piano");

    let event = engine.force_event().expect("force event");
    let stored = engine
        .current_event()
        .expect("load event")
        .expect("event stored");
    assert_eq!(stored.message, event.message);
    assert!(engine.notifier().contains_title("New Event!"));
}

#[test]
fn focus_spawns_events_at_its_own_probability() {
    let (mut engine, _temp) = setup_engine(1.0);
    engine.init_profile().expect("init");

    let event = engine.handle_tab_focused(1).expect("focus tab");
    assert!(event.is_some(), "focus rolls its own event chance");
}
