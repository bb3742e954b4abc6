/// Integration tests for the tab lifecycle: opening tabs stamps and counts
/// them, closing converts open duration into XP and gold, and quick closes
/// earn nothing at all.
use chrono::{Duration, Utc};
use tabquest::engine::{GameEngine, GameSettings};
use tabquest::game::types::ActionKind;
use tabquest::notify::RecordingNotifier;
use tabquest::storage::TabQuestStore;
use tempfile::TempDir;

/// Settings with event rolls disabled, so tab flows are fully deterministic.
fn quiet_settings() -> GameSettings {
    GameSettings {
        event_probability: 0.0,
        focus_event_probability: 0.0,
        min_tab_secs: 5,
    }
}

fn setup_engine() -> (GameEngine<RecordingNotifier>, TempDir) {
    let temp = TempDir::new().expect("tempdir");
    let store = TabQuestStore::open(temp.path()).expect("open store");
    let engine = GameEngine::with_rng_seed(store, RecordingNotifier::new(), quiet_settings(), 7);
    (engine, temp)
}

#[test]
fn opening_a_tab_stamps_it_and_advances_open_quests() {
    let (mut engine, _temp) = setup_engine();

    let event = engine.handle_tab_opened(1).expect("open tab");
    assert!(event.is_none(), "no event should spawn at probability 0");

    assert_eq!(engine.store().tab_count(), 1);
    assert!(engine.store().get_tab(1).expect("get tab").is_some());

    let player = engine.player().expect("load").expect("player exists");
    assert_eq!(player.stats.tabs_opened, 1);

    let open_quest = player
        .quests
        .iter()
        .find(|q| q.id == "quest_tabs_10")
        .expect("starter quest present");
    assert_eq!(open_quest.progress, 1);
    assert!(!open_quest.completed);
}

#[test]
fn closing_a_quick_tab_earns_nothing() {
    let (mut engine, _temp) = setup_engine();

    engine.handle_tab_opened(1).expect("open tab");
    let outcome = engine.handle_tab_closed(1).expect("close tab");

    assert!(!outcome.rewarded, "closes under min_tab_secs pay nothing");
    assert_eq!(outcome.xp_gained, 0);
    assert_eq!(outcome.gold_gained, 0);

    let player = engine.player().expect("load").expect("player exists");
    assert_eq!(player.xp, 0);
    assert_eq!(player.stats.tabs_closed, 0, "quick closes do not count");
    assert!(
        !engine.notifier().contains_title("Tab Closed"),
        "no reward, no notification"
    );
}

#[test]
fn closing_an_unknown_tab_is_ignored() {
    let (mut engine, _temp) = setup_engine();
    engine.init_profile().expect("init");

    let outcome = engine.handle_tab_closed(99).expect("close unknown tab");
    assert!(!outcome.rewarded);
    assert_eq!(outcome.duration_secs, 0);
}

#[test]
fn ten_minute_tab_pays_base_plus_duration_bonus() {
    let (mut engine, _temp) = setup_engine();
    engine.init_profile().expect("init");

    // Pre-date the stamp so the close sees a ten minute duration.
    engine
        .store()
        .touch_tab(2, Utc::now() - Duration::seconds(600))
        .expect("touch tab");

    let outcome = engine.handle_tab_closed(2).expect("close tab");
    assert!(outcome.rewarded);
    assert!(outcome.duration_secs >= 600 && outcome.duration_secs < 605);
    // 5 base + 10 minutes, and 2 base + 10/2 minutes.
    assert_eq!(outcome.xp_gained, 15);
    assert_eq!(outcome.gold_gained, 7);
    assert!(!outcome.leveled_up);

    let player = engine.player().expect("load").expect("player exists");
    assert_eq!(player.xp, 15);
    assert_eq!(player.gold, 7);
    assert_eq!(player.stats.tabs_closed, 1);
    assert!(player.stats.tab_seconds >= 600);
    assert_eq!(player.stats.counter(ActionKind::TabTime), 10);

    let time_quest = player
        .quests
        .iter()
        .find(|q| q.id == "quest_time_60")
        .expect("time quest present");
    assert_eq!(time_quest.progress, 10, "close reports whole minutes");

    assert!(engine.notifier().contains_title("Tab Closed"));
    assert_eq!(
        engine.store().get_tab(2).expect("get tab"),
        None,
        "closed tab stamp is removed"
    );
}

#[test]
fn long_tab_close_can_level_up() {
    let (mut engine, _temp) = setup_engine();
    engine.init_profile().expect("init");

    // 100 minutes: 5 + 100 = 105 XP, past the 100 XP first threshold.
    engine
        .store()
        .touch_tab(3, Utc::now() - Duration::seconds(6000))
        .expect("touch tab");

    let outcome = engine.handle_tab_closed(3).expect("close tab");
    assert!(outcome.rewarded);
    assert_eq!(outcome.xp_gained, 105);
    assert_eq!(outcome.gold_gained, 52);
    assert!(outcome.leveled_up);

    let player = engine.player().expect("load").expect("player exists");
    assert_eq!(player.level, 2);
    assert_eq!(player.xp, 5, "leftover XP carries into the new level");
    assert!(engine.notifier().contains_title("Level Up!"));
}

#[test]
fn focus_and_load_refresh_the_stamp_without_counting_an_open() {
    let (mut engine, _temp) = setup_engine();
    engine.init_profile().expect("init");

    // Stale stamp, then a focus refreshes it to roughly now.
    engine
        .store()
        .touch_tab(4, Utc::now() - Duration::seconds(600))
        .expect("touch tab");
    engine.handle_tab_focused(4).expect("focus tab");

    let outcome = engine.handle_tab_closed(4).expect("close tab");
    assert!(
        !outcome.rewarded,
        "refreshed stamp means the close is a quick close"
    );

    let player = engine.player().expect("load").expect("player exists");
    assert_eq!(player.stats.tabs_opened, 0, "focus is not an open");

    engine.handle_tab_loaded(5).expect("load tab");
    assert_eq!(engine.store().tab_count(), 1, "load stamps the tab");
    let player = engine.player().expect("load").expect("player exists");
    assert_eq!(player.stats.tabs_opened, 0, "load is not an open either");
}
