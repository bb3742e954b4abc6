//! Binary entrypoint for the TabQuest CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and a fresh player profile
//! - `status [--json]` - print the current profile
//! - `open|focus|close <tab>` - feed tab lifecycle stimuli to the engine
//! - `event` - force a random event
//! - `resolve [--answer <text>]` - resolve the pending event
//! - `class [<name>]` - list classes or pick one
//! - `quests` / `achievements` - show progress
//! - `export` / `import <file>` - move the profile as JSON
//! - `reset --yes` - wipe everything and start over
//!
//! See the library crate docs for module-level details: `tabquest::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;

use tabquest::config::Config;
use tabquest::engine::{GameEngine, ResolveOutcome};
use tabquest::game::achievements::ACHIEVEMENTS;
use tabquest::game::types::{CharacterClass, EventKind, Player};
use tabquest::notify::LogNotifier;
use tabquest::storage::TabQuestStore;

#[derive(Parser)]
#[command(name = "tabquest")]
#[command(about = "An RPG progression engine for your tab habits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and a fresh player profile
    Init,
    /// Show the player profile
    Status {
        /// Print the raw profile as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report a tab being opened
    Open {
        /// Tab identifier
        tab: u32,
    },
    /// Report a tab coming into focus
    Focus {
        /// Tab identifier
        tab: u32,
    },
    /// Report a tab being closed
    Close {
        /// Tab identifier
        tab: u32,
    },
    /// Force a random event to appear
    Event,
    /// Resolve the pending event
    Resolve {
        /// Riddle answer, when the pending event asks for one
        #[arg(short, long)]
        answer: Option<String>,
    },
    /// List character classes, or pick one by name
    Class {
        /// warrior, mage, or rogue
        name: Option<String>,
    },
    /// List quests and their progress
    Quests,
    /// List achievements
    Achievements,
    /// Print the profile as JSON
    Export,
    /// Replace the profile with a JSON export
    Import {
        /// Path to a JSON file produced by `export`
        file: String,
    },
    /// Delete all progress and start a fresh profile
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes the default)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).ok(),
    };
    init_logging(&pre_config, cli.verbose);

    if let Commands::Init = cli.command {
        return cmd_init(&cli.config);
    }

    let config = pre_config.ok_or_else(|| {
        anyhow!(
            "No usable config at {}. Run `tabquest init` first.",
            cli.config
        )
    })?;
    let mut engine = open_engine(&config)?;

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Status { json } => cmd_status(&mut engine, json),
        Commands::Open { tab } => {
            match engine.handle_tab_opened(tab)? {
                Some(event) => println!("{}", event.message),
                None => println!("Tab {tab} opened."),
            }
            Ok(())
        }
        Commands::Focus { tab } => {
            match engine.handle_tab_focused(tab)? {
                Some(event) => println!("{}", event.message),
                None => println!("Tab {tab} focused."),
            }
            Ok(())
        }
        Commands::Close { tab } => cmd_close(&mut engine, tab),
        Commands::Event => {
            let event = engine.force_event()?;
            println!("{}", event.message);
            if event.kind() == EventKind::Riddle {
                println!("Answer with: tabquest resolve --answer \"...\"");
            }
            Ok(())
        }
        Commands::Resolve { answer } => cmd_resolve(&mut engine, answer.as_deref()),
        Commands::Class { name } => cmd_class(&mut engine, name.as_deref()),
        Commands::Quests => cmd_quests(&mut engine),
        Commands::Achievements => cmd_achievements(&mut engine),
        Commands::Export => {
            let player = engine.init_profile()?;
            println!("{}", serde_json::to_string_pretty(&player)?);
            Ok(())
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| anyhow!("Failed to read {}: {}", file, e))?;
            let player: Player = serde_json::from_str(&text)
                .map_err(|e| anyhow!("{} is not a valid profile export: {}", file, e))?;
            engine.replace_player(player)?;
            println!("Profile imported from {file}.");
            Ok(())
        }
        Commands::Reset { yes } => {
            if !yes {
                println!("This deletes all progress. Re-run with --yes to confirm.");
                return Ok(());
            }
            engine.reset()?;
            println!("Profile reset. A fresh adventurer awaits.");
            Ok(())
        }
    }
}

fn open_engine(config: &Config) -> Result<GameEngine<LogNotifier>> {
    let store = TabQuestStore::open(&config.storage.data_dir)?;
    Ok(GameEngine::new(
        store,
        LogNotifier,
        config.game_settings(),
    ))
}

fn cmd_init(config_path: &str) -> Result<()> {
    if std::path::Path::new(config_path).exists() {
        println!("Config already exists at {config_path}, leaving it untouched.");
    } else {
        Config::create_default(config_path)?;
        println!("Created {config_path} with default settings.");
    }
    let config = Config::load(config_path)?;
    let mut engine = open_engine(&config)?;
    let player = engine.init_profile()?;
    info!("initialized profile at {}", config.storage.data_dir);
    println!(
        "Profile ready: level {}, {} starter quests.",
        player.level,
        player.quests.len()
    );
    if engine.needs_class_selection()? {
        println!("Pick a class with: tabquest class <warrior|mage|rogue>");
    }
    Ok(())
}

fn cmd_status(engine: &mut GameEngine<LogNotifier>, json: bool) -> Result<()> {
    let player = engine.init_profile()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&player)?);
        return Ok(());
    }

    let class = player
        .character_class
        .map(|c| c.name())
        .unwrap_or("unclassed");
    println!("TabQuest — level {} {}", player.level, class);
    println!(
        "  XP:   {} / {} ({} to next level)",
        player.xp,
        tabquest::game::types::xp_for_next_level(player.level),
        player.xp_to_next_level()
    );
    println!("  Gold: {}", player.gold);

    let now = chrono::Utc::now();
    for buff in player.buffs.iter().filter(|b| b.is_active(now)) {
        println!(
            "  Buff: {} ({}s left)",
            buff.name,
            buff.remaining_secs(now)
        );
    }

    let done = player.quests.iter().filter(|q| q.completed).count();
    println!("  Quests: {done}/{} complete", player.quests.len());
    println!(
        "  Achievements: {}/{}",
        player.achievements.len(),
        ACHIEVEMENTS.len()
    );
    println!("  Open tabs: {}", engine.store().tab_count());

    if let Some(event) = engine.current_event()? {
        println!("  Pending event: {}", event.message);
    }
    if engine.needs_class_selection()? {
        println!("  Pick a class with: tabquest class <warrior|mage|rogue>");
    }
    Ok(())
}

fn cmd_close(engine: &mut GameEngine<LogNotifier>, tab: u32) -> Result<()> {
    let outcome = engine.handle_tab_closed(tab)?;
    if !outcome.rewarded {
        println!(
            "Tab {tab} closed after {}s — no reward for quick closes.",
            outcome.duration_secs
        );
        return Ok(());
    }
    println!(
        "Tab {tab} closed after {}s: +{} XP, +{} gold.",
        outcome.duration_secs, outcome.xp_gained, outcome.gold_gained
    );
    report_progress(
        outcome.leveled_up,
        &outcome.completed_quests,
        &outcome.unlocked_achievements,
        engine,
    )
}

fn cmd_resolve(engine: &mut GameEngine<LogNotifier>, answer: Option<&str>) -> Result<()> {
    use tabquest::game::GameError;
    let outcome = match engine.resolve_event(answer) {
        Ok(outcome) => outcome,
        Err(GameError::NoActiveEvent) => {
            println!("Nothing to resolve right now.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    print_resolution(engine, &outcome)
}

fn print_resolution(
    engine: &mut GameEngine<LogNotifier>,
    outcome: &ResolveOutcome,
) -> Result<()> {
    if !outcome.resolved {
        println!("Not quite — the riddle still waits for the right answer.");
        return Ok(());
    }
    if outcome.protected {
        println!("Your shield shimmers; the monster slinks away unfought.");
    } else if let Some(buff) = &outcome.granted_buff {
        println!("{} is now active.", buff.name);
    } else {
        println!(
            "Resolved: +{} XP, +{} gold.",
            outcome.xp_gained, outcome.gold_gained
        );
    }
    report_progress(
        outcome.leveled_up,
        &outcome.completed_quests,
        &outcome.unlocked_achievements,
        engine,
    )
}

fn report_progress(
    leveled_up: bool,
    completed_quests: &[tabquest::game::types::Quest],
    unlocked: &[&'static tabquest::game::achievements::AchievementDef],
    engine: &mut GameEngine<LogNotifier>,
) -> Result<()> {
    if leveled_up {
        let player = engine.init_profile()?;
        println!("Level up! You are now level {}.", player.level);
    }
    for quest in completed_quests {
        println!(
            "Quest complete: {} (+{} XP, +{} gold)",
            quest.name, quest.reward.xp, quest.reward.gold
        );
    }
    for def in unlocked {
        println!("Achievement unlocked: {}", def.title);
    }
    Ok(())
}

fn cmd_class(engine: &mut GameEngine<LogNotifier>, name: Option<&str>) -> Result<()> {
    match name {
        None => {
            for class in CharacterClass::ALL {
                println!("{:8} — {}", class.name(), class.description());
            }
            Ok(())
        }
        Some(name) => {
            if engine.set_character_class(name)? {
                println!("You are now a {name}.");
            } else {
                println!("Unknown class '{name}'. Choose warrior, mage, or rogue.");
            }
            Ok(())
        }
    }
}

fn cmd_quests(engine: &mut GameEngine<LogNotifier>) -> Result<()> {
    let player = engine.init_profile()?;
    for quest in &player.quests {
        let mark = if quest.completed { "x" } else { " " };
        println!(
            "[{}] {} — {} ({}/{}, reward {} XP / {} gold)",
            mark, quest.name, quest.description, quest.progress, quest.goal,
            quest.reward.xp, quest.reward.gold
        );
    }
    Ok(())
}

fn cmd_achievements(engine: &mut GameEngine<LogNotifier>) -> Result<()> {
    let player = engine.init_profile()?;
    for def in ACHIEVEMENTS {
        match player.achievements.iter().find(|a| a.id == def.id) {
            Some(earned) => println!(
                "[x] {} — {} (earned {})",
                def.title,
                def.description,
                earned.completed_at.format("%Y-%m-%d")
            ),
            None => println!("[ ] {} — {}", def.title, def.description),
        }
    }
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    let opened = log_file.and_then(|file| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .ok()
    });
    if let Some(f) = opened {
        let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            writeln!(fmt, "{}", line)
        });
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
