//! # TabQuest - RPG Progression Engine for Tab Habits
//!
//! TabQuest turns mundane browsing into a small role-playing game: opening,
//! closing, and switching tabs triggers randomized encounters (monsters,
//! treasure, riddles, power-ups) that feed an XP/level/gold progression,
//! quests, and achievements on a locally persisted player profile.
//!
//! ## Features
//!
//! - **Pure Game Core**: XP curve, class and buff multipliers, weighted
//!   event generation, quest tracking, and achievement evaluation as plain
//!   functions over plain records; the clock and RNG are always injected.
//! - **Embedded Persistence**: Sled-backed store holding one player record,
//!   at most one pending event, and per-tab open timestamps.
//! - **Dispatcher Engine**: A synchronous engine translating tab lifecycle
//!   stimuli into load-mutate-persist-notify flows.
//! - **Pluggable Notifications**: A small trait boundary so the CLI logs
//!   while tests record.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabquest::engine::{GameEngine, GameSettings};
//! use tabquest::notify::LogNotifier;
//! use tabquest::storage::TabQuestStore;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = TabQuestStore::open("data/tabquest")?;
//!     let mut engine = GameEngine::new(store, LogNotifier, GameSettings::default());
//!     engine.init_profile()?;
//!     engine.handle_tab_opened(1)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Reward tables, event generator, progression arithmetic,
//!   quest and achievement logic
//! - [`engine`] - The dispatcher tying the core to storage and notifications
//! - [`storage`] - Sled-backed persistence layer
//! - [`notify`] - Notification boundary and implementations
//! - [`config`] - Configuration management and validation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Game Engine   │ ← Dispatcher: stimuli in, deltas out
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Game Core     │ ← Pure progression/reward logic
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   Storage       │ ← Player, event, and tab records
//! │   Layer         │
//! └─────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod game;
pub mod notify;
pub mod storage;
