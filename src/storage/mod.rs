//! Sled-backed persistence for the player profile, the pending event, and
//! per-tab open timestamps.
//!
//! The store treats every record as an opaque bincode blob: one player, at
//! most one current event, and one timestamp per live tab. Writes flush
//! eagerly; records carry schema versions that are checked on load.

use std::path::Path;

use chrono::{DateTime, Utc};
use sled::IVec;

use crate::game::errors::GameError;
use crate::game::types::{Event, Player, EVENT_SCHEMA_VERSION, PLAYER_SCHEMA_VERSION};

const TREE_PRIMARY: &str = "tabquest";
const TREE_EVENTS: &str = "tabquest_events";
const TREE_TABS: &str = "tabquest_tabs";

const PLAYER_KEY: &[u8] = b"player";
const NEEDS_CLASS_KEY: &[u8] = b"needs_class_selection";
const CURRENT_EVENT_KEY: &[u8] = b"current_event";

/// Sled-backed store for all TabQuest state.
pub struct TabQuestStore {
    _db: sled::Db,
    primary: sled::Tree,
    events: sled::Tree,
    tabs: sled::Tree,
}

impl TabQuestStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        let events = db.open_tree(TREE_EVENTS)?;
        let tabs = db.open_tree(TREE_TABS)?;
        Ok(Self {
            _db: db,
            primary,
            events,
            tabs,
        })
    }

    fn tab_key(tab_id: u32) -> Vec<u8> {
        tab_id.to_string().into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, GameError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Persist the player profile, stamping the current schema version.
    pub fn save_player(&self, player: &Player) -> Result<(), GameError> {
        let mut record = player.clone();
        record.schema_version = PLAYER_SCHEMA_VERSION;
        let bytes = Self::serialize(&record)?;
        self.primary.insert(PLAYER_KEY, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    /// Fetch the player profile, if one has been created.
    pub fn load_player(&self) -> Result<Option<Player>, GameError> {
        let Some(bytes) = self.primary.get(PLAYER_KEY)? else {
            return Ok(None);
        };
        let record: Player = Self::deserialize(bytes)?;
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(Some(record))
    }

    /// Persist the pending event, replacing any previous one.
    pub fn save_current_event(&self, event: &Event) -> Result<(), GameError> {
        let mut record = event.clone();
        record.schema_version = EVENT_SCHEMA_VERSION;
        let bytes = Self::serialize(&record)?;
        self.events.insert(CURRENT_EVENT_KEY, bytes)?;
        self.events.flush()?;
        Ok(())
    }

    /// Fetch the pending event, if any.
    pub fn load_current_event(&self) -> Result<Option<Event>, GameError> {
        let Some(bytes) = self.events.get(CURRENT_EVENT_KEY)? else {
            return Ok(None);
        };
        let record: Event = Self::deserialize(bytes)?;
        if record.schema_version != EVENT_SCHEMA_VERSION {
            return Err(GameError::SchemaMismatch {
                entity: "event",
                expected: EVENT_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(Some(record))
    }

    pub fn clear_current_event(&self) -> Result<(), GameError> {
        self.events.remove(CURRENT_EVENT_KEY)?;
        self.events.flush()?;
        Ok(())
    }

    /// Record (or refresh) the open timestamp for a tab.
    pub fn touch_tab(&self, tab_id: u32, now: DateTime<Utc>) -> Result<(), GameError> {
        let bytes = Self::serialize(&now.timestamp_millis())?;
        self.tabs.insert(Self::tab_key(tab_id), bytes)?;
        self.tabs.flush()?;
        Ok(())
    }

    /// Look up a tab's open timestamp without removing it.
    pub fn get_tab(&self, tab_id: u32) -> Result<Option<DateTime<Utc>>, GameError> {
        match self.tabs.get(Self::tab_key(tab_id))? {
            Some(bytes) => Self::millis_to_datetime(Self::deserialize(bytes)?).map(Some),
            None => Ok(None),
        }
    }

    /// Remove a tab's timestamp, returning it so the caller can compute the
    /// open duration. `None` when the tab was never stamped.
    pub fn remove_tab(&self, tab_id: u32) -> Result<Option<DateTime<Utc>>, GameError> {
        let removed = self.tabs.remove(Self::tab_key(tab_id))?;
        self.tabs.flush()?;
        match removed {
            Some(bytes) => Self::millis_to_datetime(Self::deserialize(bytes)?).map(Some),
            None => Ok(None),
        }
    }

    /// Number of tabs currently stamped as open.
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn set_needs_class_selection(&self, value: bool) -> Result<(), GameError> {
        let bytes = Self::serialize(&value)?;
        self.primary.insert(NEEDS_CLASS_KEY, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    pub fn needs_class_selection(&self) -> Result<bool, GameError> {
        match self.primary.get(NEEDS_CLASS_KEY)? {
            Some(bytes) => Self::deserialize(bytes),
            None => Ok(false),
        }
    }

    /// Drop every record. Used by reset; the caller is expected to write a
    /// fresh profile immediately after.
    pub fn clear(&self) -> Result<(), GameError> {
        self.primary.clear()?;
        self.events.clear()?;
        self.tabs.clear()?;
        self.primary.flush()?;
        self.events.flush()?;
        self.tabs.flush()?;
        Ok(())
    }

    fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, GameError> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| GameError::Internal(format!("bad stored timestamp: {millis}")))
    }
}
