//! Durable storage for the user partition.
//!
//! Only user events are ever written. The payload is the JSON array of
//! event records kept under a single fixed key; global events are fetched
//! again every session and never reach disk.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{CalboardError, CalboardResult};
use crate::event::Event;

/// Storage key for the user partition.
pub const USER_EVENTS_KEY: &str = "userEvents";

pub trait PersistenceStore {
    /// Previously saved user events. Never fails: a missing or corrupt
    /// payload yields an empty partition.
    fn load(&self) -> Vec<Event>;

    /// Replace the stored user events with `events`.
    fn save(&self, events: &[Event]) -> CalboardResult<()>;
}

/// Decode a stored payload, dropping anything tagged global.
pub fn decode_user_events(payload: &str) -> CalboardResult<Vec<Event>> {
    let events: Vec<Event> = serde_json::from_str(payload)
        .map_err(|e| CalboardError::PersistenceRead(e.to_string()))?;

    let (global, user): (Vec<Event>, Vec<Event>) = events.into_iter().partition(|e| e.is_global);
    if !global.is_empty() {
        warn!(
            "Ignoring {} global event(s) found in stored user events",
            global.len()
        );
    }

    Ok(user)
}

pub fn encode_user_events(events: &[Event]) -> CalboardResult<String> {
    serde_json::to_string(events).map_err(|e| CalboardError::Serialization(e.to_string()))
}

fn load_soft(payload: Option<CalboardResult<String>>) -> Vec<Event> {
    let payload = match payload {
        None => return Vec::new(),
        Some(Ok(payload)) => payload,
        Some(Err(e)) => {
            warn!("{e}; starting with no user events");
            return Vec::new();
        }
    };

    match decode_user_events(&payload) {
        Ok(events) => events,
        Err(e) => {
            warn!("{e}; starting with no user events");
            Vec::new()
        }
    }
}

/// Stores the user partition as `<dir>/userEvents.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{USER_EVENTS_KEY}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PersistenceStore for JsonFileStore {
    fn load(&self) -> Vec<Event> {
        let path = self.path();

        let payload = if path.exists() {
            Some(std::fs::read_to_string(&path).map_err(|e| {
                CalboardError::PersistenceRead(format!("{}: {e}", path.display()))
            }))
        } else {
            None
        };

        let events = load_soft(payload);
        debug!("Loaded {} user event(s) from {}", events.len(), path.display());
        events
    }

    fn save(&self, events: &[Event]) -> CalboardResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path();
        let temp = self.dir.join(format!("{USER_EVENTS_KEY}.json.tmp"));
        let content = encode_user_events(events)?;

        std::fs::write(&temp, content)
            .and_then(|_| std::fs::rename(&temp, &path))
            .map_err(|e| CalboardError::PersistenceWrite(format!("{}: {e}", path.display())))?;

        debug!("Saved {} user event(s) to {}", events.len(), path.display());
        Ok(())
    }
}

/// Keeps the serialized payload in memory. Useful for tests and for
/// sessions that should leave no trace on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Start from a raw payload, as if a previous session had written it.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        MemoryStore {
            payload: RefCell::new(Some(payload.into())),
        }
    }

    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&self) -> Vec<Event> {
        load_soft(self.payload.borrow().clone().map(Ok))
    }

    fn save(&self, events: &[Event]) -> CalboardResult<()> {
        let content = encode_user_events(events)?;
        *self.payload.borrow_mut() = Some(content);
        Ok(())
    }
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for &S {
    fn load(&self) -> Vec<Event> {
        (**self).load()
    }

    fn save(&self, events: &[Event]) -> CalboardResult<()> {
        (**self).save(events)
    }
}
