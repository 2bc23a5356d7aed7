//! The event repository: two partitions and their merged view.
//!
//! Global events are installed once and never touched again. User events
//! are created, edited and deleted here, and every successful mutation is
//! written through to the persistence store before the merged view is
//! rebuilt from scratch.

use std::collections::HashSet;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{debug, error, info, warn};

use crate::error::{CalboardError, CalboardResult};
use crate::event::{Event, EventDraft};
use crate::store::PersistenceStore;

pub struct EventRepository<S: PersistenceStore> {
    store: S,
    global: Vec<Event>,
    user: Vec<Event>,
    merged: Vec<Event>,
    initialized: bool,
    global_installed: bool,
}

impl<S: PersistenceStore> EventRepository<S> {
    /// An empty, uninitialized repository writing through to `store`.
    pub fn new(store: S) -> Self {
        EventRepository {
            store,
            global: Vec::new(),
            user: Vec::new(),
            merged: Vec::new(),
            initialized: false,
            global_installed: false,
        }
    }

    /// Seed the user partition from `store` and leave the global partition
    /// empty until `install_global` backfills it.
    pub fn open(store: S) -> Self {
        let user = store.load();
        let mut repo = Self::new(store);
        repo.seed(Vec::new(), user);
        repo
    }

    /// One-time seed of both partitions.
    pub fn initialize(&mut self, global: Vec<Event>, user: Vec<Event>) -> CalboardResult<()> {
        if self.initialized {
            return Err(CalboardError::AlreadyInitialized);
        }
        self.seed(global, user);
        Ok(())
    }

    fn seed(&mut self, global: Vec<Event>, user: Vec<Event>) {
        let mut ids = HashSet::new();
        self.user = user
            .into_iter()
            .filter(|e| {
                if e.is_global {
                    warn!("Dropping '{}' from user events: tagged global", e.id);
                    return false;
                }
                if !ids.insert(e.id.clone()) {
                    warn!("Dropping duplicate user event '{}'", e.id);
                    return false;
                }
                true
            })
            .collect();

        self.global_installed = !global.is_empty();
        self.global = self.owned_globals(global);
        self.initialized = true;
        self.recompute();

        info!(
            "Event repository ready: {} global, {} user",
            self.global.len(),
            self.user.len()
        );
    }

    /// Backfill the global partition once the fetch resolves. User events
    /// created in the meantime are kept. Returns false if holidays were
    /// already installed.
    pub fn install_global(&mut self, global: Vec<Event>) -> bool {
        if self.global_installed {
            warn!("Global events already installed; ignoring {} more", global.len());
            return false;
        }

        self.global = self.owned_globals(global);
        self.global_installed = true;
        self.recompute();

        info!("Installed {} global event(s)", self.global.len());
        true
    }

    /// Normalize provider events and drop any whose id is already owned.
    fn owned_globals(&self, global: Vec<Event>) -> Vec<Event> {
        let mut ids: HashSet<String> = self.user.iter().map(|e| e.id.clone()).collect();

        global
            .into_iter()
            .filter_map(|mut e| {
                if !ids.insert(e.id.clone()) {
                    warn!("Dropping global event '{}': id already in use", e.id);
                    return None;
                }
                e.is_global = true;
                e.end = None;
                Some(e)
            })
            .collect()
    }

    pub fn add_user_event(&mut self, candidate: &EventDraft) -> CalboardResult<Event> {
        candidate.validate()?;

        let id = self.fresh_id(Utc::now());
        let event = Event::user(id, candidate);
        self.user.push(event.clone());

        debug!("Added user event '{}' ({})", event.title, event.id);
        self.persist();
        self.recompute();

        Ok(event)
    }

    pub fn update_user_event(&mut self, id: &str, fields: &EventDraft) -> CalboardResult<Event> {
        let index = self.user_index(id)?;
        fields.validate()?;

        let event = &mut self.user[index];
        event.apply(fields);
        let event = event.clone();

        debug!("Updated user event '{}' ({})", event.title, event.id);
        self.persist();
        self.recompute();

        Ok(event)
    }

    pub fn delete_user_event(&mut self, id: &str) -> CalboardResult<Event> {
        let index = self.user_index(id)?;
        let removed = self.user.remove(index);

        debug!("Deleted user event '{}' ({})", removed.title, removed.id);
        self.persist();
        self.recompute();

        Ok(removed)
    }

    /// Global events first, then user events in insertion order.
    pub fn merged(&self) -> &[Event] {
        &self.merged
    }

    pub fn global(&self) -> &[Event] {
        &self.global
    }

    pub fn user(&self) -> &[Event] {
        &self.user
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.merged.iter().find(|e| e.id == id)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn user_index(&self, id: &str) -> CalboardResult<usize> {
        self.user
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CalboardError::NotFound(id.to_string()))
    }

    fn contains_id(&self, id: &str) -> bool {
        self.global.iter().chain(&self.user).any(|e| e.id == id)
    }

    /// Millisecond timestamp id, advanced until it is unused.
    fn fresh_id(&self, now: DateTime<Utc>) -> String {
        let mut at = now;
        loop {
            let id = at.to_rfc3339_opts(SecondsFormat::Millis, true);
            if !self.contains_id(&id) {
                return id;
            }
            at += Duration::milliseconds(1);
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.user) {
            error!("{e}; changes are kept for this session only");
        }
    }

    fn recompute(&mut self) {
        self.merged = self.global.iter().chain(&self.user).cloned().collect();
    }
}
