//! One running calendar session.
//!
//! Wires the repository, the selection controller and the filter together
//! and keeps the visible view in step with them. The holiday fetch runs in
//! the background: a session is usable as soon as `start` returns, and the
//! global partition is backfilled whenever the fetch resolves.

use std::time::Duration;

use log::{debug, warn};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::Instant;

use crate::error::CalboardResult;
use crate::event::{Event, EventDraft};
use crate::filter::{self, Debouncer};
use crate::remote::EventSource;
use crate::repository::EventRepository;
use crate::selection::SelectionController;
use crate::store::PersistenceStore;

pub struct Session<S: PersistenceStore> {
    repository: EventRepository<S>,
    selection: SelectionController,
    query: String,
    debouncer: Debouncer<String>,
    visible: Vec<Event>,
    pending_global: Option<oneshot::Receiver<Vec<Event>>>,
}

impl<S: PersistenceStore> Session<S> {
    /// Load the user partition and kick off the holiday fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(store: S, source: F, quiet: Duration) -> Self
    where
        F: EventSource + Send + Sync + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let events = source.fetch().await;
            // Receiver gone means the session ended first
            let _ = tx.send(events);
        });

        let mut session = Self::offline(store, quiet);
        session.pending_global = Some(rx);
        session
    }

    /// A session without holidays.
    pub fn offline(store: S, quiet: Duration) -> Self {
        let repository = EventRepository::open(store);
        let visible = repository.merged().to_vec();

        Session {
            repository,
            selection: SelectionController::new(),
            query: String::new(),
            debouncer: Debouncer::new(quiet),
            visible,
            pending_global: None,
        }
    }

    pub fn repository(&self) -> &EventRepository<S> {
        &self.repository
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Field edits on the open draft go through here.
    pub fn selection_mut(&mut self) -> &mut SelectionController {
        &mut self.selection
    }

    /// The merged view narrowed by the current query.
    pub fn visible(&self) -> &[Event] {
        &self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_fetching(&self) -> bool {
        self.pending_global.is_some()
    }

    // HOLIDAY BACKFILL:

    /// Install holidays if the fetch has finished. Never blocks.
    pub fn poll_global(&mut self) -> bool {
        let Some(rx) = self.pending_global.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(events) => {
                self.pending_global = None;
                self.backfill(events)
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                warn!("Holiday fetch ended without a result");
                self.pending_global = None;
                false
            }
        }
    }

    /// Wait up to `limit` for the fetch. On timeout the fetch keeps running
    /// and a later `poll_global` can still pick it up.
    pub async fn wait_for_global(&mut self, limit: Duration) -> bool {
        let Some(rx) = self.pending_global.as_mut() else {
            return false;
        };

        let outcome = tokio::time::timeout(limit, rx).await;
        match outcome {
            Ok(Ok(events)) => {
                self.pending_global = None;
                self.backfill(events)
            }
            Ok(Err(_)) => {
                warn!("Holiday fetch ended without a result");
                self.pending_global = None;
                false
            }
            Err(_) => {
                debug!("Holidays not ready after {:?}", limit);
                false
            }
        }
    }

    fn backfill(&mut self, events: Vec<Event>) -> bool {
        let installed = self.repository.install_global(events);
        self.refresh();
        installed
    }

    // FILTER:

    /// Raw keystroke input. Applied once typing pauses (see `tick`).
    pub fn type_query(&mut self, text: impl Into<String>) {
        self.debouncer.push(text.into(), Instant::now());
    }

    /// Periodic housekeeping: backfill holidays and flush settled input.
    /// Returns true if the visible view changed.
    pub fn tick(&mut self) -> bool {
        let backfilled = self.poll_global();

        match self.debouncer.poll(Instant::now()) {
            Some(query) => {
                self.set_query(query);
                true
            }
            None => backfilled,
        }
    }

    /// Wait for typing to pause, then apply the latest query.
    pub async fn settle_query(&mut self) -> bool {
        match self.debouncer.settled().await {
            Some(query) => {
                self.set_query(query);
                true
            }
            None => false,
        }
    }

    /// Apply a query immediately, bypassing the debouncer.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible = filter::apply(self.repository.merged(), &self.query);
    }

    // INBOUND SIGNALS:

    pub fn begin_add(&mut self) -> bool {
        self.selection.begin_new()
    }

    pub fn click_date(&mut self, date: &str) -> bool {
        self.selection.select_date(date)
    }

    /// Open an event for editing by id. Unknown ids and holidays are ignored.
    pub fn click_event(&mut self, id: &str) -> bool {
        match self.repository.get(id) {
            Some(event) => self.selection.select_event(event),
            None => {
                debug!("Clicked unknown event '{id}'");
                false
            }
        }
    }

    pub fn dismiss(&mut self) -> bool {
        self.selection.dismiss()
    }

    pub fn cancel(&mut self) {
        self.selection.cancel();
    }

    // CRUD:

    /// Save the open draft through the selection controller.
    pub fn commit(&mut self) -> CalboardResult<Option<Event>> {
        let result = self.selection.commit(&mut self.repository);
        self.refresh();
        result
    }

    /// Delete the event open for editing.
    pub fn delete_selected(&mut self) -> CalboardResult<Option<Event>> {
        let result = self.selection.delete(&mut self.repository);
        self.refresh();
        result
    }

    pub fn add_event(&mut self, draft: &EventDraft) -> CalboardResult<Event> {
        let result = self.repository.add_user_event(draft);
        self.refresh();
        result
    }

    pub fn update_event(&mut self, id: &str, draft: &EventDraft) -> CalboardResult<Event> {
        let result = self.repository.update_user_event(id, draft);
        self.refresh();
        result
    }

    pub fn delete_event(&mut self, id: &str) -> CalboardResult<Event> {
        let result = self.repository.delete_user_event(id);
        self.refresh();
        result
    }
}
