//! Core of calboard: fetched holidays merged with locally owned events.
//!
//! - `event`: the event record, drafts and ISO time parsing
//! - `store`: durable storage for the user partition
//! - `remote`: the one-shot holiday fetch
//! - `repository`: the two partitions, user CRUD and the merged view
//! - `filter`: title filtering and input debouncing
//! - `selection`: the create/edit flow in front of the repository
//! - `session`: everything above wired together for one run

pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod remote;
pub mod repository;
pub mod selection;
pub mod session;
pub mod store;

pub use config::{CalboardConfig, HolidayConfig};
pub use error::{CalboardError, CalboardResult, ValidationError};
pub use event::{Event, EventDraft, EventTime};
pub use remote::{EventSource, HolidaySource, StaticSource};
pub use repository::EventRepository;
pub use selection::{Selection, SelectionController};
pub use session::Session;
pub use store::{JsonFileStore, MemoryStore, PersistenceStore};
