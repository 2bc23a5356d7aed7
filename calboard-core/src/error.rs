//! Error types for calboard.

use thiserror::Error;

/// Why a candidate event was rejected before any mutation happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field} '{value}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")]
    InvalidTime { field: &'static str, value: String },

    #[error("Event ends ({end}) before it starts ({start})")]
    EndBeforeStart { start: String, end: String },
}

/// Errors that can occur in calboard operations.
#[derive(Error, Debug)]
pub enum CalboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User event not found: {0}")]
    NotFound(String),

    #[error("Event repository already initialized")]
    AlreadyInitialized,

    #[error("Holiday fetch failed: {0}")]
    Fetch(String),

    #[error("Could not read stored events: {0}")]
    PersistenceRead(String),

    #[error("Could not save events: {0}")]
    PersistenceWrite(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for CalboardError {
    fn from(e: reqwest::Error) -> Self {
        CalboardError::Fetch(e.to_string())
    }
}

/// Result type alias for calboard operations.
pub type CalboardResult<T> = Result<T, CalboardError>;
