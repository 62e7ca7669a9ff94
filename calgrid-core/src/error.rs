//! Error types for calgrid.
//!
//! The date-grid, codec and collection helpers are total and never return
//! these. They come from validating new events, the persisted store and
//! configuration loading.

use thiserror::Error;

/// Reasons an [`EventDraft`](crate::event::EventDraft) is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("End time must be after start time")]
    EndNotAfterStart,

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),
}

/// Errors that can occur in calgrid operations.
#[derive(Error, Debug)]
pub enum CalGridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Event id '{0}' is ambiguous, matches: {1}")]
    AmbiguousEventId(String, String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CalGridError {
    fn from(e: serde_json::Error) -> Self {
        CalGridError::Serialization(e.to_string())
    }
}

/// Result type alias for calgrid operations.
pub type CalGridResult<T> = Result<T, CalGridError>;
