//! Core types for calgrid.
//!
//! - `dates`: week and month grids anchored to a day, display formatting
//! - `codec`: events to and from their persisted JSON form
//! - `collection`: same-day matching, sorting and overlap detection
//! - `calendar`: the persisted, authoritative event list

pub mod calendar;
pub mod codec;
pub mod collection;
pub mod config;
pub mod dates;
pub mod error;
pub mod event;
pub mod id;
pub mod store;
pub mod view;

pub use error::{CalGridError, CalGridResult, ValidationError};
pub use event::{Event, EventDraft, Scheduled};
