//! The authoritative event list and its persistence.
//!
//! A [`Calendar`] loads once from a [`KeyValueStore`] and writes the whole
//! list back after every mutation. Events are kept sorted by start time.

use chrono::{DateTime, Local, TimeZone, Utc};
use tracing::{debug, warn};

use crate::codec;
use crate::collection::{find_overlaps, sort_events};
use crate::error::{CalGridError, CalGridResult};
use crate::event::{Event, EventDraft};
use crate::id::IdGenerator;
use crate::store::{KeyValueStore, STORAGE_KEY};

const MAX_ID_ATTEMPTS: usize = 100;

/// Outcome of adding an event.
#[derive(Debug, Clone)]
pub struct Created {
    pub event: Event,
    /// Existing events the new one overlaps. Overlap is allowed; this is only
    /// reported so the caller can warn about it.
    pub overlaps: Vec<Event>,
}

pub struct Calendar<S: KeyValueStore> {
    store: S,
    ids: Box<dyn IdGenerator>,
    events: Vec<Event>,
}

impl<S: KeyValueStore> Calendar<S> {
    /// Load events from `store`, reading offset-less timestamps as local time.
    pub fn load(store: S, ids: Box<dyn IdGenerator>) -> CalGridResult<Self> {
        Self::load_with(store, ids, Utc::now(), &Local)
    }

    /// Load events from `store` with an explicit clock and zone.
    ///
    /// A missing storage key is an empty calendar. Unreadable timestamps and
    /// records with an empty or inverted interval are handled by the codec
    /// and only logged here.
    pub fn load_with<Tz: TimeZone>(
        store: S,
        ids: Box<dyn IdGenerator>,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> CalGridResult<Self> {
        let records = match store.get(STORAGE_KEY)? {
            Some(text) => codec::decode_records(&text)?,
            None => Vec::new(),
        };

        let decoded = codec::deserialize_events_with(&records, now, tz);

        if decoded.coerced > 0 {
            warn!(
                count = decoded.coerced,
                "Replaced unreadable event timestamps with the current time"
            );
        }
        if !decoded.dropped.is_empty() {
            warn!(
                count = decoded.dropped.len(),
                ids = ?decoded.dropped,
                "Dropped stored events whose start is not before their end"
            );
        }
        debug!(count = decoded.events.len(), "Loaded events");

        Ok(Calendar {
            store,
            ids,
            events: sort_events(&decoded.events),
        })
    }

    /// All events, ordered by start time.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validate and add a new event, checking overlaps in the local zone.
    pub fn add(&mut self, draft: EventDraft) -> CalGridResult<Created> {
        self.add_in(draft, &Local)
    }

    /// Validate and add a new event, checking overlaps in `tz`.
    pub fn add_in<Tz: TimeZone>(&mut self, draft: EventDraft, tz: &Tz) -> CalGridResult<Created> {
        let draft = draft.with_stored_precision();
        draft.validate()?;

        let overlaps: Vec<Event> = find_overlaps(&draft, &self.events, tz)
            .into_iter()
            .cloned()
            .collect();

        let id = self.unique_id()?;
        let event = draft.into_event(id)?;

        // After any events with the same start, so equal starts keep insertion order
        let pos = self.events.partition_point(|e| e.start <= event.start);
        self.events.insert(pos, event.clone());

        if let Err(e) = self.save() {
            self.events.remove(pos);
            return Err(e);
        }

        if !overlaps.is_empty() {
            debug!(id = %event.id, count = overlaps.len(), "New event overlaps existing events");
        }

        Ok(Created { event, overlaps })
    }

    /// Delete the event with exactly this id.
    pub fn delete(&mut self, id: &str) -> CalGridResult<Event> {
        let pos = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CalGridError::EventNotFound(id.to_string()))?;

        let removed = self.events.remove(pos);

        if let Err(e) = self.save() {
            self.events.insert(pos, removed);
            return Err(e);
        }

        Ok(removed)
    }

    /// Find an event by exact id, or by a prefix that matches exactly one id.
    pub fn find(&self, id_or_prefix: &str) -> CalGridResult<&Event> {
        // An empty prefix would match every id
        if id_or_prefix.trim().is_empty() {
            return Err(CalGridError::EventNotFound(id_or_prefix.to_string()));
        }

        if let Some(event) = self.events.iter().find(|e| e.id == id_or_prefix) {
            return Ok(event);
        }

        let matches: Vec<&Event> = self
            .events
            .iter()
            .filter(|e| e.id.starts_with(id_or_prefix))
            .collect();

        match matches.as_slice() {
            [event] => Ok(*event),
            [] => Err(CalGridError::EventNotFound(id_or_prefix.to_string())),
            many => {
                let ids: Vec<_> = many.iter().map(|e| e.id.as_str()).collect();
                Err(CalGridError::AmbiguousEventId(
                    id_or_prefix.to_string(),
                    ids.join(", "),
                ))
            }
        }
    }

    /// Write the full event list to the store.
    pub fn save(&mut self) -> CalGridResult<()> {
        let text = codec::encode_records(&codec::serialize_events(&self.events))?;
        self.store.set(STORAGE_KEY, &text)?;
        debug!(count = self.events.len(), "Saved events");
        Ok(())
    }

    fn unique_id(&mut self) -> CalGridResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !self.events.iter().any(|e| e.id == id) {
                return Ok(id);
            }
        }

        Err(CalGridError::Store(
            "Could not generate a unique event id".to_string(),
        ))
    }
}
