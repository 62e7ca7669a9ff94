//! Operations over collections of events: day matching, sorting and overlap
//! detection.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::dates::local_day;
use crate::event::Scheduled;

/// Whether two instants fall on the same calendar day in their zone.
pub fn same_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Whether two UTC instants fall on the same calendar day in `tz`.
pub fn same_day_in<Tz: TimeZone>(a: &DateTime<Utc>, b: &DateTime<Utc>, tz: &Tz) -> bool {
    same_day(&a.with_timezone(tz), &b.with_timezone(tz))
}

/// Return a copy of `events` ordered by start time.
///
/// The sort is stable: events with equal start times keep their input order.
pub fn sort_events<T: Scheduled + Clone>(events: &[T]) -> Vec<T> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.start());
    sorted
}

/// Events starting on `day` in `tz`, ordered by start time.
pub fn events_on<'a, T: Scheduled, Tz: TimeZone>(
    events: &'a [T],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a T> {
    let mut matching: Vec<&T> = events
        .iter()
        .filter(|e| local_day(&e.start(), tz) == day)
        .collect();
    matching.sort_by_key(|e| e.start());
    matching
}

/// Bucket events by the day they start on, for every day in `days`.
///
/// Every day in `days` gets an entry, empty if nothing starts on it. Events
/// starting outside `days` are ignored.
pub fn group_by_day<'a, T: Scheduled, Tz: TimeZone>(
    events: &'a [T],
    days: &[NaiveDate],
    tz: &Tz,
) -> BTreeMap<NaiveDate, Vec<&'a T>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&T>> =
        days.iter().map(|d| (*d, Vec::new())).collect();

    for event in events {
        if let Some(bucket) = groups.get_mut(&local_day(&event.start(), tz)) {
            bucket.push(event);
        }
    }

    for bucket in groups.values_mut() {
        bucket.sort_by_key(|e| e.start());
    }

    groups
}

/// Whether `candidate` overlaps `existing`.
///
/// Both must start on the same calendar day in `tz` and their half-open
/// `[start, end)` intervals must intersect. Touching intervals do not overlap.
pub fn overlaps<A: Scheduled, B: Scheduled, Tz: TimeZone>(
    candidate: &A,
    existing: &B,
    tz: &Tz,
) -> bool {
    same_day_in(&existing.start(), &candidate.start(), tz)
        && existing.start() < candidate.end()
        && candidate.start() < existing.end()
}

/// All events in `events` that `candidate` overlaps.
pub fn find_overlaps<'a, A: Scheduled, T: Scheduled, Tz: TimeZone>(
    candidate: &A,
    events: &'a [T],
    tz: &Tz,
) -> Vec<&'a T> {
    events
        .iter()
        .filter(|e| overlaps(candidate, *e, tz))
        .collect()
}
