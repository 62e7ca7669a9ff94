//! Conversion between in-memory events and their persisted form.
//!
//! The persisted store holds a JSON array of [`PersistedEvent`] records with
//! ISO-8601 timestamps. Loading never fails on a bad record: unreadable
//! timestamps fall back to "now", and any record whose interval is then empty
//! or inverted is left out.

use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dates;
use crate::error::CalGridResult;
use crate::event::{Event, STORED_SUBSEC_DIGITS};

/// Storage form of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

/// Result of decoding persisted records.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub events: Vec<Event>,
    /// Number of timestamps that could not be read and were replaced by "now"
    pub coerced: usize,
    /// Ids of records left out because start was not before end
    pub dropped: Vec<String>,
}

/// Render an instant as ISO-8601 in UTC with millisecond precision,
/// e.g. `2025-08-06T09:00:00.000Z`.
pub fn to_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize_events(events: &[Event]) -> Vec<PersistedEvent> {
    events
        .iter()
        .map(|e| PersistedEvent {
            id: e.id.clone(),
            title: e.title.clone(),
            description: e.description.clone(),
            start_time: to_iso(&e.start),
            end_time: to_iso(&e.end),
        })
        .collect()
}

/// Turn persisted records back into events, using the current time as the
/// fallback for unreadable timestamps and the local zone for timestamps
/// without an offset.
///
/// Records with `start >= end` are dropped. Output order is unspecified.
pub fn deserialize_events(records: &[PersistedEvent]) -> Vec<Event> {
    deserialize_events_with(records, Utc::now(), &Local).events
}

/// Same as [`deserialize_events`] with an explicit clock and zone, reporting
/// what was coerced or dropped.
pub fn deserialize_events_with<Tz: TimeZone>(
    records: &[PersistedEvent],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Decoded {
    let mut decoded = Decoded::default();

    for record in records {
        // Stored precision, so whatever loads also survives the next save
        let start = timestamp_or(&record.start_time, now, tz, &mut decoded.coerced)
            .trunc_subsecs(STORED_SUBSEC_DIGITS);
        let end = timestamp_or(&record.end_time, now, tz, &mut decoded.coerced)
            .trunc_subsecs(STORED_SUBSEC_DIGITS);

        let event = Event {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            start,
            end,
        };

        if event.is_valid_interval() {
            decoded.events.push(event);
        } else {
            decoded.dropped.push(event.id);
        }
    }

    decoded
}

fn timestamp_or<Tz: TimeZone>(
    text: &str,
    fallback: DateTime<Utc>,
    tz: &Tz,
    coerced: &mut usize,
) -> DateTime<Utc> {
    parse_timestamp(text, tz).unwrap_or_else(|| {
        *coerced += 1;
        fallback
    })
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 with any offset (seconds may be left out), date-times
/// without an offset (read as wall-clock time in `tz`) and bare dates
/// (midnight in `tz`).
pub fn parse_timestamp<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dates::resolve_local(naive, tz));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|day| dates::start_of_day(day, tz))
}

/// Encode records as the JSON array kept under the storage key.
pub fn encode_records(records: &[PersistedEvent]) -> CalGridResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Decode the JSON array kept under the storage key.
///
/// Array elements that are not valid records are skipped. Text that is not a
/// JSON array at all is an error.
pub fn decode_records(text: &str) -> CalGridResult<Vec<PersistedEvent>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text)?;

    let records = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed stored event");
                None
            }
        })
        .collect();

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::sort_events;
    use chrono::FixedOffset;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn make_event(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            description: None,
            start,
            end,
        }
    }

    fn record(id: &str, start: &str, end: &str) -> PersistedEvent {
        PersistedEvent {
            id: id.to_string(),
            title: "Record".to_string(),
            description: None,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn serialize_uses_utc_millis() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let start = tz.with_ymd_and_hms(2025, 8, 6, 11, 0, 0).unwrap().with_timezone(&Utc);
        let event = make_event("1", start, start + chrono::Duration::hours(1));

        let persisted = serialize_events(&[event]);
        assert_eq!(persisted[0].start_time, "2025-08-06T09:00:00.000Z");
        assert_eq!(persisted[0].end_time, "2025-08-06T10:00:00.000Z");
    }

    #[test]
    fn roundtrip_preserves_valid_events() {
        let mut with_description = make_event("b", utc(2025, 8, 6, 9, 0), utc(2025, 8, 6, 10, 0));
        with_description.description = Some("Discuss project updates".to_string());
        let events = vec![
            make_event("a", utc(2025, 8, 7, 12, 0), utc(2025, 8, 7, 13, 0)),
            with_description,
            make_event("c", utc(2025, 8, 6, 9, 0), utc(2025, 8, 6, 9, 30)),
        ];

        let restored =
            deserialize_events_with(&serialize_events(&events), utc(2030, 1, 1, 0, 0), &Utc);
        assert_eq!(restored.coerced, 0);
        assert!(restored.dropped.is_empty());
        assert_eq!(sort_events(&restored.events), sort_events(&events));
    }

    #[test]
    fn roundtrip_filters_invalid_intervals() {
        let events = vec![
            make_event("ok", utc(2025, 8, 6, 9, 0), utc(2025, 8, 6, 10, 0)),
            make_event("empty", utc(2025, 8, 6, 9, 0), utc(2025, 8, 6, 9, 0)),
            make_event("inverted", utc(2025, 8, 6, 11, 0), utc(2025, 8, 6, 10, 0)),
        ];

        let restored = deserialize_events(&serialize_events(&events));
        assert_eq!(restored, vec![events[0].clone()]);
    }

    #[test]
    fn sub_millisecond_times_are_truncated_on_load() {
        let records = vec![
            record("blip", "2025-08-06T09:00:00.0001Z", "2025-08-06T09:00:00.0005Z"),
            record("kept", "2025-08-06T09:00:00.0004Z", "2025-08-06T09:00:00.0012Z"),
        ];

        let decoded = deserialize_events_with(&records, utc(2030, 1, 1, 0, 0), &Utc);
        assert_eq!(decoded.dropped, vec!["blip".to_string()]);
        assert_eq!(decoded.events[0].start, utc(2025, 8, 6, 9, 0));

        let again = deserialize_events_with(
            &serialize_events(&decoded.events),
            utc(2030, 1, 1, 0, 0),
            &Utc,
        );
        assert_eq!(again.events, decoded.events);
    }

    #[test]
    fn unreadable_timestamps_fall_back_to_now() {
        let now = utc(2025, 8, 6, 12, 0);
        let records = vec![
            record("start-garbage", "not a date", "2025-08-06T15:00:00Z"),
            record("end-garbage", "2025-08-06T08:00:00Z", ""),
            record("both-garbage", "", "???"),
            record("end-before-now", "garbage", "2025-08-06T10:00:00Z"),
        ];

        let decoded = deserialize_events_with(&records, now, &Utc);
        assert_eq!(decoded.coerced, 5);
        assert_eq!(
            decoded.dropped,
            vec!["both-garbage".to_string(), "end-before-now".to_string()]
        );

        let ids: Vec<_> = decoded.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["start-garbage", "end-garbage"]);
        assert_eq!(decoded.events[0].start, now);
        assert_eq!(decoded.events[1].end, now);
    }

    #[test]
    fn deserialize_tolerates_arbitrary_text() {
        let inputs = ["", " ", "2025-13-45", "T", "\u{0}", "2025-08-06T25:61", "9999999999999"];
        for start in inputs {
            for end in inputs {
                let decoded = deserialize_events(&[record("x", start, end)]);
                assert!(decoded.iter().all(|e| e.start < e.end));
            }
        }
    }

    #[test]
    fn description_absent_stays_absent() {
        let event = make_event("1", utc(2025, 8, 6, 9, 0), utc(2025, 8, 6, 10, 0));
        let json = encode_records(&serialize_events(&[event])).unwrap();
        assert!(!json.contains("description"));
        assert!(json.contains("\"startTime\""));
        assert!(json.contains("\"endTime\""));

        let restored = deserialize_events(&decode_records(&json).unwrap());
        assert_eq!(restored[0].description, None);
    }

    #[test]
    fn decode_accepts_null_description() {
        let json = r#"[{"id":"1","title":"T","description":null,"startTime":"2025-08-06T09:00:00Z","endTime":"2025-08-06T10:00:00Z"}]"#;
        let records = decode_records(json).unwrap();
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn decode_skips_malformed_records() {
        let json = r#"[
            {"id":"1","title":"Good","startTime":"2025-08-06T09:00:00.000Z","endTime":"2025-08-06T10:00:00.000Z"},
            {"id":"2","title":"No times"},
            {"id":3,"title":"Numeric id","startTime":"x","endTime":"y"},
            "just a string"
        ]"#;
        let records = decode_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn decode_rejects_non_array() {
        assert!(decode_records("{\"id\":\"1\"}").is_err());
        assert!(decode_records("").is_err());
        assert!(decode_records("not json").is_err());
    }

    #[test]
    fn parse_timestamp_forms() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let expected = utc(2025, 8, 6, 9, 0);

        assert_eq!(parse_timestamp("2025-08-06T09:00:00.000Z", &tz), Some(expected));
        assert_eq!(parse_timestamp("2025-08-06T11:00:00+02:00", &tz), Some(expected));
        assert_eq!(parse_timestamp("  2025-08-06T09:00:00Z  ", &tz), Some(expected));
        assert_eq!(parse_timestamp("2025-08-06T11:00:00", &tz), Some(expected));
        assert_eq!(parse_timestamp("2025-08-06T11:00", &tz), Some(expected));
        assert_eq!(parse_timestamp("2025-08-06T09:00Z", &tz), Some(expected));
        assert_eq!(parse_timestamp("2025-08-06T11:00+02:00", &tz), Some(expected));
        assert_eq!(
            parse_timestamp("2025-08-06", &tz),
            Some(utc(2025, 8, 5, 22, 0))
        );
        assert_eq!(parse_timestamp("yesterday", &tz), None);
        assert_eq!(parse_timestamp("", &tz), None);
    }
}
