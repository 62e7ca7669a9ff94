//! Calendar event types.
//!
//! An [`Event`] always satisfies `start < end`. New events enter the system as
//! an [`EventDraft`] and only become events through [`EventDraft::into_event`].

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SubsecRound, TimeZone, Utc};

use crate::dates;
use crate::error::ValidationError;

/// Default wall-clock start for a new event.
pub const DEFAULT_START: &str = "09:00";
/// Default wall-clock end for a new event.
pub const DEFAULT_END: &str = "10:00";

/// Fractional-second digits kept on event times (milliseconds).
pub const STORED_SUBSEC_DIGITS: u16 = 3;

/// Something that occupies a `[start, end)` interval on the timeline.
pub trait Scheduled {
    fn start(&self) -> DateTime<Utc>;
    fn end(&self) -> DateTime<Utc>;
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Scheduled for Event {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl Event {
    /// Whether the event satisfies the `start < end` invariant.
    pub fn is_valid_interval(&self) -> bool {
        self.start < self.end
    }

    /// Render the time span in `tz`, e.g. "09:00 – 10:00".
    pub fn render_time_span<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!(
            "{} – {}",
            dates::fmt_time(&self.start.with_timezone(tz)),
            dates::fmt_time(&self.end.with_timezone(tz))
        )
    }
}

/// User input for an event that has not been validated or assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Scheduled for EventDraft {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }

    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        EventDraft {
            title: title.into(),
            description,
            start,
            end,
        }
    }

    /// Build a draft for `day` from wall-clock start/end times in `tz`.
    pub fn on_day<Tz: TimeZone>(
        title: impl Into<String>,
        description: Option<String>,
        day: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        tz: &Tz,
    ) -> Self {
        EventDraft::new(
            title,
            description,
            dates::resolve_local(day.and_time(start), tz),
            dates::resolve_local(day.and_time(end), tz),
        )
    }

    /// Cut start and end to the millisecond precision events are stored with.
    pub fn with_stored_precision(self) -> Self {
        EventDraft {
            start: self.start.trunc_subsecs(STORED_SUBSEC_DIGITS),
            end: self.end.trunc_subsecs(STORED_SUBSEC_DIGITS),
            ..self
        }
    }

    /// Check the draft without consuming it.
    ///
    /// Title is checked before the interval, so a draft that is wrong on both
    /// counts reports the missing title.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.end <= self.start {
            return Err(ValidationError::EndNotAfterStart);
        }
        Ok(())
    }

    /// Validate and turn the draft into an [`Event`] with the given id.
    ///
    /// Times are cut to stored precision before validation. Title and
    /// description are trimmed; a blank description becomes `None`.
    pub fn into_event(self, id: String) -> Result<Event, ValidationError> {
        let draft = self.with_stored_precision();
        draft.validate()?;

        let description = draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Event {
            id,
            title: draft.title.trim().to_string(),
            description,
            start: draft.start,
            end: draft.end,
        })
    }
}

/// Parse a wall-clock time in `HH:MM` form.
pub fn parse_wall_time(s: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn draft(title: &str, start_hour: u32, end_hour: u32) -> EventDraft {
        EventDraft::new(
            title,
            None,
            Utc.with_ymd_and_hms(2025, 8, 6, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 8, 6, end_hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(draft("   ", 9, 10).validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn title_is_checked_before_interval() {
        assert_eq!(draft("", 10, 9).validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn end_must_be_after_start() {
        assert_eq!(
            draft("Standup", 10, 10).validate(),
            Err(ValidationError::EndNotAfterStart)
        );
        assert_eq!(
            draft("Standup", 11, 10).validate(),
            Err(ValidationError::EndNotAfterStart)
        );
    }

    #[test]
    fn into_event_trims_fields() {
        let mut d = draft("  Standup  ", 9, 10);
        d.description = Some("   ".to_string());
        let event = d.into_event("abc".to_string()).unwrap();
        assert_eq!(event.id, "abc");
        assert_eq!(event.title, "Standup");
        assert_eq!(event.description, None);

        let mut d = draft("Review", 9, 10);
        d.description = Some(" notes ".to_string());
        let event = d.into_event("def".to_string()).unwrap();
        assert_eq!(event.description.as_deref(), Some("notes"));
    }

    #[test]
    fn into_event_keeps_millisecond_precision() {
        let start = Utc.with_ymd_and_hms(2025, 8, 6, 9, 0, 0).unwrap();
        let d = EventDraft::new(
            "Blip",
            None,
            start + chrono::Duration::microseconds(250),
            start + chrono::Duration::microseconds(1_700),
        );
        let event = d.into_event("1".to_string()).unwrap();
        assert_eq!(event.start, start);
        assert_eq!(event.end, start + chrono::Duration::milliseconds(1));
        assert!(event.is_valid_interval());

        let too_short =
            EventDraft::new("Blip", None, start, start + chrono::Duration::microseconds(500));
        assert_eq!(
            too_short.into_event("2".to_string()),
            Err(ValidationError::EndNotAfterStart)
        );
    }

    #[test]
    fn on_day_uses_wall_clock_in_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 8, 6).unwrap();
        let d = EventDraft::on_day(
            "Standup",
            None,
            day,
            parse_wall_time(DEFAULT_START).unwrap(),
            parse_wall_time(DEFAULT_END).unwrap(),
            &tz,
        );
        assert_eq!(d.start, Utc.with_ymd_and_hms(2025, 8, 6, 7, 0, 0).unwrap());
        assert_eq!(d.end, Utc.with_ymd_and_hms(2025, 8, 6, 8, 0, 0).unwrap());
    }

    #[test]
    fn parse_wall_time_rejects_garbage() {
        assert!(parse_wall_time("09:30").is_ok());
        assert_eq!(
            parse_wall_time("noonish"),
            Err(ValidationError::InvalidTime("noonish".to_string()))
        );
        assert!(parse_wall_time("25:00").is_err());
    }

    #[test]
    fn render_time_span_in_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let event = draft("Standup", 9, 10).into_event("1".to_string()).unwrap();
        assert_eq!(event.render_time_span(&tz), "11:00 – 12:00");
    }
}
