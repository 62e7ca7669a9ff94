//! Terminal rendering for day, week and month views.
//!
//! Everything here builds strings so the layout can be tested; commands
//! decide where to print them.

use calgrid_core::calendar::Created;
use calgrid_core::collection::{events_on, group_by_day};
use calgrid_core::dates::{self, fmt_date, local_day};
use calgrid_core::event::Event;
use calgrid_core::view::ViewMode;
use chrono::{Datelike, NaiveDate, TimeZone};
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Width of one day cell in the month grid
const CELL_WIDTH: usize = 6;

const SHORT_ID_LEN: usize = 8;

/// Title line for a view, e.g. "August 6th, 2025", "Week of August 4th, 2025"
/// or "August 2025".
pub fn view_title(view: ViewMode, anchor: NaiveDate) -> String {
    match view {
        ViewMode::Day => fmt_date(anchor),
        ViewMode::Week => format!("Week of {}", fmt_date(dates::start_of_week(anchor))),
        ViewMode::Month => anchor.format("%B %Y").to_string(),
    }
}

pub fn render_view<Tz: TimeZone>(
    view: ViewMode,
    events: &[Event],
    anchor: NaiveDate,
    today: NaiveDate,
    tz: &Tz,
) -> String
where
    Tz::Offset: Display,
{
    let body = match view {
        ViewMode::Day => day_view(events, anchor, tz),
        ViewMode::Week => week_view(events, anchor, today, tz),
        ViewMode::Month => month_view(events, anchor, today, tz),
    };

    format!("{}\n\n{}", view_title(view, anchor).bold(), body)
}

/// One line per event on `day`, with descriptions underneath.
pub fn day_view<Tz: TimeZone>(events: &[Event], day: NaiveDate, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let on_day = events_on(events, day, tz);
    if on_day.is_empty() {
        return format!("  {}", "No events for this day.".dimmed());
    }

    let mut lines = Vec::new();
    for event in on_day {
        lines.push(format!("  {}", event_line(event, tz)));
        if let Some(description) = &event.description {
            lines.push(format!("      {}", description.dimmed()));
        }
    }
    lines.join("\n")
}

/// Each day of the week with its events.
pub fn week_view<Tz: TimeZone>(
    events: &[Event],
    anchor: NaiveDate,
    today: NaiveDate,
    tz: &Tz,
) -> String
where
    Tz::Offset: Display,
{
    let groups = group_by_day(events, &ViewMode::Week.days(anchor), tz);

    let mut lines = Vec::new();
    for (day, day_events) in &groups {
        lines.push(day_label(*day, today));
        if day_events.is_empty() {
            lines.push(format!("  {}", "-".dimmed()));
        }
        for event in day_events {
            lines.push(format!("  {}", event_line(event, tz)));
        }
    }
    lines.join("\n")
}

/// Monday-first grid of the month with an event count per day.
pub fn month_view<Tz: TimeZone>(
    events: &[Event],
    anchor: NaiveDate,
    today: NaiveDate,
    tz: &Tz,
) -> String {
    let grid = ViewMode::Month.days(anchor);
    let groups = group_by_day(events, &grid, tz);

    let mut lines = vec![
        ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
            .iter()
            .map(|d| format!("{:<width$}", d, width = CELL_WIDTH))
            .collect::<String>()
            .trim_end()
            .dimmed()
            .to_string(),
    ];

    for week in grid.chunks(7) {
        let row: String = week
            .iter()
            .map(|day| {
                let count = groups.get(day).map_or(0, Vec::len);
                month_cell(*day, count, anchor.month(), today)
            })
            .collect();
        lines.push(row);
    }

    let in_month = events
        .iter()
        .filter(|e| {
            let day = local_day(&e.start, tz);
            day.year() == anchor.year() && day.month() == anchor.month()
        })
        .count();
    lines.push(String::new());
    lines.push(
        format!("{} {} this month", in_month, pluralize("event", in_month))
            .dimmed()
            .to_string(),
    );

    lines.join("\n")
}

fn month_cell(day: NaiveDate, count: usize, month: u32, today: NaiveDate) -> String {
    let marker = if count > 0 { format!("*{count}") } else { String::new() };
    let text = format!("{:>2}{:<width$}", day.day(), marker, width = CELL_WIDTH - 2);

    if day == today {
        text.reversed().to_string()
    } else if day.month() != month {
        text.dimmed().to_string()
    } else if count > 0 {
        text.cyan().to_string()
    } else {
        text
    }
}

/// "09:00 – 10:00  Standup  3f2a9c1e"
pub fn event_line<Tz: TimeZone>(event: &Event, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    format!(
        "{}  {}  {}",
        event.render_time_span(tz),
        event.title,
        short_id(&event.id).dimmed()
    )
}

/// Day heading for lists, e.g. "Today", "Tomorrow" or "Wed Aug 6".
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    let label = match (day - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => day.format("%a %b %-d").to_string(),
    };

    if day == today {
        label.bold().underline().to_string()
    } else {
        label.bold().to_string()
    }
}

/// Every event, grouped under a heading per day.
pub fn event_list<Tz: TimeZone>(events: &[Event], today: NaiveDate, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    if events.is_empty() {
        return "No events found".dimmed().to_string();
    }

    let mut lines = Vec::new();
    let mut current_day: Option<NaiveDate> = None;

    for event in events {
        let day = local_day(&event.start, tz);

        if current_day != Some(day) {
            if current_day.is_some() {
                lines.push(String::new());
            }
            lines.push(format!("{}  {}", day_label(day, today), fmt_date(day).dimmed()));
            current_day = Some(day);
        }

        lines.push(format!("  {}", event_line(event, tz)));
    }

    lines.join("\n")
}

/// Warning shown when a new event overlaps existing ones.
pub fn overlap_warning<Tz: TimeZone>(created: &Created, tz: &Tz) -> Option<String>
where
    Tz::Offset: Display,
{
    if created.overlaps.is_empty() {
        return None;
    }

    let mut lines = vec![format!(
        "  Warning: \"{}\" overlaps {} {}:",
        created.event.title,
        created.overlaps.len(),
        pluralize("event", created.overlaps.len())
    )];
    for other in &created.overlaps {
        lines.push(format!("    {}  {}", other.render_time_span(tz), other.title));
    }

    Some(lines.join("\n").yellow().to_string())
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
