use anyhow::{Context, Result};
use calgrid_core::calendar::Calendar;
use calgrid_core::dates;
use calgrid_core::event::{DEFAULT_START, EventDraft, parse_wall_time};
use calgrid_core::store::KeyValueStore;
use chrono::{Duration, Local, NaiveDate, TimeZone};
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::render;

/// Length of a new event when neither an end nor a duration is given
const DEFAULT_LENGTH_MINUTES: i64 = 60;

pub struct AddArgs {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

pub fn run<S: KeyValueStore>(calendar: &mut Calendar<S>, args: AddArgs) -> Result<()> {
    let title = match args.title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let day = args.date.unwrap_or_else(|| Local::now().date_naive());

    let draft = build_draft(
        title,
        args.description,
        day,
        args.start.as_deref(),
        args.end.as_deref(),
        args.duration.as_deref(),
        &Local,
    )?;

    let created = calendar.add(draft)?;

    println!(
        "{}",
        format!(
            "  Created: {} on {} ({})",
            created.event.title,
            dates::fmt_date(day),
            created.event.render_time_span(&Local)
        )
        .green()
    );

    if let Some(warning) = render::overlap_warning(&created, &Local) {
        eprintln!("{warning}");
    }

    Ok(())
}

/// Turn command-line times into a draft on `day`.
///
/// Start defaults to 09:00. The end comes from `end` if given, else from
/// `duration`, else one hour after the start.
fn build_draft<Tz: TimeZone>(
    title: String,
    description: Option<String>,
    day: NaiveDate,
    start: Option<&str>,
    end: Option<&str>,
    duration: Option<&str>,
    tz: &Tz,
) -> Result<EventDraft> {
    let start_time = parse_wall_time(start.unwrap_or(DEFAULT_START))?;

    if let Some(end) = end {
        let end_time = parse_wall_time(end)?;
        return Ok(EventDraft::on_day(
            title,
            description,
            day,
            start_time,
            end_time,
            tz,
        ));
    }

    let start_at = dates::resolve_local(day.and_time(start_time), tz);
    let length = match duration {
        Some(d) => parse_duration(d)?,
        None => Duration::minutes(DEFAULT_LENGTH_MINUTES),
    };

    let end_at = start_at
        .checked_add_signed(length)
        .context("Duration too large")?;

    Ok(EventDraft::new(title, description, start_at, end_at))
}

fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}
