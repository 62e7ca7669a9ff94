//! Date grids for week and month views, plus display formatting.
//!
//! Grids are sequences of [`NaiveDate`]: a calendar day as seen on the local
//! wall clock. Weeks start on Monday. Use [`start_of_day`] to turn a grid day
//! back into the instant at which it begins in a given zone.

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use std::fmt;

/// Monday on or before `day`.
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    let offset = day.weekday().num_days_from_monday() as u64;
    day.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN)
}

/// Sunday on or after `day`.
pub fn end_of_week(day: NaiveDate) -> NaiveDate {
    let offset = 6 - day.weekday().num_days_from_monday() as u64;
    day.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX)
}

/// First day of the month containing `day`.
pub fn start_of_month(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.day0() as i64)
}

/// Last day of the month containing `day`.
pub fn end_of_month(day: NaiveDate) -> NaiveDate {
    match start_of_month(day).checked_add_months(Months::new(1)) {
        Some(next) => next - Duration::days(1),
        // Only the final representable month has no successor
        None => NaiveDate::MAX,
    }
}

/// The seven days (Monday through Sunday) of the week containing `anchor`.
pub fn week_days(anchor: NaiveDate) -> [NaiveDate; 7] {
    let start = start_of_week(anchor);
    std::array::from_fn(|i| {
        start
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(NaiveDate::MAX)
    })
}

/// Every day shown in a month view of the month containing `anchor`.
///
/// Runs from the Monday on or before the 1st to the Sunday on or after the
/// last day, so the grid is always made of complete weeks (28 to 42 days).
pub fn month_grid(anchor: NaiveDate) -> Vec<NaiveDate> {
    let start = start_of_week(start_of_month(anchor));
    let end = end_of_week(end_of_month(anchor));

    start.iter_days().take_while(|d| *d <= end).collect()
}

/// The calendar day an instant falls on in `tz`.
pub fn local_day<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// The instant at which `day` begins (00:00 wall clock) in `tz`.
pub fn start_of_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    resolve_local(day.and_time(NaiveTime::MIN), tz)
}

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (clocks going back) take the earlier instant. Times that
/// fall in a gap (clocks going forward) are pushed past the gap.
pub fn resolve_local<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }

    (1..=3)
        .filter_map(|h| naive.checked_add_signed(Duration::hours(h)))
        .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Long date form, e.g. "August 6th, 2025".
pub fn fmt_date(day: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        day.format("%B"),
        day.day(),
        ordinal_suffix(day.day()),
        day.year()
    )
}

/// 24-hour wall-clock time, e.g. "09:05".
pub fn fmt_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    dt.format("%H:%M").to_string()
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
