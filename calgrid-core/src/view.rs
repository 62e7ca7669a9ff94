//! Calendar view modes and anchor navigation.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    Week,
    #[default]
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Day, ViewMode::Week, ViewMode::Month];

    /// Move `anchor` by `steps` days, weeks or months (negative goes back).
    ///
    /// Month steps clamp to the last day of the target month, so
    /// January 31st plus one month is the last day of February.
    pub fn step(self, anchor: NaiveDate, steps: i32) -> NaiveDate {
        let magnitude = steps.unsigned_abs();
        let forward = steps >= 0;

        let moved = match self {
            ViewMode::Day | ViewMode::Week => {
                let per_step = if self == ViewMode::Week { 7 } else { 1 };
                let days = Days::new(u64::from(magnitude) * per_step);
                if forward {
                    anchor.checked_add_days(days)
                } else {
                    anchor.checked_sub_days(days)
                }
            }
            ViewMode::Month => {
                let months = Months::new(magnitude);
                if forward {
                    anchor.checked_add_months(months)
                } else {
                    anchor.checked_sub_months(months)
                }
            }
        };

        moved.unwrap_or(anchor)
    }

    /// The days shown by this view for `anchor`.
    pub fn days(self, anchor: NaiveDate) -> Vec<NaiveDate> {
        match self {
            ViewMode::Day => vec![anchor],
            ViewMode::Week => dates::week_days(anchor).to_vec(),
            ViewMode::Month => dates::month_grid(anchor),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Day => write!(f, "day"),
            ViewMode::Week => write!(f, "week"),
            ViewMode::Month => write!(f, "month"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();

        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.to_string() == wanted)
            .ok_or_else(|| format!("Unknown view '{wanted}'. Expected one of: day, week, month"))
    }
}
