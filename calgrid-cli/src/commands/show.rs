use anyhow::Result;
use calgrid_core::event::Event;
use calgrid_core::view::ViewMode;
use chrono::{Local, NaiveDate};

use crate::render;

/// Print `view` around `anchor`, moved by `offset` views (negative goes back).
pub fn run(events: &[Event], view: ViewMode, anchor: Option<NaiveDate>, offset: i32) -> Result<()> {
    let today = Local::now().date_naive();
    let anchor = view.step(anchor.unwrap_or(today), offset);

    println!("{}", render::render_view(view, events, anchor, today, &Local));

    Ok(())
}
