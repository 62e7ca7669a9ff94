use anyhow::Result;
use calgrid_core::event::Event;
use chrono::Local;

use crate::render;

pub fn run(events: &[Event]) -> Result<()> {
    let today = Local::now().date_naive();
    println!("{}", render::event_list(events, today, &Local));
    Ok(())
}
