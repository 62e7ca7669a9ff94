use anyhow::Result;
use calgrid_core::calendar::Calendar;
use calgrid_core::store::KeyValueStore;
use chrono::Local;
use owo_colors::OwoColorize;

pub fn run<S: KeyValueStore>(calendar: &mut Calendar<S>, id_or_prefix: &str) -> Result<()> {
    let id = calendar.find(id_or_prefix)?.id.clone();
    let removed = calendar.delete(&id)?;

    println!(
        "{}",
        format!(
            "  Deleted: {} ({})",
            removed.title,
            removed.render_time_span(&Local)
        )
        .red()
    );

    Ok(())
}
