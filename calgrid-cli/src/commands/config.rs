use std::path::Path;

use anyhow::{Context, Result};
use calgrid_core::config::CalGridConfig;
use calgrid_core::view::ViewMode;
use owo_colors::OwoColorize;

pub fn run(config: &mut CalGridConfig, default_view: Option<ViewMode>) -> Result<()> {
    let config_path = CalGridConfig::config_path()?;

    if let Some(view) = default_view {
        set_default_view(config, &config_path, view)?;
        println!("{}", format!("  Default view set to {view}").green());
        println!();
    }

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Events:  {}", config.data_path().display());
    println!();
    println!("{}", "Settings".bold());
    println!("  default_view:  {}", config.default_view);
    println!("  id_scheme:     {}", config.id_scheme);

    Ok(())
}

fn set_default_view(config: &mut CalGridConfig, path: &Path, view: ViewMode) -> Result<()> {
    config.default_view = view;
    config
        .save(path)
        .with_context(|| format!("Could not save {}", path.display()))
}
