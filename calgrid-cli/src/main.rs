mod commands;
mod render;

use anyhow::{Context, Result};
use calgrid_core::calendar::Calendar;
use calgrid_core::config::CalGridConfig;
use calgrid_core::store::FileStore;
use calgrid_core::view::ViewMode;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::commands::add::AddArgs;

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Day, week and month views of a local calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a day, week or month view
    Show {
        /// day, week or month (defaults to the configured view)
        #[arg(short, long)]
        view: Option<ViewMode>,

        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Move by this many views, e.g. -1 for the previous week
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Create an event (prompts for the title if omitted)
    Add {
        title: Option<String>,

        /// Day of the event (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Start time (HH:MM), defaults to 09:00
        #[arg(short, long)]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Length instead of an end time (e.g. "45m", "2h")
        #[arg(long)]
        duration: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an event by id or unique id prefix
    Delete { id: String },
    /// List all events
    List,
    /// Show config paths and settings
    Config {
        /// Save a new default view (day, week or month)
        #[arg(long)]
        default_view: Option<ViewMode>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = CalGridConfig::load()?;

    match cli.command {
        Commands::Show { view, date, offset } => commands::show::run(
            open_calendar(&config)?.events(),
            view.unwrap_or(config.default_view),
            date,
            offset,
        ),
        Commands::Add {
            title,
            date,
            start,
            end,
            duration,
            description,
        } => commands::add::run(
            &mut open_calendar(&config)?,
            AddArgs {
                title,
                date,
                start,
                end,
                duration,
                description,
            },
        ),
        Commands::Delete { id } => commands::delete::run(&mut open_calendar(&config)?, &id),
        Commands::List => commands::list::run(open_calendar(&config)?.events()),
        Commands::Config { default_view } => commands::config::run(&mut config, default_view),
    }
}

fn open_calendar(config: &CalGridConfig) -> Result<Calendar<FileStore>> {
    let data_path = config.data_path();
    tracing::debug!(path = %data_path.display(), "Opening event store");

    let store = FileStore::open(&data_path)
        .with_context(|| format!("Could not open event store in {}", data_path.display()))?;
    let store_path = store.path().to_path_buf();

    Calendar::load(store, config.id_scheme.generator())
        .with_context(|| format!("Could not load events from {}", store_path.display()))
}
