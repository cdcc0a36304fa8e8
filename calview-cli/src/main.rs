mod commands;
mod ics;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use calview_core::{CalendarSettings, DEFAULT_DAYS, DateWindow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calview")]
#[command(about = "Show the appointments in a directory of .ics files as an agenda")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the agenda for a window of days
    Agenda {
        /// Directory containing .ics files
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// First day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        from: Option<String>,

        /// Number of days to show
        #[arg(long)]
        days: Option<u32>,

        /// Select the appointment with this UID
        #[arg(long)]
        select: Option<String>,
    },
    /// Show the settings file location and effective settings
    Settings,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_path = match cli.settings {
        Some(path) => path,
        None => CalendarSettings::config_path()?,
    };

    match cli.command {
        Commands::Agenda {
            dir,
            from,
            days,
            select,
        } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            if !dir.is_dir() {
                anyhow::bail!("'{}' is not a directory", dir.display());
            }
            let window = DateWindow::from_args(from.as_deref(), days, DEFAULT_DAYS)
                .map_err(|e| anyhow::anyhow!(e))?;
            let settings = CalendarSettings::load(&settings_path)?;
            commands::agenda::run(&dir, window, settings, select.as_deref())
        }
        Commands::Settings => commands::settings::run(&settings_path),
    }
}
