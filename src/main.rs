//! Syncpad - a terminal notepad that keeps one file in sync with its buffer.
//!
//! # Usage
//!
//! ```bash
//! syncpad notes.txt
//! syncpad --interval 250 notes.txt
//! syncpad --log-file /tmp/syncpad.log
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use syncpad::app::App;
use syncpad::config::preference_file_path;

/// A terminal notepad whose buffer is continuously synced with a file
#[derive(Parser, Debug)]
#[command(name = "syncpad", version, about, long_about = None)]
struct Cli {
    /// File to edit; defaults to the one edited last
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Milliseconds between sync checks
    #[arg(long, value_name = "MS", default_value_t = 500,
          value_parser = clap::value_parser!(u64).range(10..))]
    interval: u64,

    /// Preference file remembering the last edited file
    #[arg(long, value_name = "PATH")]
    prefs: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the editor)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let file = cli.file.map(|f| std::path::absolute(&f).unwrap_or(f));
    let prefs = cli.prefs.unwrap_or_else(preference_file_path);

    App::new()
        .with_initial_file(file)
        .with_poll_interval(Duration::from_millis(cli.interval))
        .with_preferences_path(Some(prefs))
        .run()
        .context("Application error")
}
