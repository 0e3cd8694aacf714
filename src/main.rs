//! Promstack - monitoring stack launcher.
//!
//! Main entry point for the promstack CLI.

mod cli;
mod cmd_inspect;
mod cmd_up;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use promstack_config::{Config, ConfigLoader};

use crate::cli::{Cli, Commands};

/// Get the .promstack directory path.
fn promstack_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".promstack"))
        .unwrap_or_else(|| PathBuf::from(".promstack"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to the log directory with daily rotation.
fn init_tracing(log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("promstack")
        .filename_suffix("log")
        .max_log_files(30)
        .build(log_dir)?;

    // Create a non-blocking writer for file output
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Store the guard in a static to keep it alive for the program duration
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(_guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer (human-readable text format with colors)
        .with(fmt::layer().with_target(false).with_ansi(true))
        // File layer (text format without colors)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        ConfigLoader::load(&cli.config)?
    } else {
        Config::default()
    };

    let log_dir = config
        .log
        .dir
        .clone()
        .unwrap_or_else(|| promstack_dir().join("debug"));
    init_tracing(&log_dir)?;

    if cli.config.exists() {
        info!("Loaded configuration from {}", cli.config.display());
    } else {
        info!(
            "No configuration at {}; using defaults",
            cli.config.display()
        );
    }

    match cli.command {
        None => cmd_up::run(config, false).await,
        Some(Commands::Up { no_dashboard }) => cmd_up::run(config, no_dashboard).await,
        Some(Commands::Status) => cmd_inspect::status(config).await,
        Some(Commands::Metrics) => cmd_inspect::metrics(config).await,
        Some(Commands::Alerts) => cmd_inspect::alerts(config).await,
        Some(Commands::Dashboard) => cmd_inspect::dashboard(config),
    }
}
