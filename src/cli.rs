//! CLI definitions for promstack.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Promstack CLI.
#[derive(Parser)]
#[command(name = "promstack")]
#[command(about = "Supervised bring-up and operator view for a local monitoring stack")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "promstack.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Bring up the monitoring stack and report until interrupted (default)
    Up {
        /// Do not open the dashboard after verification
        #[arg(long)]
        no_dashboard: bool,
    },

    /// Probe every tracked dependency once and show the result
    Status,

    /// Fetch and print one metric snapshot
    Metrics,

    /// Fetch and print the active alert list
    Alerts,

    /// Open the local dashboard
    Dashboard,
}
