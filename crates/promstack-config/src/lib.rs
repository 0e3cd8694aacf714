//! # Promstack Config
//!
//! Configuration for the monitoring-stack supervisor.
//!
//! ## Features
//!
//! - TOML configuration with serde defaults for every field
//! - `${VAR}` environment variable expansion and `~` path expansion
//! - Executable discovery over an ordered candidate list
//! - Validation of poll budgets and endpoint URLs

pub mod discover;
pub mod error;
pub mod loader;
pub mod schema;

pub use discover::first_existing;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    Config, DashboardConfig, ExporterConfig, LogConfig, MetricQuery, PollConfig, ProcessConfig,
    ReportConfig,
};
