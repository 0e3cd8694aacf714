//! # Promstack Telemetry
//!
//! Read-only operator view over the running monitoring stack.
//!
//! ## Features
//!
//! - Instant-query client for the metrics engine
//! - Active-alert client for the alert status endpoint
//! - Best-effort snapshots: a failing fetch yields "unavailable" for that
//!   entry only
//! - Fixed-interval reporting loop with cooperative shutdown
//! - Local dashboard opening

pub mod client;
pub mod dashboard;
pub mod error;
pub mod report;
pub mod snapshot;

pub use client::{ActiveAlert, AlertsClient, MetricsClient};
pub use dashboard::open_dashboard;
pub use error::TelemetryError;
pub use report::{print_alerts, print_snapshot, report_cycle, run_loop};
pub use snapshot::{MetricReading, Snapshot, TelemetryReporter};
