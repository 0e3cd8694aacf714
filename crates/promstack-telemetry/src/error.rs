//! Telemetry errors.

use thiserror::Error;

/// Errors raised by a single metric or alert fetch.
///
/// These never abort the reporting loop; callers render the entry as
/// unavailable and move on.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Request failed in transport.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("Unexpected HTTP status: {code}")]
    Status { code: u16 },

    /// The metrics engine rejected the query.
    #[error("Query rejected by the metrics engine: {status}")]
    QueryRejected { status: String },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The query evaluated to no samples.
    #[error("Query returned no samples")]
    EmptyResult,

    /// Dashboard could not be opened.
    #[error("Failed to open dashboard: {0}")]
    Dashboard(String),
}
