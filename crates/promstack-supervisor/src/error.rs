//! Supervision errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while bringing up or tearing down the stack.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// No configured candidate location held the executable.
    #[error("executable not found; checked {searched:?}")]
    ExecutableNotFound { name: String, searched: Vec<PathBuf> },

    /// The OS refused to spawn the process.
    #[error("failed to spawn {name}: {reason}")]
    SpawnFailed { name: String, reason: String },

    /// The service manager rejected the start request.
    #[error("failed to start service {service}: {detail}")]
    ServiceStart { service: String, detail: String },

    /// The service manager denied the start request for lack of privileges.
    #[error("access denied starting service {service}; retry with elevated privileges")]
    PermissionDenied { service: String },

    /// The readiness poll budget ran out.
    #[error("{name} did not become ready within {attempts} attempts")]
    ReadinessTimeout { name: String, attempts: u32 },

    /// The final all-endpoints check found unreachable dependencies.
    #[error("unreachable endpoints: {}", .unreachable.join(", "))]
    Verification { unreachable: Vec<String> },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline stage for failure reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// OS-managed metrics exporter service.
    Exporter,
    /// Alert-routing process.
    AlertRouter,
    /// Metrics collection/query process.
    MetricsEngine,
    /// Final pass over every tracked endpoint.
    Verification,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Exporter => write!(f, "exporter"),
            Stage::AlertRouter => write!(f, "alertmanager"),
            Stage::MetricsEngine => write!(f, "prometheus"),
            Stage::Verification => write!(f, "verification"),
        }
    }
}

/// A startup pipeline aborted at a specific stage.
#[derive(Debug, Error)]
#[error("{stage}: {error}")]
pub struct StageFailure {
    /// Stage that failed.
    pub stage: Stage,
    /// What went wrong.
    pub error: SupervisorError,
}
