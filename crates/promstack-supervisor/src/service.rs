//! OS service control through the platform service manager.

use tracing::{debug, warn};

use crate::error::SupervisorError;

/// Observed state of a host-level service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// The manager reports the service as running.
    Running,
    /// The manager answered, and the service is not running.
    NotRunning,
    /// The query itself failed (permission, absent service). A retryable
    /// negative, never fatal by itself.
    Unknown,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Running => write!(f, "running"),
            ServiceState::NotRunning => write!(f, "not running"),
            ServiceState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Query and start a named host-level service.
///
/// `start` only interprets the manager's immediate response; callers
/// re-query to observe the service actually coming up.
pub trait ServiceManager: Send + Sync {
    /// Service name as known to the manager.
    fn name(&self) -> &str;

    /// Query the current state.
    fn query(&self) -> ServiceState;

    /// Issue a start request. Does not wait for the service to be healthy.
    fn start(&self) -> Result<(), SupervisorError>;
}

/// Interpret `sc query` output.
fn parse_sc_query(stdout: &str) -> ServiceState {
    if stdout.contains("RUNNING") {
        ServiceState::Running
    } else if stdout.contains("STATE") {
        ServiceState::NotRunning
    } else {
        // No STATE line means the query itself failed (bad name, no access).
        ServiceState::Unknown
    }
}

/// Whether `sc start` output indicates the request was accepted.
fn sc_start_accepted(stdout: &str) -> bool {
    stdout.contains("START_PENDING") || stdout.contains("RUNNING")
}

/// Interpret `systemctl is-active` output.
fn parse_systemctl_state(stdout: &str) -> ServiceState {
    match stdout.trim() {
        "active" | "activating" => ServiceState::Running,
        "" | "unknown" => ServiceState::Unknown,
        _ => ServiceState::NotRunning,
    }
}

/// Whether manager output points at missing privileges.
fn is_permission_denied(output: &str) -> bool {
    let lowered = output.to_lowercase();
    lowered.contains("access is denied")
        || lowered.contains("access denied")
        || lowered.contains("permission denied")
        || lowered.contains("interactive authentication required")
}

/// Windows service control via `sc`.
#[cfg(windows)]
pub struct ScManager {
    service_name: String,
}

#[cfg(windows)]
impl ScManager {
    /// Create a controller for the named service.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

#[cfg(windows)]
impl ServiceManager for ScManager {
    fn name(&self) -> &str {
        &self.service_name
    }

    fn query(&self) -> ServiceState {
        let output = match std::process::Command::new("sc")
            .args(["query", &self.service_name])
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to execute sc query {}: {}", self.service_name, e);
                return ServiceState::Unknown;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let state = parse_sc_query(&stdout);
        debug!("Service {} is {}", self.service_name, state);
        state
    }

    fn start(&self) -> Result<(), SupervisorError> {
        let output = std::process::Command::new("sc")
            .args(["start", &self.service_name])
            .output()
            .map_err(|e| SupervisorError::ServiceStart {
                service: self.service_name.clone(),
                detail: format!("failed to execute sc: {}", e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if sc_start_accepted(&stdout) {
            return Ok(());
        }
        if is_permission_denied(&stdout) || is_permission_denied(&stderr) {
            return Err(SupervisorError::PermissionDenied {
                service: self.service_name.clone(),
            });
        }
        Err(SupervisorError::ServiceStart {
            service: self.service_name.clone(),
            detail: stdout.trim().to_string(),
        })
    }
}

/// Linux service control via `systemctl`.
#[cfg(unix)]
pub struct SystemctlManager {
    service_name: String,
}

#[cfg(unix)]
impl SystemctlManager {
    /// Create a controller for the named unit.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

#[cfg(unix)]
impl ServiceManager for SystemctlManager {
    fn name(&self) -> &str {
        &self.service_name
    }

    fn query(&self) -> ServiceState {
        let output = match std::process::Command::new("systemctl")
            .args(["is-active", &self.service_name])
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!(
                    "Failed to execute systemctl is-active {}: {}",
                    self.service_name, e
                );
                return ServiceState::Unknown;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let state = parse_systemctl_state(&stdout);
        debug!("Service {} is {}", self.service_name, state);
        state
    }

    fn start(&self) -> Result<(), SupervisorError> {
        let output = std::process::Command::new("systemctl")
            .args(["start", &self.service_name])
            .output()
            .map_err(|e| SupervisorError::ServiceStart {
                service: self.service_name.clone(),
                detail: format!("failed to execute systemctl: {}", e),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_permission_denied(&stderr) {
            return Err(SupervisorError::PermissionDenied {
                service: self.service_name.clone(),
            });
        }
        Err(SupervisorError::ServiceStart {
            service: self.service_name.clone(),
            detail: stderr.trim().to_string(),
        })
    }
}

/// Controller for the current platform's service manager.
#[cfg(windows)]
pub fn platform_manager(service_name: &str) -> Box<dyn ServiceManager> {
    Box::new(ScManager::new(service_name))
}

/// Controller for the current platform's service manager.
#[cfg(unix)]
pub fn platform_manager(service_name: &str) -> Box<dyn ServiceManager> {
    Box::new(SystemctlManager::new(service_name))
}
