//! Detached process launching and handle ownership.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::error::SupervisorError;

/// What to launch and where.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Display name of the process.
    pub name: String,
    /// Resolved executable path.
    pub executable: PathBuf,
    /// Argument list, in order.
    pub args: Vec<String>,
    /// Working directory for the child.
    pub working_dir: PathBuf,
}

impl LaunchSpec {
    /// Spec for an executable taking a single `--config.file=` argument and
    /// running from its own directory.
    pub fn with_config_file(
        name: impl Into<String>,
        executable: PathBuf,
        config_file: &Path,
    ) -> Self {
        let working_dir = executable
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            name: name.into(),
            args: vec![format!("--config.file={}", config_file.display())],
            executable,
            working_dir,
        }
    }
}

/// A child process whose lifecycle the supervisor owns.
///
/// The handle is populated at launch and cleared exactly once, on
/// termination; no other component holds it.
#[derive(Debug)]
pub struct ManagedProcess {
    name: String,
    child: Option<Child>,
}

impl ManagedProcess {
    /// Handle for a dependency found already running; owns no child.
    pub fn unattached(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            child: None,
        }
    }

    pub(crate) fn attached(name: impl Into<String>, child: Child) -> Self {
        Self {
            name: name.into(),
            child: Some(child),
        }
    }

    /// Process display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// OS process id while the handle is held.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Whether this handle still owns a live child.
    pub fn is_attached(&self) -> bool {
        self.child.is_some()
    }

    /// Send a graceful terminate and clear the handle. Does not wait for the
    /// child to exit. A second call is a no-op.
    pub fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            debug!("{}: no handle to terminate", self.name);
            return;
        };

        match child.id() {
            Some(pid) => match send_terminate(pid, &mut child) {
                Ok(()) => info!("Sent terminate to {} (PID {})", self.name, pid),
                Err(e) => warn!("Failed to terminate {} (PID {}): {}", self.name, pid, e),
            },
            None => debug!("{} already exited", self.name),
        }
    }
}

#[cfg(unix)]
fn send_terminate(pid: u32, _child: &mut Child) -> std::io::Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(std::io::Error::other)
}

#[cfg(not(unix))]
fn send_terminate(_pid: u32, child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}

/// Starts external executables as detached children.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Launch the process described by `spec` and hand back its handle.
    /// Never waits for readiness.
    async fn launch(&self, spec: &LaunchSpec) -> Result<ManagedProcess, SupervisorError>;
}

/// Spawns children detached from the controlling terminal, with stdio
/// captured on the handle for diagnostics.
pub struct DetachedLauncher;

#[async_trait]
impl ProcessLauncher for DetachedLauncher {
    async fn launch(&self, spec: &LaunchSpec) -> Result<ManagedProcess, SupervisorError> {
        if !spec.executable.exists() {
            return Err(SupervisorError::ExecutableNotFound {
                name: spec.name.clone(),
                searched: vec![spec.executable.clone()],
            });
        }

        let mut command = Command::new(&spec.executable);
        command
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        #[cfg(unix)]
        {
            command.process_group(0);
        }

        let child = command.spawn().map_err(|e| SupervisorError::SpawnFailed {
            name: spec.name.clone(),
            reason: e.to_string(),
        })?;

        info!(
            "Launched {} (PID {:?}) from {}",
            spec.name,
            child.id(),
            spec.executable.display()
        );
        Ok(ManagedProcess::attached(&spec.name, child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_with_config_file() {
        let spec = LaunchSpec::with_config_file(
            "alertmanager",
            PathBuf::from("/opt/alertmanager/alertmanager"),
            Path::new("/opt/alertmanager/alertmanager.yml"),
        );
        assert_eq!(spec.working_dir, PathBuf::from("/opt/alertmanager"));
        assert_eq!(
            spec.args,
            vec!["--config.file=/opt/alertmanager/alertmanager.yml".to_string()]
        );
    }

    #[test]
    fn test_spec_bare_executable_runs_in_cwd() {
        let spec = LaunchSpec::with_config_file(
            "prometheus",
            PathBuf::from("prometheus"),
            Path::new("prometheus.yml"),
        );
        assert_eq!(spec.working_dir, PathBuf::from("."));
    }

    #[test]
    fn test_unattached_handle() {
        let mut process = ManagedProcess::unattached("alertmanager");
        assert_eq!(process.name(), "alertmanager");
        assert!(!process.is_attached());
        assert!(process.pid().is_none());

        // Terminating without a handle is a no-op, twice over.
        process.terminate();
        process.terminate();
        assert!(!process.is_attached());
    }

    #[tokio::test]
    async fn test_launch_missing_executable() {
        let spec = LaunchSpec {
            name: "prometheus".to_string(),
            executable: PathBuf::from("/nonexistent/prometheus"),
            args: vec![],
            working_dir: PathBuf::from("/"),
        };
        let result = DetachedLauncher.launch(&spec).await;
        assert!(matches!(
            result,
            Err(SupervisorError::ExecutableNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_and_terminate() {
        let spec = LaunchSpec {
            name: "sleeper".to_string(),
            executable: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), "sleep 30".to_string()],
            working_dir: PathBuf::from("/"),
        };

        let mut process = DetachedLauncher.launch(&spec).await.unwrap();
        assert!(process.is_attached());
        assert!(process.pid().is_some());

        process.terminate();
        assert!(!process.is_attached());
        assert!(process.pid().is_none());

        // Handle is cleared exactly once; further calls do nothing.
        process.terminate();
    }
}
