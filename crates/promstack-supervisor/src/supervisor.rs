//! Stage-by-stage bring-up of the monitoring stack.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use promstack_config::{first_existing, Config, ProcessConfig};

use crate::error::{StageFailure, SupervisorError};
use crate::launcher::{LaunchSpec, ManagedProcess, ProcessLauncher};
use crate::poller::{PollOutcome, ReadinessPoller};
use crate::probe::{ServiceEndpoint, StatusProbe};
use crate::service::{ServiceManager, ServiceState};

pub use crate::error::Stage;

/// What the bring-up actually did per dependency.
#[derive(Debug, Clone, Default)]
pub struct StackReport {
    /// Dependencies started or launched by this run.
    pub launched: Vec<String>,
    /// Dependencies that were already up and were left alone.
    pub already_up: Vec<String>,
}

/// Sequences the bring-up of the exporter service, the alert router, and
/// the metrics engine, and owns every process it launches.
///
/// The pipeline is strictly linear: the first stage that cannot be
/// confirmed aborts the remainder. Already-confirmed stages are neither
/// rolled back nor retried.
pub struct Supervisor {
    config: Config,
    probe: Arc<dyn StatusProbe>,
    service: Box<dyn ServiceManager>,
    launcher: Box<dyn ProcessLauncher>,
    processes: Vec<ManagedProcess>,
}

impl Supervisor {
    /// Create a supervisor over the given collaborators.
    pub fn new(
        config: Config,
        probe: Arc<dyn StatusProbe>,
        service: Box<dyn ServiceManager>,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            config,
            probe,
            service,
            launcher,
            processes: Vec::new(),
        }
    }

    /// Endpoints checked by the final verification pass.
    pub fn endpoints(&self) -> Vec<ServiceEndpoint> {
        vec![
            ServiceEndpoint::new("exporter", &self.config.exporter.metrics_url),
            ServiceEndpoint::new("prometheus", &self.config.prometheus.url),
            ServiceEndpoint::new("alertmanager", &self.config.alertmanager.url),
        ]
    }

    /// Processes launched (and still owned) by this supervisor.
    pub fn owned_processes(&self) -> &[ManagedProcess] {
        &self.processes
    }

    /// Bring up every dependency in order, failing fast on the first stage
    /// that cannot be confirmed, then verify all endpoints in one pass.
    pub async fn bring_up(&mut self) -> Result<StackReport, StageFailure> {
        let mut report = StackReport::default();

        self.ensure_exporter(&mut report)
            .await
            .map_err(|error| StageFailure {
                stage: Stage::Exporter,
                error,
            })?;

        let alertmanager = self.config.alertmanager.clone();
        let attempts = self.config.poll.alertmanager_attempts;
        self.ensure_process(Stage::AlertRouter, &alertmanager, attempts, &mut report)
            .await
            .map_err(|error| StageFailure {
                stage: Stage::AlertRouter,
                error,
            })?;

        let prometheus = self.config.prometheus.clone();
        let attempts = self.config.poll.prometheus_attempts;
        self.ensure_process(Stage::MetricsEngine, &prometheus, attempts, &mut report)
            .await
            .map_err(|error| StageFailure {
                stage: Stage::MetricsEngine,
                error,
            })?;

        self.verify_all().await.map_err(|error| StageFailure {
            stage: Stage::Verification,
            error,
        })?;

        info!("All services started successfully");
        Ok(report)
    }

    /// Ensure the OS-managed exporter service is running.
    async fn ensure_exporter(&mut self, report: &mut StackReport) -> Result<(), SupervisorError> {
        let service_name = self.service.name().to_string();
        info!("Checking {} service...", service_name);

        if self.service.query() == ServiceState::Running {
            info!("{} is already running", service_name);
            report.already_up.push(service_name);
            return Ok(());
        }

        info!("Starting {} service...", service_name);
        self.service.start()?;

        let poller = ReadinessPoller::new(
            self.config.poll.interval(),
            self.config.poll.exporter_attempts,
        );
        let service = self.service.as_ref();
        let outcome = poller
            .await_ready(|| {
                let state = service.query();
                async move { state == ServiceState::Running }
            })
            .await;

        match outcome {
            PollOutcome::Ready => {
                info!("{} started successfully", service_name);
                report.launched.push(service_name);
                Ok(())
            }
            PollOutcome::TimedOut { attempts } => Err(SupervisorError::ReadinessTimeout {
                name: service_name,
                attempts,
            }),
        }
    }

    /// Ensure a launched dependency answers at its URL, starting it if it
    /// is not already reachable.
    async fn ensure_process(
        &mut self,
        stage: Stage,
        process: &ProcessConfig,
        max_attempts: u32,
        report: &mut StackReport,
    ) -> Result<(), SupervisorError> {
        let name = stage.to_string();
        info!("Checking {}...", name);

        if self.probe.probe(&process.url).await {
            info!("{} is already running at {}", name, process.url);
            report.already_up.push(name);
            return Ok(());
        }

        let executable = first_existing(&process.candidate_paths).ok_or_else(|| {
            SupervisorError::ExecutableNotFound {
                name: name.clone(),
                searched: process.candidate_paths.clone(),
            }
        })?;

        let config_file = match &process.config_file {
            Some(path) => path.clone(),
            None => executable
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(format!("{}.yml", name)),
        };

        info!("Starting {}...", name);
        let spec = LaunchSpec::with_config_file(&name, executable, &config_file);
        let handle = self.launcher.launch(&spec).await?;
        self.processes.push(handle);

        let poller = ReadinessPoller::new(self.config.poll.interval(), max_attempts);
        let probe = Arc::clone(&self.probe);
        let url = process.url.clone();
        let outcome = poller
            .await_ready(|| {
                let probe = Arc::clone(&probe);
                let url = url.clone();
                async move { probe.probe(&url).await }
            })
            .await;

        match outcome {
            PollOutcome::Ready => {
                info!("{} started successfully", name);
                report.launched.push(name);
                Ok(())
            }
            PollOutcome::TimedOut { attempts } => {
                Err(SupervisorError::ReadinessTimeout { name, attempts })
            }
        }
    }

    /// Re-probe every tracked endpoint in one pass.
    ///
    /// Deliberately redundant with the per-stage checks: it is the first
    /// HTTP-level confirmation the OS-managed exporter gets, and it
    /// requires all three dependencies to answer in the same pass.
    async fn verify_all(&self) -> Result<(), SupervisorError> {
        info!("Verifying services...");
        let mut unreachable = Vec::new();

        for endpoint in self.endpoints() {
            if self.probe.probe(&endpoint.probe_url).await {
                info!("{} is accessible at {}", endpoint.name, endpoint.probe_url);
            } else {
                warn!(
                    "{} is NOT accessible at {}",
                    endpoint.name, endpoint.probe_url
                );
                unreachable.push(endpoint.name);
            }
        }

        if unreachable.is_empty() {
            Ok(())
        } else {
            Err(SupervisorError::Verification { unreachable })
        }
    }

    /// Terminate every process this supervisor launched.
    ///
    /// Never touches the OS-managed exporter service. Safe to call more
    /// than once, or when nothing was ever launched.
    pub fn shutdown(&mut self) {
        if self.processes.is_empty() {
            debug!("No owned processes to stop");
            return;
        }

        info!("Stopping owned processes...");
        for process in &mut self.processes {
            process.terminate();
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
