//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exporter: ExporterConfig,

    #[serde(default = "ProcessConfig::alertmanager_defaults")]
    pub alertmanager: ProcessConfig,

    #[serde(default = "ProcessConfig::prometheus_defaults")]
    pub prometheus: ProcessConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exporter: ExporterConfig::default(),
            alertmanager: ProcessConfig::alertmanager_defaults(),
            prometheus: ProcessConfig::prometheus_defaults(),
            poll: PollConfig::default(),
            report: ReportConfig::default(),
            dashboard: DashboardConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exporter.service_name.is_empty() {
            return Err(ConfigError::Invalid(
                "exporter.service_name must not be empty".to_string(),
            ));
        }
        for (section, process) in [
            ("alertmanager", &self.alertmanager),
            ("prometheus", &self.prometheus),
        ] {
            if process.url.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{}.url must not be empty",
                    section
                )));
            }
            if process.candidate_paths.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{}.candidate_paths must list at least one location",
                    section
                )));
            }
        }
        self.poll.validate()?;
        self.report.validate()?;
        Ok(())
    }
}

/// OS-managed metrics exporter service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Host service name as known to the service manager.
    #[serde(default = "default_exporter_service")]
    pub service_name: String,

    /// Metrics endpoint used for reachability checks.
    #[serde(default = "default_exporter_url")]
    pub metrics_url: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            service_name: default_exporter_service(),
            metrics_url: default_exporter_url(),
        }
    }
}

fn default_exporter_service() -> String {
    "windows_exporter".to_string()
}

fn default_exporter_url() -> String {
    "http://localhost:9182/metrics".to_string()
}

/// A supervised external process (alert router or metrics engine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Candidate executable locations, checked in order; the first existing
    /// path wins. Relative paths resolve against the working directory.
    #[serde(default)]
    pub candidate_paths: Vec<PathBuf>,

    /// Configuration file passed as `--config.file=...`. When absent, a
    /// sibling of the resolved executable is used.
    #[serde(default)]
    pub config_file: Option<PathBuf>,

    /// Root URL probed for readiness.
    #[serde(default)]
    pub url: String,
}

impl ProcessConfig {
    pub(crate) fn alertmanager_defaults() -> Self {
        Self {
            candidate_paths: vec![
                PathBuf::from("alertmanager-0.28.1.windows-amd64/alertmanager.exe"),
                PathBuf::from("alertmanager.exe"),
                PathBuf::from("alertmanager"),
            ],
            config_file: None,
            url: "http://localhost:9093".to_string(),
        }
    }

    pub(crate) fn prometheus_defaults() -> Self {
        Self {
            candidate_paths: vec![
                PathBuf::from("prometheus-3.7.2.windows-amd64/prometheus.exe"),
                PathBuf::from("prometheus.exe"),
                PathBuf::from("prometheus"),
            ],
            config_file: Some(PathBuf::from("prometheus.yml")),
            url: "http://localhost:9090".to_string(),
        }
    }
}

/// Readiness polling budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds slept between probe attempts.
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Per-probe HTTP timeout in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Attempt ceiling while waiting for the exporter service.
    #[serde(default = "default_exporter_attempts")]
    pub exporter_attempts: u32,

    /// Attempt ceiling while waiting for the alert router.
    #[serde(default = "default_alertmanager_attempts")]
    pub alertmanager_attempts: u32,

    /// Attempt ceiling while waiting for the metrics engine.
    #[serde(default = "default_prometheus_attempts")]
    pub prometheus_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            probe_timeout_secs: default_probe_timeout(),
            exporter_attempts: default_exporter_attempts(),
            alertmanager_attempts: default_alertmanager_attempts(),
            prometheus_attempts: default_prometheus_attempts(),
        }
    }
}

fn default_poll_interval() -> u64 {
    2
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_exporter_attempts() -> u32 {
    5
}

fn default_alertmanager_attempts() -> u32 {
    10
}

fn default_prometheus_attempts() -> u32 {
    15
}

impl PollConfig {
    /// Get the poll interval as a Duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Get the probe timeout as a Duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll.interval_secs must be > 0".to_string(),
            ));
        }
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll.probe_timeout_secs must be > 0".to_string(),
            ));
        }
        for (name, attempts) in [
            ("poll.exporter_attempts", self.exporter_attempts),
            ("poll.alertmanager_attempts", self.alertmanager_attempts),
            ("poll.prometheus_attempts", self.prometheus_attempts),
        ] {
            if attempts == 0 {
                return Err(ConfigError::Invalid(format!("{} must be > 0", name)));
            }
        }
        Ok(())
    }
}

/// A named instant query evaluated for each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricQuery {
    /// Display name.
    pub name: String,
    /// Query expression sent to the metrics engine.
    pub expr: String,
}

/// Periodic reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Seconds between reporting cycles.
    #[serde(default = "default_report_interval")]
    pub interval_secs: u64,

    /// Metric queries included in each snapshot.
    #[serde(default = "default_queries")]
    pub queries: Vec<MetricQuery>,

    /// Base URL for the alert-status endpoint. Defaults to the metrics
    /// engine root when absent.
    #[serde(default)]
    pub alerts_url: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_report_interval(),
            queries: default_queries(),
            alerts_url: None,
        }
    }
}

fn default_report_interval() -> u64 {
    30
}

fn default_queries() -> Vec<MetricQuery> {
    vec![
        MetricQuery {
            name: "CPU Usage".to_string(),
            expr: r#"100 - (avg(rate(windows_cpu_time_total{mode="idle"}[1m])) * 100)"#
                .to_string(),
        },
        MetricQuery {
            name: "Memory Usage".to_string(),
            expr: "100 - ((windows_memory_available_bytes / windows_memory_physical_total_bytes) * 100)"
                .to_string(),
        },
        MetricQuery {
            name: "Disk Usage".to_string(),
            expr: r#"100 - ((windows_logical_disk_free_bytes{volume="C:"} / windows_logical_disk_size_bytes{volume="C:"}) * 100)"#
                .to_string(),
        },
    ]
}

impl ReportConfig {
    /// Get the reporting interval as a Duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "report.interval_secs must be > 0".to_string(),
            ));
        }
        for query in &self.queries {
            if query.name.is_empty() || query.expr.is_empty() {
                return Err(ConfigError::Invalid(
                    "report.queries entries need both name and expr".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Local dashboard artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Path to the dashboard HTML file.
    #[serde(default = "default_dashboard_path")]
    pub path: PathBuf,

    /// Whether to open the dashboard once the stack is verified.
    #[serde(default = "default_true")]
    pub open_on_start: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            path: default_dashboard_path(),
            open_on_start: default_true(),
        }
    }
}

fn default_dashboard_path() -> PathBuf {
    PathBuf::from("dashboard.html")
}

fn default_true() -> bool {
    true
}

/// Log output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory for rolling log files. Defaults to `~/.promstack/debug`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_poll_budgets() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval(), Duration::from_secs(2));
        assert_eq!(poll.probe_timeout(), Duration::from_secs(5));
        assert_eq!(poll.alertmanager_attempts, 10);
        assert_eq!(poll.prometheus_attempts, 15);
    }

    #[test]
    fn test_default_queries_present() {
        let report = ReportConfig::default();
        assert_eq!(report.queries.len(), 3);
        assert_eq!(report.interval(), Duration::from_secs(30));
        assert!(report.queries.iter().any(|q| q.name == "CPU Usage"));
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = Config::default();
        config.poll.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_attempts() {
        let mut config = Config::default();
        config.poll.prometheus_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_service_name() {
        let mut config = Config::default();
        config.exporter.service_name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_candidates() {
        let mut config = Config::default();
        config.prometheus.candidate_paths.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_query_missing_expr() {
        let mut config = Config::default();
        config.report.queries.push(MetricQuery {
            name: "Broken".to_string(),
            expr: String::new(),
        });
        assert!(config.validate().is_err());
    }
}
