//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::load_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/monitoring`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.exporter.service_name, "windows_exporter");
        assert_eq!(config.prometheus.url, "http://localhost:9090");
        assert_eq!(config.alertmanager.url, "http://localhost:9093");
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [exporter]
            service_name = "node_exporter"
            metrics_url = "http://localhost:9100/metrics"

            [poll]
            interval_secs = 1
            prometheus_attempts = 3
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.exporter.service_name, "node_exporter");
        assert_eq!(config.poll.interval_secs, 1);
        assert_eq!(config.poll.prometheus_attempts, 3);
        // Untouched sections keep their defaults.
        assert_eq!(config.poll.alertmanager_attempts, 10);
    }

    #[test]
    fn test_load_process_section() {
        let content = r#"
            [prometheus]
            candidate_paths = ["/opt/prometheus/prometheus"]
            config_file = "/etc/prometheus/prometheus.yml"
            url = "http://127.0.0.1:9090"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.prometheus.candidate_paths.len(), 1);
        assert_eq!(config.prometheus.url, "http://127.0.0.1:9090");
    }

    #[test]
    fn test_load_queries() {
        let content = r#"
            [[report.queries]]
            name = "Load"
            expr = "node_load1"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.report.queries.len(), 1);
        assert_eq!(config.report.queries[0].name, "Load");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[report]").unwrap();
        writeln!(file, "interval_secs = 10").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.report.interval_secs, 10);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/promstack.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let content = r#"
            [poll]
            interval_secs = 0
        "#;
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PROMSTACK_TEST_URL", "http://localhost:9999");
        }
        let content = "[prometheus]\nurl = \"${PROMSTACK_TEST_URL}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.prometheus.url, "http://localhost:9999");
        unsafe {
            std::env::remove_var("PROMSTACK_TEST_URL");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "[prometheus]\nurl = \"${PROMSTACK_UNSET_VAR_12345}\"";
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path("~/monitoring");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/monitoring"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/bin";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }
}
