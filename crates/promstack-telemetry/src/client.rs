//! HTTP clients for the metrics-engine and alert-status surfaces.

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::TelemetryError;

const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Instant-query response shape: `{status, data: {result: [{value: [ts, "num"]}]}}`.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    data: QueryData,
}

#[derive(Debug, Default, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<QuerySample>,
}

#[derive(Debug, Deserialize)]
struct QuerySample {
    value: (f64, String),
}

/// Client for the metrics engine's instant-query endpoint.
pub struct MetricsClient {
    base_url: String,
    client: reqwest::Client,
}

impl MetricsClient {
    /// Create a client for the given engine root URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Evaluate an instant query and return its first sample value.
    pub async fn instant_query(&self, expr: &str) -> Result<f64, TelemetryError> {
        let url = format!("{}/api/v1/query", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", expr)])
            .timeout(QUERY_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TelemetryError::Status {
                code: response.status().as_u16(),
            });
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| TelemetryError::Decode(e.to_string()))?;

        if body.status != "success" {
            return Err(TelemetryError::QueryRejected {
                status: body.status,
            });
        }

        let sample = body.data.result.first().ok_or(TelemetryError::EmptyResult)?;
        debug!("Query `{}` evaluated to {}", expr, sample.value.1);
        sample
            .value
            .1
            .parse()
            .map_err(|_| TelemetryError::Decode(format!("non-numeric sample: {}", sample.value.1)))
    }
}

/// Alert listing shape: `{data: {alerts: [{state, labels: {alertname, severity?}}]}}`.
#[derive(Debug, Deserialize)]
struct AlertsResponse {
    data: AlertsData,
}

#[derive(Debug, Default, Deserialize)]
struct AlertsData {
    #[serde(default)]
    alerts: Vec<WireAlert>,
}

#[derive(Debug, Deserialize)]
struct WireAlert {
    state: String,
    #[serde(default)]
    labels: HashMap<String, String>,
}

/// An active alert as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAlert {
    /// Alert rule name.
    pub name: String,
    /// Current state (pending, firing, ...).
    pub state: String,
    /// Severity label, `unknown` when absent.
    pub severity: String,
}

/// Client for the alert-status endpoint.
pub struct AlertsClient {
    base_url: String,
    client: reqwest::Client,
}

impl AlertsClient {
    /// Create a client for the given root URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the active alert list.
    pub async fn active_alerts(&self) -> Result<Vec<ActiveAlert>, TelemetryError> {
        let url = format!("{}/api/v1/alerts", self.base_url);
        let response = self.client.get(&url).timeout(QUERY_TIMEOUT).send().await?;

        if !response.status().is_success() {
            return Err(TelemetryError::Status {
                code: response.status().as_u16(),
            });
        }

        let body: AlertsResponse = response
            .json()
            .await
            .map_err(|e| TelemetryError::Decode(e.to_string()))?;

        let alerts = body
            .data
            .alerts
            .into_iter()
            .map(|alert| ActiveAlert {
                name: alert
                    .labels
                    .get("alertname")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                severity: alert
                    .labels
                    .get("severity")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                state: alert.state,
            })
            .collect();
        Ok(alerts)
    }
}
