//! Best-effort metric snapshots.

use chrono::{DateTime, Utc};
use tracing::debug;

use promstack_config::MetricQuery;

use crate::client::{ActiveAlert, AlertsClient, MetricsClient};
use crate::error::TelemetryError;

/// One fetched metric value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricReading {
    /// The query evaluated to a value.
    Value(f64),
    /// The fetch failed; only this entry is affected.
    Unavailable,
}

impl MetricReading {
    /// Whether a value was fetched.
    pub fn is_available(&self) -> bool {
        matches!(self, MetricReading::Value(_))
    }
}

/// A point-in-time view of the configured metrics.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// When the snapshot was assembled.
    pub taken_at: DateTime<Utc>,
    /// Readings in configuration order.
    pub entries: Vec<(String, MetricReading)>,
}

/// Read-only view over the running services.
///
/// Every fetch is independent and best-effort; a failure on one query
/// yields `Unavailable` for that entry and never aborts the others.
pub struct TelemetryReporter {
    metrics: MetricsClient,
    alerts: AlertsClient,
    queries: Vec<MetricQuery>,
}

impl TelemetryReporter {
    /// Create a reporter over the given clients and query list.
    pub fn new(metrics: MetricsClient, alerts: AlertsClient, queries: Vec<MetricQuery>) -> Self {
        Self {
            metrics,
            alerts,
            queries,
        }
    }

    /// Fetch every configured metric.
    pub async fn snapshot(&self) -> Snapshot {
        let mut entries = Vec::with_capacity(self.queries.len());
        for query in &self.queries {
            let reading = match self.metrics.instant_query(&query.expr).await {
                Ok(value) => MetricReading::Value(value),
                Err(e) => {
                    debug!("Metric {} unavailable: {}", query.name, e);
                    MetricReading::Unavailable
                }
            };
            entries.push((query.name.clone(), reading));
        }
        Snapshot {
            taken_at: Utc::now(),
            entries,
        }
    }

    /// Fetch the active alert list.
    pub async fn active_alerts(&self) -> Result<Vec<ActiveAlert>, TelemetryError> {
        self.alerts.active_alerts().await
    }
}
