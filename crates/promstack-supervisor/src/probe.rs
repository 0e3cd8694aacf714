//! Bounded-timeout reachability probes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::trace;

/// A dependency endpoint to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// Display name of the dependency.
    pub name: String,
    /// URL probed for reachability.
    pub probe_url: String,
}

impl ServiceEndpoint {
    /// Create a new endpoint.
    pub fn new(name: impl Into<String>, probe_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            probe_url: probe_url.into(),
        }
    }
}

/// A single reachability check. Retry policy lives in the caller.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Check whether `url` answers. Transport errors, timeouts, and
    /// non-success statuses all collapse to `false`; this never fails
    /// the caller.
    async fn probe(&self, url: &str) -> bool;
}

/// HTTP GET probe with a per-request timeout.
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    /// Create a new prober with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl StatusProbe for HttpProber {
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                trace!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_probe_ok_on_200() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let prober = HttpProber::new(Duration::from_secs(5));
        assert!(prober.probe(&server.uri()).await);
    }

    #[tokio::test]
    async fn test_probe_false_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let prober = HttpProber::new(Duration::from_secs(5));
        assert!(!prober.probe(&server.uri()).await);
    }

    #[tokio::test]
    async fn test_probe_false_on_not_found() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let prober = HttpProber::new(Duration::from_secs(5));
        assert!(!prober.probe(&server.uri()).await);
    }

    #[tokio::test]
    async fn test_probe_false_on_connection_refused() {
        // Nothing listens here.
        let prober = HttpProber::new(Duration::from_secs(5));
        assert!(!prober.probe("http://127.0.0.1:1/").await);
    }

    #[tokio::test]
    async fn test_probe_times_out_without_raising() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let prober = HttpProber::new(Duration::from_millis(100));
        let started = Instant::now();
        assert!(!prober.probe(&server.uri()).await);
        // Bounded by the timeout plus a small overhead, not the response delay.
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_endpoint_new() {
        let endpoint = ServiceEndpoint::new("prometheus", "http://localhost:9090");
        assert_eq!(endpoint.name, "prometheus");
        assert_eq!(endpoint.probe_url, "http://localhost:9090");
    }
}
