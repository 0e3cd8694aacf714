//! Fixed-interval, fixed-budget readiness polling.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace};

/// Outcome of a readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The target answered a probe.
    Ready,
    /// The attempt budget ran out without a successful probe.
    TimedOut { attempts: u32 },
}

impl PollOutcome {
    /// Whether the target became ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready)
    }
}

/// Bounded retry loop around a probe.
///
/// Each attempt sleeps `interval` and then probes once; the first success
/// returns immediately. No backoff, no jitter: dependency startup time is
/// short and bounded, so a fixed budget caps the total wait.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessPoller {
    interval: Duration,
    max_attempts: u32,
}

impl ReadinessPoller {
    /// Create a poller with the given interval and attempt ceiling.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Poll until `probe` answers or the budget is exhausted.
    pub async fn await_ready<F, Fut>(&self, mut probe: F) -> PollOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.interval).await;
            if probe().await {
                debug!("Target ready on attempt {}/{}", attempt, self.max_attempts);
                return PollOutcome::Ready;
            }
            trace!("Waiting for target... ({}/{})", attempt, self.max_attempts);
        }
        PollOutcome::TimedOut {
            attempts: self.max_attempts,
        }
    }
}
