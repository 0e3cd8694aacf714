//! # Promstack Supervisor
//!
//! Brings up the local monitoring stack in a strict order and owns the
//! lifecycle of every process it launches.
//!
//! ## Features
//!
//! - Bounded-timeout reachability probes (all failures collapse to "not up")
//! - OS service control through the platform service manager
//! - Detached process launching with retained handles
//! - Fixed-interval, fixed-budget readiness polling
//! - Fail-fast stage pipeline with a final all-endpoints verification
//! - Graceful teardown of owned processes on shutdown
//!
//! ## Usage
//!
//! ```rust,ignore
//! use promstack_supervisor::{DetachedLauncher, HttpProber, Supervisor, platform_manager};
//!
//! let mut supervisor = Supervisor::new(config, probe, service, launcher);
//! let report = supervisor.bring_up().await?;
//! // ... report until cancelled ...
//! supervisor.shutdown();
//! ```

pub mod error;
pub mod launcher;
pub mod poller;
pub mod probe;
pub mod service;
pub mod supervisor;

// Re-exports
pub use error::{StageFailure, SupervisorError};
pub use launcher::{DetachedLauncher, LaunchSpec, ManagedProcess, ProcessLauncher};
pub use poller::{PollOutcome, ReadinessPoller};
pub use probe::{HttpProber, ServiceEndpoint, StatusProbe};
pub use service::{platform_manager, ServiceManager, ServiceState};
pub use supervisor::{Stage, StackReport, Supervisor};
