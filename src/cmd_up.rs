//! Stack bring-up and the long-running report loop.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

use promstack_config::Config;
use promstack_supervisor::{platform_manager, DetachedLauncher, HttpProber, Supervisor};
use promstack_telemetry::{open_dashboard, run_loop, AlertsClient, MetricsClient, TelemetryReporter};

/// Bring the stack up, then report on a timer until interrupted.
pub(crate) async fn run(
    config: Config,
    no_dashboard: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting monitoring system...");

    let probe = Arc::new(HttpProber::new(config.poll.probe_timeout()));
    let service = platform_manager(&config.exporter.service_name);
    let mut supervisor = Supervisor::new(config.clone(), probe, service, Box::new(DetachedLauncher));

    let report = match supervisor.bring_up().await {
        Ok(report) => report,
        Err(failure) => {
            error!("Startup failed at {}", failure);
            supervisor.shutdown();
            return Err(Box::new(failure));
        }
    };
    info!(
        "All services are up ({} started, {} already running)",
        report.launched.len(),
        report.already_up.len()
    );

    let alerts_url = config
        .report
        .alerts_url
        .clone()
        .unwrap_or_else(|| config.prometheus.url.clone());
    let reporter = TelemetryReporter::new(
        MetricsClient::new(&config.prometheus.url),
        AlertsClient::new(alerts_url),
        config.report.queries.clone(),
    );

    if !no_dashboard && config.dashboard.open_on_start {
        if let Err(e) = open_dashboard(&config.dashboard.path) {
            warn!("Could not open dashboard: {}", e);
        }
    }

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt");
            let _ = shutdown_tx.send(());
        }
    });

    println!("\nMonitoring system is running!");
    println!("Press Ctrl+C to stop...");
    run_loop(&reporter, config.report.interval(), shutdown_rx).await;

    info!("Shutting down...");
    supervisor.shutdown();
    Ok(())
}
