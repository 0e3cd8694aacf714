//! Periodic operator reporting.

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::client::ActiveAlert;
use crate::snapshot::{MetricReading, Snapshot, TelemetryReporter};

/// Run one reporting cycle immediately, then repeat on a fixed interval
/// until a shutdown notification arrives.
///
/// Cancellation is observed between cycles only; a cycle in progress runs
/// to completion.
pub async fn run_loop(
    reporter: &TelemetryReporter,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    info!("Starting report loop (interval: {:?})", interval);
    report_cycle(reporter).await;

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                report_cycle(reporter).await;
            }
            _ = shutdown_rx.recv() => {
                info!("Report loop shutting down");
                break;
            }
        }
    }
}

/// Fetch and print one snapshot plus the alert list.
pub async fn report_cycle(reporter: &TelemetryReporter) {
    let snapshot = reporter.snapshot().await;
    print_snapshot(&snapshot);

    match reporter.active_alerts().await {
        Ok(alerts) => print_alerts(&alerts),
        Err(e) => {
            debug!("Alert fetch failed: {}", e);
            println!("  Alerts: unavailable");
        }
    }
}

/// Print a metric snapshot to the console.
pub fn print_snapshot(snapshot: &Snapshot) {
    println!("\n{}", "=".repeat(60));
    println!("  CURRENT SYSTEM METRICS");
    println!("{}", "=".repeat(60));

    for (name, reading) in &snapshot.entries {
        match reading {
            MetricReading::Value(value) => println!("  {}: {:.1}%", name, value),
            MetricReading::Unavailable => println!("  {}: unable to fetch", name),
        }
    }

    println!("{}\n", "=".repeat(60));
}

/// Print the active alert list to the console.
pub fn print_alerts(alerts: &[ActiveAlert]) {
    println!("\n{}", "=".repeat(60));
    println!("  ALERT STATUS");
    println!("{}", "=".repeat(60));

    if alerts.is_empty() {
        println!("  No active alerts");
    } else {
        for alert in alerts {
            println!(
                "  {:<20}: {} ({})",
                alert.name,
                alert.state.to_uppercase(),
                alert.severity
            );
        }
    }

    println!("{}", "=".repeat(60));
}
