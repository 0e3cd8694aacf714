//! One-shot inspection subcommands.

use promstack_config::Config;
use promstack_supervisor::{platform_manager, HttpProber, StatusProbe};
use promstack_telemetry::{
    open_dashboard, print_alerts, print_snapshot, AlertsClient, MetricsClient, TelemetryReporter,
};

/// Probe every tracked dependency once and print the result.
pub(crate) async fn status(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let probe = HttpProber::new(config.poll.probe_timeout());
    let service = platform_manager(&config.exporter.service_name);

    println!("\n{}", "=".repeat(60));
    println!("  SERVICE STATUS");
    println!("{}", "=".repeat(60));
    let state = service.query().to_string();
    println!("  {:<15} {:<12} (service manager)", service.name(), state);

    let endpoints = [
        ("exporter", &config.exporter.metrics_url),
        ("prometheus", &config.prometheus.url),
        ("alertmanager", &config.alertmanager.url),
    ];
    for (name, url) in endpoints {
        let state = if probe.probe(url).await {
            "reachable"
        } else {
            "unreachable"
        };
        println!("  {:<15} {:<12} {}", name, state, url);
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

/// Fetch and print one metric snapshot.
pub(crate) async fn metrics(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = reporter(&config).snapshot().await;
    print_snapshot(&snapshot);
    Ok(())
}

/// Fetch and print the active alert list.
pub(crate) async fn alerts(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    match reporter(&config).active_alerts().await {
        Ok(alerts) => print_alerts(&alerts),
        Err(e) => println!("  Alerts: unavailable ({})", e),
    }
    Ok(())
}

/// Open the local dashboard.
pub(crate) fn dashboard(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    open_dashboard(&config.dashboard.path)?;
    println!("Opened dashboard: {}", config.dashboard.path.display());
    Ok(())
}

fn reporter(config: &Config) -> TelemetryReporter {
    let alerts_url = config
        .report
        .alerts_url
        .clone()
        .unwrap_or_else(|| config.prometheus.url.clone());
    TelemetryReporter::new(
        MetricsClient::new(&config.prometheus.url),
        AlertsClient::new(alerts_url),
        config.report.queries.clone(),
    )
}
