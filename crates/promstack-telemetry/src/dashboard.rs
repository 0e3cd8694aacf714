//! Local dashboard opening.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::TelemetryError;

/// Build a `file://` URL for a local dashboard artifact.
pub fn file_url(path: &Path) -> Result<String, TelemetryError> {
    let absolute = path
        .canonicalize()
        .map_err(|e| TelemetryError::Dashboard(format!("{}: {}", path.display(), e)))?;

    #[cfg(windows)]
    {
        Ok(format!(
            "file:///{}",
            absolute.display().to_string().replace('\\', "/")
        ))
    }

    #[cfg(not(windows))]
    {
        Ok(format!("file://{}", absolute.display()))
    }
}

/// Open the dashboard in the default browser. Best-effort: failure is
/// reported to the caller but never tears anything down.
pub fn open_dashboard(path: &Path) -> Result<(), TelemetryError> {
    let url = file_url(path)?;
    open_url(&url)?;
    info!("Opened dashboard: {}", url);
    Ok(())
}

#[cfg(target_os = "windows")]
fn open_url(url: &str) -> Result<(), TelemetryError> {
    Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn()
        .map(|_| ())
        .map_err(|e| TelemetryError::Dashboard(e.to_string()))
}

#[cfg(target_os = "macos")]
fn open_url(url: &str) -> Result<(), TelemetryError> {
    Command::new("open")
        .arg(url)
        .spawn()
        .map(|_| ())
        .map_err(|e| TelemetryError::Dashboard(e.to_string()))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_url(url: &str) -> Result<(), TelemetryError> {
    Command::new("xdg-open")
        .arg(url)
        .spawn()
        .map(|_| ())
        .map_err(|e| TelemetryError::Dashboard(e.to_string()))
}
