//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer; it talks to the OS.

use image::RgbaImage;
use xcap::Monitor;

/// A capture of one monitor plus the factor mapping logical to physical
/// pixels on it.
pub struct Screenshot {
    pub image: RgbaImage,
    pub scale_factor: f32,
}

/// Captures the primary monitor (or the first one if none reports as
/// primary).
pub fn capture_primary_monitor() -> Result<Screenshot, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    let primary_idx = monitors
        .iter()
        .position(|m| m.is_primary().unwrap_or(false))
        .unwrap_or(0);
    let primary = monitors
        .into_iter()
        .nth(primary_idx)
        .ok_or(CaptureError::NoMonitor)?;

    let scale_factor = primary.scale_factor().unwrap_or(1.0);
    let image = primary
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    Ok(Screenshot {
        image,
        scale_factor,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitor found")]
    NoMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),
}
