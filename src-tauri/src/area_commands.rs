//! Tauri commands behind the desktop crop overlay.
//!
//! Each crop window forwards its pointer events here and applies the
//! returned [`CropperFrame`] to the cropper box. Releases go through
//! [`OverlayRegistry::release`], which never holds the overlay lock across
//! the area scan.

use crate::capture::{CaptureState, ScreenAreaScanner};
use crate::clipboard;
use crate::config::AppConfig;
use crate::dialog;
use crate::selection::{
    AreaRequest, AreaScanner, Completion, CropperFrame, OverlayRegistry, Point, Released,
};
use serde::Serialize;
use std::time::Duration;
use tauri::{AppHandle, State, WebviewWindow};

/// Result of releasing a drag, returned to the crop window.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseOutcome {
    pub frame: CropperFrame,
    pub codes: Vec<String>,
    pub error: Option<String>,
}

#[tauri::command]
pub fn overlay_pointer_down(
    window: WebviewWindow,
    overlays: State<'_, OverlayRegistry>,
    x: f64,
    y: f64,
) -> Result<CropperFrame, String> {
    overlays.with(window.label(), |o| o.pointer_down(Point::new(x, y)))
}

/// Returns `None` when the pointer moves without a drag in progress.
#[tauri::command]
pub fn overlay_pointer_move(
    window: WebviewWindow,
    overlays: State<'_, OverlayRegistry>,
    x: f64,
    y: f64,
) -> Result<Option<CropperFrame>, String> {
    overlays.with(window.label(), |o| o.pointer_move(Point::new(x, y)))
}

/// Ends the drag and scans the selection.
///
/// Returns `None` when there was no drag or when a newer drag replaced
/// this one while it was being scanned.
#[tauri::command]
pub async fn overlay_pointer_up(
    app: AppHandle,
    window: WebviewWindow,
    overlays: State<'_, OverlayRegistry>,
    capture: State<'_, CaptureState>,
    config: State<'_, AppConfig>,
) -> Result<Option<ReleaseOutcome>, String> {
    let scanner = ScreenAreaScanner {
        screenshot: capture.current(),
        padding: config.capture_padding,
        decode_max_dim: config.decode_max_dim,
    };
    let Some(Released { completion, frame }) =
        overlays.release(window.label(), &scanner).await?
    else {
        return Ok(None);
    };

    let outcome = match completion {
        Completion::Stale => return Ok(None),
        Completion::Empty => {
            log::info!("[OVERLAY] no codes in selection");
            ReleaseOutcome {
                frame,
                codes: Vec::new(),
                error: None,
            }
        }
        Completion::Found(codes) => {
            deliver_codes(&config, &codes);
            close_after(window, config.close_delay);
            ReleaseOutcome {
                frame,
                codes,
                error: None,
            }
        }
        Completion::Failed(error) => {
            log::error!("[OVERLAY] area scan failed: {}", error);
            dialog::notify_error(&app, &error);
            ReleaseOutcome {
                frame,
                codes: Vec::new(),
                error: Some(error),
            }
        }
    };

    Ok(Some(outcome))
}

/// Tauri command: the raw area-scan capability.
///
/// Decodes the QR codes inside a rectangle of the primary screen, copies
/// them to the clipboard, and returns them. The rectangle must already be
/// normalized.
#[tauri::command]
pub async fn scan_area(
    capture: State<'_, CaptureState>,
    config: State<'_, AppConfig>,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
) -> Result<Vec<String>, String> {
    let scanner = ScreenAreaScanner {
        screenshot: capture.current(),
        padding: config.capture_padding,
        decode_max_dim: config.decode_max_dim,
    };
    let codes = scanner
        .scan_area(AreaRequest {
            x,
            y,
            width,
            height,
        })
        .await
        .map_err(|e| e.to_string())?;

    if !codes.is_empty() {
        deliver_codes(&config, &codes);
    }
    Ok(codes)
}

/// Hands decoded payloads to the user: clipboard, plus the log.
pub fn deliver_codes(config: &AppConfig, codes: &[String]) {
    for code in codes {
        log::info!("[SCAN] decoded: {}", code);
    }
    if config.copy_to_clipboard {
        if let Err(e) = clipboard::copy_codes(codes) {
            log::error!("[CLIPBOARD] {}", e);
        }
    }
}

fn close_after(window: WebviewWindow, delay: Duration) {
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = window.close() {
            log::warn!("[OVERLAY] failed to close '{}': {}", window.label(), e);
        }
    });
}
