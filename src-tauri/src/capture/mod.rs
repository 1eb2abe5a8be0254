//! Screen capture domain: public API.
//!
//! This module owns all screen capture functionality and provides the
//! desktop implementation of [`AreaScanner`].

mod region;
mod screenshot;

pub use region::{crop_area, CropError};
pub use screenshot::{capture_primary_monitor, CaptureError, Screenshot};

use crate::decode;
use crate::selection::{AreaRequest, AreaScanner, ScanError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Thread-safe storage for the capture taken when the crop window opened.
/// Taken before the window exists so the overlay never ends up in its own
/// shot, and cleared when the window is destroyed.
pub struct CaptureState {
    pub screenshot: Mutex<Option<Arc<Screenshot>>>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self {
            screenshot: Mutex::new(None),
        }
    }

    pub fn store(&self, screenshot: Screenshot) {
        if let Ok(mut guard) = self.screenshot.lock() {
            *guard = Some(Arc::new(screenshot));
        }
    }

    /// Releases the stored capture; later scans grab the screen live.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.screenshot.lock() {
            if guard.take().is_some() {
                log::debug!("[CAPTURE] released stored screenshot");
            }
        }
    }

    pub fn current(&self) -> Option<Arc<Screenshot>> {
        self.screenshot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes QR codes inside a rectangle of the primary screen.
///
/// Uses the stored capture when there is one, otherwise grabs the screen
/// at scan time.
pub struct ScreenAreaScanner {
    pub screenshot: Option<Arc<Screenshot>>,
    pub padding: u32,
    pub decode_max_dim: u32,
}

#[async_trait]
impl AreaScanner for ScreenAreaScanner {
    async fn scan_area(&self, request: AreaRequest) -> Result<Vec<String>, ScanError> {
        if request.is_empty() {
            log::info!("[CAPTURE] empty selection, nothing to scan");
            return Ok(Vec::new());
        }

        let screenshot = self.screenshot.clone();
        let padding = self.padding;
        let max_dim = self.decode_max_dim;

        tauri::async_runtime::spawn_blocking(move || -> Result<Vec<String>, ScanError> {
            let start = std::time::Instant::now();

            let shot = match screenshot {
                Some(shot) => shot,
                None => Arc::new(
                    capture_primary_monitor().map_err(|e| ScanError::Capture(e.to_string()))?,
                ),
            };
            let cropped = crop_area(&shot.image, &request, shot.scale_factor, padding)
                .map_err(|e| ScanError::Crop(e.to_string()))?;
            let codes = decode::find_qr_codes(&cropped, max_dim);

            log::info!(
                "[CAPTURE] scanned {}x{} at {},{} in {}ms",
                request.width,
                request.height,
                request.x,
                request.y,
                start.elapsed().as_millis()
            );
            Ok(codes)
        })
        .await
        .map_err(|e| ScanError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn blank_scanner() -> ScreenAreaScanner {
        ScreenAreaScanner {
            screenshot: Some(Arc::new(Screenshot {
                image: RgbaImage::from_pixel(200, 200, Rgba([255, 255, 255, 255])),
                scale_factor: 1.0,
            })),
            padding: 0,
            decode_max_dim: 0,
        }
    }

    #[tokio::test]
    async fn empty_selection_skips_capture() {
        let scanner = ScreenAreaScanner {
            screenshot: None,
            padding: 48,
            decode_max_dim: 0,
        };
        let request = AreaRequest {
            x: 5,
            y: 5,
            width: 0,
            height: 10,
        };
        assert!(scanner.scan_area(request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_capture_decodes_nothing() {
        let request = AreaRequest {
            x: 10,
            y: 10,
            width: 100,
            height: 100,
        };
        assert!(blank_scanner().scan_area(request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn offscreen_selection_is_a_crop_error() {
        let request = AreaRequest {
            x: 500,
            y: 500,
            width: 10,
            height: 10,
        };
        let err = blank_scanner().scan_area(request).await.unwrap_err();
        assert!(matches!(err, ScanError::Crop(_)));
    }

    #[test]
    fn capture_state_starts_empty() {
        let state = CaptureState::new();
        assert!(state.current().is_none());
        state.store(Screenshot {
            image: RgbaImage::new(1, 1),
            scale_factor: 2.0,
        });
        assert_eq!(state.current().unwrap().scale_factor, 2.0);
    }

    #[test]
    fn clear_drops_the_stored_capture() {
        let state = CaptureState::new();
        state.store(Screenshot {
            image: RgbaImage::new(1, 1),
            scale_factor: 1.0,
        });
        state.clear();
        assert!(state.current().is_none());

        // A cleared state is empty again, not stuck on the old shot.
        state.clear();
        assert!(state.current().is_none());
    }
}
