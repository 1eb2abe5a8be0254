//! Desktop selection overlay: public API.
//!
//! `geometry` is the pure rectangle math, `overlay` the per-window drag
//! state machine. The area scan itself sits behind [`AreaScanner`] so the
//! overlay can be driven without a screen.

mod geometry;
mod overlay;

pub use geometry::{AreaRequest, Bounds, DragRect, Point};
pub use overlay::{Completion, CropperFrame, SelectionOverlay, Submission};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Decodes the barcodes inside a screen rectangle.
#[async_trait]
pub trait AreaScanner: Send + Sync {
    async fn scan_area(&self, request: AreaRequest) -> Result<Vec<String>, ScanError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Screen capture failed: {0}")]
    Capture(String),

    #[error("Selection outside the screen: {0}")]
    Crop(String),

    #[error("Scan task failed: {0}")]
    Task(String),
}

/// A finished release: what the scan did and where the box now is.
#[derive(Debug, Clone, PartialEq)]
pub struct Released {
    pub completion: Completion,
    pub frame: CropperFrame,
}

/// One overlay per crop window, keyed by window label.
#[derive(Default)]
pub struct OverlayRegistry {
    overlays: Mutex<HashMap<String, SelectionOverlay>>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the overlay of `label`, creating it on first use.
    pub fn with<T>(
        &self,
        label: &str,
        f: impl FnOnce(&mut SelectionOverlay) -> T,
    ) -> Result<T, String> {
        let mut overlays = self.overlays.lock().map_err(|e| e.to_string())?;
        let overlay = overlays.entry(label.to_string()).or_default();
        Ok(f(overlay))
    }

    /// Ends the drag in `label` and runs its area scan.
    ///
    /// The lock is taken once to hand out the submission and once to apply
    /// the result, never across the scan, so pointer events keep flowing
    /// while the capture decodes. Returns `None` when there was no drag.
    pub async fn release<S: AreaScanner + ?Sized>(
        &self,
        label: &str,
        scanner: &S,
    ) -> Result<Option<Released>, String> {
        let Some(submission) = self.with(label, |o| o.pointer_up())? else {
            return Ok(None);
        };

        let result = scanner.scan_area(submission.request).await;

        self.with(label, |o| {
            Some(Released {
                completion: o.complete(submission, result),
                frame: o.cropper(),
            })
        })
    }

    pub fn remove(&self, label: &str) {
        if let Ok(mut overlays) = self.overlays.lock() {
            if overlays.remove(label).is_some() {
                log::debug!("[OVERLAY] dropped state for window '{}'", label);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.overlays.lock().map(|o| o.len()).unwrap_or(0)
    }
}
