//! Crop overlay view model.
//!
//! Tracks one drag gesture at a time and produces the geometry the webview
//! applies to the cropper box. The overlay never performs I/O itself:
//! `pointer_up` hands out a [`Submission`], the caller runs the area scan,
//! and `complete` folds the result back in. That split keeps the lock in
//! the command layer from being held across the capture.

use super::geometry::{AreaRequest, DragRect, Point};
use serde::Serialize;

/// Geometry of the cropper box, applied by the renderer as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CropperFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
}

/// An area scan handed out on release.
///
/// `generation` identifies the drag that produced it; results for an older
/// drag are discarded by [`SelectionOverlay::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub generation: u64,
    pub request: AreaRequest,
}

/// What a completed area scan did to the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Codes decoded; the box stays where it is.
    Found(Vec<String>),
    /// Nothing decoded; the box is hidden.
    Empty,
    /// The capability failed; the box is hidden and the error surfaced.
    Failed(String),
    /// A newer drag started after this request went out.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dragging,
}

#[derive(Debug)]
pub struct SelectionOverlay {
    rect: DragRect,
    phase: Phase,
    visible: bool,
    generation: u64,
    pending: Option<u64>,
}

impl Default for SelectionOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionOverlay {
    pub fn new() -> Self {
        Self {
            rect: DragRect::default(),
            phase: Phase::Idle,
            visible: false,
            generation: 0,
            pending: None,
        }
    }

    /// Current cropper geometry. This is the only path the renderer reads
    /// box geometry through, so it can be called on every pointer event.
    pub fn cropper(&self) -> CropperFrame {
        let b = self.rect.normalized();
        CropperFrame {
            left: b.left,
            top: b.top,
            width: b.width,
            height: b.height,
            visible: self.visible,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    /// True while an area scan for the latest drag is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.pending == Some(self.generation)
    }

    pub fn pointer_down(&mut self, p: Point) -> CropperFrame {
        if self.is_submitting() {
            log::debug!("[OVERLAY] drag #{} still scanning, superseded", self.generation);
        }
        self.generation += 1;
        self.rect = DragRect::anchored_at(p);
        self.phase = Phase::Dragging;
        self.visible = true;
        log::debug!("[OVERLAY] drag #{} started at ({}, {})", self.generation, p.x, p.y);
        self.cropper()
    }

    /// Returns `None` when no drag is in progress.
    pub fn pointer_move(&mut self, p: Point) -> Option<CropperFrame> {
        if !self.is_dragging() {
            return None;
        }
        self.rect.extend_to(p);
        Some(self.cropper())
    }

    /// Ends the drag and hands out the area scan to run.
    ///
    /// Uses the corners recorded by the last `pointer_move`.
    pub fn pointer_up(&mut self) -> Option<Submission> {
        if !self.is_dragging() {
            return None;
        }
        self.phase = Phase::Idle;
        self.pending = Some(self.generation);

        let submission = Submission {
            generation: self.generation,
            request: self.rect.to_request(),
        };
        log::debug!("[OVERLAY] drag #{} released: {:?}", submission.generation, submission.request);
        Some(submission)
    }

    /// Applies the result of the area scan started by `submission`.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        submission: Submission,
        result: Result<Vec<String>, E>,
    ) -> Completion {
        if submission.generation != self.generation {
            log::debug!(
                "[OVERLAY] dropping result of drag #{} (now at #{})",
                submission.generation,
                self.generation
            );
            return Completion::Stale;
        }
        self.pending = None;

        match result {
            Ok(codes) if codes.is_empty() => {
                self.visible = false;
                Completion::Empty
            }
            Ok(codes) => Completion::Found(codes),
            Err(e) => {
                self.visible = false;
                Completion::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn dragged(from: Point, to: Point) -> (SelectionOverlay, Submission) {
        let mut overlay = SelectionOverlay::new();
        overlay.pointer_down(from);
        overlay.pointer_move(to);
        let submission = overlay.pointer_up().unwrap();
        (overlay, submission)
    }

    #[test]
    fn starts_hidden_and_idle() {
        let overlay = SelectionOverlay::new();
        assert!(!overlay.cropper().visible);
        assert!(!overlay.is_dragging());
        assert!(!overlay.is_submitting());
    }

    #[test]
    fn pointer_down_shows_zero_sized_box() {
        let mut overlay = SelectionOverlay::new();
        let frame = overlay.pointer_down(p(12.0, 34.0));
        assert_eq!(
            frame,
            CropperFrame {
                left: 12.0,
                top: 34.0,
                width: 0.0,
                height: 0.0,
                visible: true
            }
        );
    }

    #[test]
    fn move_tracks_pointer_in_any_direction() {
        let mut overlay = SelectionOverlay::new();
        overlay.pointer_down(p(100.0, 50.0));
        let frame = overlay.pointer_move(p(40.0, 120.0)).unwrap();
        assert_eq!((frame.left, frame.top), (40.0, 50.0));
        assert_eq!((frame.width, frame.height), (60.0, 70.0));
        assert!(frame.visible);
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut overlay = SelectionOverlay::new();
        assert!(overlay.pointer_move(p(1.0, 1.0)).is_none());
        assert!(!overlay.cropper().visible);
    }

    #[test]
    fn release_submits_last_recorded_corners() {
        let mut overlay = SelectionOverlay::new();
        overlay.pointer_down(p(10.0, 10.0));
        overlay.pointer_move(p(20.0, 20.0));
        overlay.pointer_move(p(50.0, 30.0));
        let submission = overlay.pointer_up().unwrap();
        assert_eq!(
            submission.request,
            AreaRequest {
                x: 10,
                y: 10,
                width: 40,
                height: 20
            }
        );
        assert!(overlay.is_submitting());
        assert!(!overlay.is_dragging());
    }

    #[test]
    fn release_without_drag_submits_nothing() {
        let mut overlay = SelectionOverlay::new();
        assert!(overlay.pointer_up().is_none());
    }

    #[test]
    fn empty_result_hides_box() {
        let (mut overlay, submission) = dragged(p(0.0, 0.0), p(30.0, 30.0));
        let done = overlay.complete(submission, Ok::<_, String>(vec![]));
        assert_eq!(done, Completion::Empty);
        assert!(!overlay.cropper().visible);
        assert!(!overlay.is_submitting());
    }

    #[test]
    fn found_codes_keep_box_visible() {
        let (mut overlay, submission) = dragged(p(0.0, 0.0), p(30.0, 30.0));
        let done = overlay.complete(submission, Ok::<_, String>(vec!["hello".into()]));
        assert_eq!(done, Completion::Found(vec!["hello".to_string()]));
        assert!(overlay.cropper().visible);
    }

    #[test]
    fn failure_hides_box_and_reports() {
        let (mut overlay, submission) = dragged(p(0.0, 0.0), p(30.0, 30.0));
        let done = overlay.complete(submission, Err::<Vec<String>, _>("no monitor"));
        assert_eq!(done, Completion::Failed("no monitor".into()));
        assert!(!overlay.cropper().visible);
    }

    #[test]
    fn result_for_older_drag_is_stale() {
        let (mut overlay, first) = dragged(p(0.0, 0.0), p(30.0, 30.0));

        // A second drag starts while the first scan is still running.
        overlay.pointer_down(p(5.0, 5.0));
        overlay.pointer_move(p(25.0, 25.0));

        let done = overlay.complete(first, Ok::<_, String>(vec![]));
        assert_eq!(done, Completion::Stale);
        assert!(overlay.cropper().visible, "stale empty result must not hide the new box");
        assert!(overlay.is_dragging());
    }

    #[test]
    fn coordinates_survive_hide() {
        let (mut overlay, submission) = dragged(p(10.0, 20.0), p(30.0, 50.0));
        overlay.complete(submission, Ok::<_, String>(vec![]));
        let frame = overlay.cropper();
        assert!(!frame.visible);
        assert_eq!((frame.left, frame.top, frame.width, frame.height), (10.0, 20.0, 20.0, 30.0));
    }
}
