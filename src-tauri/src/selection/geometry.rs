//! Drag-rectangle geometry. Pure functions, no state.

use serde::{Deserialize, Serialize};

/// A pointer position in viewport (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Start corner `(x1, y1)` and current corner `(x2, y2)` of a drag.
///
/// The corners are kept as the pointer reported them; `normalized()` is
/// the only way the rest of the crate looks at the rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl DragRect {
    /// Zero-sized rectangle anchored at `p`.
    pub fn anchored_at(p: Point) -> Self {
        Self {
            x1: p.x,
            y1: p.y,
            x2: p.x,
            y2: p.y,
        }
    }

    pub fn extend_to(&mut self, p: Point) {
        self.x2 = p.x;
        self.y2 = p.y;
    }

    /// Top-left origin and non-negative size, whatever the drag direction.
    pub fn normalized(&self) -> Bounds {
        Bounds {
            left: self.x1.min(self.x2),
            top: self.y1.min(self.y2),
            width: (self.x2 - self.x1).abs(),
            height: (self.y2 - self.y1).abs(),
        }
    }

    /// The area-scan request for this selection, in whole pixels.
    pub fn to_request(&self) -> AreaRequest {
        let b = self.normalized();
        AreaRequest {
            x: b.left.round() as i32,
            y: b.top.round() as i32,
            width: b.width.round() as u32,
            height: b.height.round() as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle handed to the area-scan capability.
///
/// Always normalized: `(x, y)` is the top-left corner of the selection and
/// the size is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct AreaRequest {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl AreaRequest {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(x1: f64, y1: f64, x2: f64, y2: f64) -> DragRect {
        let mut r = DragRect::anchored_at(Point::new(x1, y1));
        r.extend_to(Point::new(x2, y2));
        r
    }

    #[test]
    fn normalizes_all_four_drag_directions() {
        let expected = Bounds {
            left: 10.0,
            top: 20.0,
            width: 30.0,
            height: 40.0,
        };
        // down-right, down-left, up-right, up-left
        assert_eq!(drag(10.0, 20.0, 40.0, 60.0).normalized(), expected);
        assert_eq!(drag(40.0, 20.0, 10.0, 60.0).normalized(), expected);
        assert_eq!(drag(10.0, 60.0, 40.0, 20.0).normalized(), expected);
        assert_eq!(drag(40.0, 60.0, 10.0, 20.0).normalized(), expected);
    }

    #[test]
    fn right_to_left_bottom_up_scenario() {
        let b = drag(100.0, 50.0, 40.0, 120.0).normalized();
        assert_eq!(b.left, 40.0);
        assert_eq!(b.top, 50.0);
        assert_eq!(b.width, 60.0);
        assert_eq!(b.height, 70.0);
    }

    #[test]
    fn anchored_rect_is_empty() {
        let r = DragRect::anchored_at(Point::new(5.0, 7.0));
        let req = r.to_request();
        assert_eq!((req.x, req.y), (5, 7));
        assert!(req.is_empty());
    }

    #[test]
    fn request_uses_normalized_origin_and_size() {
        let req = drag(100.0, 50.0, 40.0, 120.0).to_request();
        assert_eq!(
            req,
            AreaRequest {
                x: 40,
                y: 50,
                width: 60,
                height: 70
            }
        );
    }

    #[test]
    fn request_rounds_fractional_pointer_positions() {
        let req = drag(10.4, 10.6, 20.5, 30.2).to_request();
        assert_eq!((req.x, req.y), (10, 11));
        assert_eq!((req.width, req.height), (10, 20));
    }
}
