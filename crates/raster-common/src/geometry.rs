//! Points and rectangles in data space and screen space.

use serde::{Deserialize, Serialize};

/// A point in data coordinates.
///
/// On polar plot surfaces `x` carries the magnitude and `y` the angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in screen (pixel) coordinates, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Smallest rectangle enclosing all given points.
    pub fn from_points(points: &[ScreenPoint]) -> Self {
        let (min_x, min_y, max_x, max_y) = points.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        );
        if min_x > max_x || min_y > max_y {
            return Self::default();
        }
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Pixel dimensions covering this rectangle (at least 1x1 for a non-empty rect).
    pub fn pixel_size(&self) -> (usize, usize) {
        let w = self.width.max(0.0).ceil() as usize;
        let h = self.height.max(0.0).ceil() as usize;
        (w, h)
    }
}

/// Axis-aligned bounds in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl DataBounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within these bounds (edges inclusive).
    pub fn contains(&self, p: DataPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_points() {
        let rect = ScreenRect::from_points(&[
            ScreenPoint::new(10.0, 40.0),
            ScreenPoint::new(30.0, 5.0),
            ScreenPoint::new(20.0, 20.0),
        ]);
        assert_eq!(rect, ScreenRect::new(10.0, 5.0, 20.0, 35.0));
        assert_eq!(rect.right(), 30.0);
        assert_eq!(rect.bottom(), 40.0);
    }

    #[test]
    fn test_rect_from_no_points() {
        assert_eq!(ScreenRect::from_points(&[]), ScreenRect::default());
    }

    #[test]
    fn test_bounds_contains_edges() {
        let b = DataBounds::new(0.0, 0.0, 1.0, 3.0);
        assert!(b.contains(DataPoint::new(1.0, 3.0)));
        assert!(!b.contains(DataPoint::new(1.01, 1.0)));
    }
}
