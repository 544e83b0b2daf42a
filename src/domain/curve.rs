//! Parent-to-child connector geometry.

use serde::Serialize;

/// A point in layout space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Quadratic curve from a parent's bottom-center to a child's top-center.
///
/// The control point sits below the start at the vertical midpoint, so the
/// connector leaves the parent straight down and bends toward the child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Curve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl Curve {
    pub fn between(start: Point, end: Point) -> Self {
        let mid_y = (start.y + end.y) / 2.0;
        Self {
            start,
            control: Point::new(start.x, mid_y),
            end,
        }
    }

    /// SVG path command (e.g. "M 100 90 Q 100 125 40 160")
    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }

    /// Point on the curve at `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }
}
