use serde::{Deserialize, Serialize};

/// A point in the problem plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new(
            self.x + (other.x - self.x) / 2.0,
            self.y + (other.y - self.y) / 2.0,
        )
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Rotate counter-clockwise by `angle` radians around `center`
    pub fn rotate_about(self, center: Point, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }

    /// Both coordinates rounded to `decimals` places; `-0.0` becomes `0.0`
    pub fn rounded(self, decimals: i32) -> Point {
        let scale = 10f64.powi(decimals);
        let round = |v: f64| (v * scale).round() / scale + 0.0;
        Point::new(round(self.x), round(self.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Corners of the axis-aligned rectangle spanned by two opposite corners,
/// in drawing order
pub fn rectangle_corners(a: Point, b: Point) -> [Point; 4] {
    [a, Point::new(b.x, a.y), b, Point::new(a.x, b.y)]
}
