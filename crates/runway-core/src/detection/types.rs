use serde::Serialize;

use crate::consts::MAX_SLOPE;

/// Integer pixel coordinate (x = column, y = row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point2 {
        Point2::new(self.x as f64, self.y as f64)
    }
}

/// Real-valued image coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A detected straight segment between two pixel endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineSegment {
    pub start: PixelPoint,
    pub end: PixelPoint,
}

impl LineSegment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            start: PixelPoint::new(x1, y1),
            end: PixelPoint::new(x2, y2),
        }
    }

    /// `(y1 - y2) / (x1 - x2)`, or `None` for a vertical segment.
    pub fn slope(&self) -> Option<f64> {
        let dx = self.start.x - self.end.x;
        if dx == 0 {
            return None;
        }
        Some((self.start.y - self.end.y) as f64 / dx as f64)
    }
}

/// A line in point-direction form.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FittedLine {
    /// Unit direction; `dy >= 0`, and `dx > 0` when the line is horizontal.
    pub direction: Point2,
    /// A point on the line (the weighted centroid of the fitted points).
    pub anchor: Point2,
}

impl FittedLine {
    /// Normalizes `direction` and fixes its sign. Returns `None` for a zero
    /// or non-finite direction.
    pub fn new(direction: Point2, anchor: Point2) -> Option<Self> {
        let norm = direction.x.hypot(direction.y);
        if !(norm.is_finite() && norm > 0.0 && anchor.is_finite()) {
            return None;
        }
        let (mut dx, mut dy) = (direction.x / norm, direction.y / norm);
        if dy < 0.0 || (dy == 0.0 && dx < 0.0) {
            dx = -dx;
            dy = -dy;
        }
        Some(Self {
            direction: Point2::new(dx, dy),
            anchor,
        })
    }

    /// `dy / dx`, or `None` when the line is vertical.
    pub fn slope(&self) -> Option<f64> {
        if self.direction.x == 0.0 {
            return None;
        }
        Some(self.direction.y / self.direction.x)
    }

    /// Column where the line crosses row `y`; `None` for a horizontal line.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        if self.direction.y == 0.0 {
            return None;
        }
        Some(self.anchor.x + (y - self.anchor.y) * self.direction.x / self.direction.y)
    }

    /// Signed perpendicular distance from `p` to the line.
    pub fn distance(&self, p: Point2) -> f64 {
        (p.x - self.anchor.x) * self.direction.y - (p.y - self.anchor.y) * self.direction.x
    }

    /// Orthogonal projection of `p` onto the line.
    /// Signed distance of `p`'s projection from the anchor, along `direction`.
    pub fn position(&self, p: Point2) -> f64 {
        (p.x - self.anchor.x) * self.direction.x + (p.y - self.anchor.y) * self.direction.y
    }

    pub fn project(&self, p: Point2) -> Point2 {
        let t = self.position(p);
        Point2::new(
            self.anchor.x + t * self.direction.x,
            self.anchor.y + t * self.direction.y,
        )
    }
}

/// Clamp a possibly-infinite slope into a finite, sign-preserving value.
/// Vertical (`None`) maps to `+MAX_SLOPE`.
pub fn saturate_slope(slope: Option<f64>) -> f64 {
    match slope {
        Some(m) if m.is_finite() => m.clamp(-MAX_SLOPE, MAX_SLOPE),
        Some(m) if m < 0.0 => -MAX_SLOPE,
        _ => MAX_SLOPE,
    }
}
