use tracing::debug;

use super::types::{LineSegment, Point2};

/// Minimum absolute slope a segment needs to count as a candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopeThreshold {
    min_abs_slope: f64,
}

impl SlopeThreshold {
    /// Accept segments within `tolerance_deg` of vertical:
    /// `|slope| >= tan(90° - tolerance)`.
    pub fn from_tolerance_deg(tolerance_deg: f64) -> Self {
        let theta = (90.0 - tolerance_deg).to_radians();
        Self {
            min_abs_slope: theta.tan(),
        }
    }

    pub fn from_min_abs_slope(min_abs_slope: f64) -> Self {
        Self { min_abs_slope }
    }

    pub fn min_abs_slope(&self) -> f64 {
        self.min_abs_slope
    }

    /// Vertical segments always pass; the boundary itself passes.
    pub fn accepts(&self, segment: &LineSegment) -> bool {
        match segment.slope() {
            None => true,
            Some(m) => m.abs() >= self.min_abs_slope,
        }
    }
}

/// Segments that passed the steepness test, plus their endpoints.
#[derive(Clone, Debug, Default)]
pub struct Classified {
    pub candidates: Vec<LineSegment>,
    /// Both endpoints of every candidate, in candidate order.
    pub points: Vec<Point2>,
}

impl Classified {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

pub fn classify_segments(segments: &[LineSegment], threshold: &SlopeThreshold) -> Classified {
    let mut classified = Classified::default();
    for segment in segments.iter().filter(|s| threshold.accepts(s)) {
        classified.candidates.push(*segment);
        classified.points.push(segment.start.to_point());
        classified.points.push(segment.end.to_point());
    }

    debug!(
        raw = segments.len(),
        candidates = classified.candidates.len(),
        min_abs_slope = threshold.min_abs_slope(),
        "Slope classification complete"
    );
    classified
}
