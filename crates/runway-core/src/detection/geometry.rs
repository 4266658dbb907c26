//! Turns the fitted line into angular and lateral alignment errors.
//!
//! The fitted line is evaluated at the ROI's bottom row (`y = H`) and top row
//! (`y = 0`). The slope between those two crossings, minus the configured
//! reference slope, is the angular error. The fitted line is then intersected
//! with the first detected segment's line; the horizontal distance from the
//! ROI center to that intersection, scaled by `lateral_scale`, is the
//! lateral error. The intersection is only trusted when the two lines cross
//! at a usable angle and inside the ROI; otherwise the parallel fallback
//! applies.
//!
//! Undefined cases come back as [`Resolution::Degenerate`] instead of
//! non-finite numbers.

use std::fmt;

use serde::Serialize;

use crate::config::{GeometryConfig, ParallelFallback};
use crate::consts::{EPSILON, MAX_SLOPE, PARALLEL_SIN_EPS};

use super::fit::FitOutcome;
use super::types::{FittedLine, LineSegment, Point2};

/// The primary per-frame output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AlignmentError {
    pub angle_error: f64,
    pub lateral_error: f64,
}

/// Everything the resolver derived on the way to an [`AlignmentError`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlignmentDetail {
    pub error: AlignmentError,
    /// Fitted line at the ROI's bottom row.
    pub bottom: Point2,
    /// Fitted line at the ROI's top row.
    pub top: Point2,
    /// Slope between `bottom` and `top`, saturated to `±MAX_SLOPE`.
    pub slope: f64,
    /// Lateral reference point on the fitted line.
    pub intersection: Point2,
    /// Unscaled `(W/2 - x, H/2 - y)` of `intersection`.
    pub center_offset: Point2,
    /// The first segment gave no usable crossing with the fit and the ROI
    /// bottom crossing was used instead.
    pub parallel_fallback: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DegenerateGeometry {
    /// Fit points all coincide; there is no direction.
    CollapsedFit,
    /// The fitted line never crosses the ROI's top or bottom row.
    HorizontalLine,
    /// The reference segment is parallel or nearly parallel to the fit and
    /// the fallback is `Skip`.
    ParallelLines,
    /// The reference segment crosses the fit outside the ROI and the
    /// fallback is `Skip`.
    CrossingOutsideRoi,
    /// Arithmetic produced a non-finite value.
    NonFinite,
}

impl fmt::Display for DegenerateGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollapsedFit => write!(f, "collapsed fit"),
            Self::HorizontalLine => write!(f, "horizontal line"),
            Self::ParallelLines => write!(f, "parallel lines"),
            Self::CrossingOutsideRoi => write!(f, "crossing outside the ROI"),
            Self::NonFinite => write!(f, "non-finite result"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution {
    Aligned(AlignmentDetail),
    /// Nothing to resolve: no fit, no reference segment, or an empty ROI.
    Absent,
    Degenerate(DegenerateGeometry),
}

impl Resolution {
    pub fn alignment(&self) -> Option<AlignmentError> {
        match self {
            Self::Aligned(detail) => Some(detail.error),
            _ => None,
        }
    }
}

/// Resolve alignment errors for one frame.
///
/// `reference` is the first raw segment returned by the detector.
pub fn resolve(
    fit: &FitOutcome,
    reference: Option<&LineSegment>,
    roi_width: usize,
    roi_height: usize,
    config: &GeometryConfig,
) -> Resolution {
    let line = match fit {
        FitOutcome::Absent => return Resolution::Absent,
        FitOutcome::Degenerate => return Resolution::Degenerate(DegenerateGeometry::CollapsedFit),
        FitOutcome::Fitted(line) => line,
    };
    let Some(reference) = reference else {
        return Resolution::Absent;
    };
    if roi_width == 0 || roi_height == 0 {
        return Resolution::Absent;
    }

    let (w, h) = (roi_width as f64, roi_height as f64);
    let Some((bottom, top)) = boundary_crossings(line, h) else {
        return Resolution::Degenerate(DegenerateGeometry::HorizontalLine);
    };

    let slope = crossing_slope(bottom, top);
    let angle_error = slope - config.reference_slope;

    let crossing = reference_crossing(reference, bottom, top, w, h, config);
    let (intersection, parallel_fallback) = match crossing {
        Ok(p) => (p, false),
        Err(reason) => match config.parallel_fallback {
            ParallelFallback::RoiBottom => (bottom, true),
            ParallelFallback::Skip => return Resolution::Degenerate(reason),
        },
    };

    let center_offset = Point2::new(w / 2.0 - intersection.x, h / 2.0 - intersection.y);
    let lateral_error = center_offset.x * config.lateral_scale;

    if !(angle_error.is_finite() && lateral_error.is_finite() && intersection.is_finite()) {
        return Resolution::Degenerate(DegenerateGeometry::NonFinite);
    }

    Resolution::Aligned(AlignmentDetail {
        error: AlignmentError {
            angle_error,
            lateral_error,
        },
        bottom,
        top,
        slope,
        intersection,
        center_offset,
        parallel_fallback,
    })
}

/// Intersection of the reference segment with the fitted line through
/// `bottom` and `top`, rejected when the lines meet at too shallow an angle
/// or outside the `w x h` ROI.
fn reference_crossing(
    reference: &LineSegment,
    bottom: Point2,
    top: Point2,
    w: f64,
    h: f64,
    config: &GeometryConfig,
) -> std::result::Result<Point2, DegenerateGeometry> {
    let (start, end) = (reference.start.to_point(), reference.end.to_point());
    match crossing_sin(start, end, bottom, top) {
        Some(sin) if sin >= config.min_crossing_sin => {}
        _ => return Err(DegenerateGeometry::ParallelLines),
    }
    let p = intersect(start, end, bottom, top).ok_or(DegenerateGeometry::ParallelLines)?;
    if (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y) {
        Ok(p)
    } else {
        Err(DegenerateGeometry::CrossingOutsideRoi)
    }
}

/// `|sin|` of the angle between line `p1-p2` and line `p3-p4`, `None` when
/// either pair of points does not define a line.
pub fn crossing_sin(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<f64> {
    let (ax, ay) = (p2.x - p1.x, p2.y - p1.y);
    let (bx, by) = (p4.x - p3.x, p4.y - p3.y);
    let scale = ax.hypot(ay) * bx.hypot(by);
    if scale <= EPSILON {
        return None;
    }
    Some((ax * by - ay * bx).abs() / scale)
}

/// Where `line` crosses rows `y = height` and `y = 0`.
pub fn boundary_crossings(line: &FittedLine, height: f64) -> Option<(Point2, Point2)> {
    let bottom_x = line.x_at(height)?;
    let top_x = line.x_at(0.0)?;
    Some((Point2::new(bottom_x, height), Point2::new(top_x, 0.0)))
}

/// Slope from `top` to `bottom`, `+MAX_SLOPE` when they share a column.
fn crossing_slope(bottom: Point2, top: Point2) -> f64 {
    let run = bottom.x - top.x;
    if run.abs() <= EPSILON {
        return MAX_SLOPE;
    }
    ((bottom.y - top.y) / run).clamp(-MAX_SLOPE, MAX_SLOPE)
}

/// Intersection of line `p1-p2` with line `p3-p4`.
///
/// Returns `None` when the lines are parallel or coincident, or when either
/// pair of points does not define a line.
pub fn intersect(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    let d12 = Point2::new(p1.x - p2.x, p1.y - p2.y);
    let d34 = Point2::new(p3.x - p4.x, p3.y - p4.y);
    let den = d12.x * d34.y - d12.y * d34.x;
    let scale = d12.x.hypot(d12.y) * d34.x.hypot(d34.y);
    if scale <= EPSILON || den.abs() <= PARALLEL_SIN_EPS * scale {
        return None;
    }

    let c12 = p1.x * p2.y - p1.y * p2.x;
    let c34 = p3.x * p4.y - p3.y * p4.x;
    Some(Point2::new(
        (c12 * d34.x - d12.x * c34) / den,
        (c12 * d34.y - d12.y * c34) / den,
    ))
}
