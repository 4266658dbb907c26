use tracing::debug;

use crate::config::FitDistance;
use crate::consts::{EPSILON, FIT_CONVERGENCE_EPS, FIT_MAX_ITERATIONS};

use super::types::{FittedLine, Point2};

/// Result of fitting one line through the candidate points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitOutcome {
    /// No candidate points this frame.
    Absent,
    /// Points exist but do not define a direction (all coincide).
    Degenerate,
    Fitted(FittedLine),
}

impl FitOutcome {
    pub fn line(&self) -> Option<&FittedLine> {
        match self {
            Self::Fitted(line) => Some(line),
            _ => None,
        }
    }
}

/// Fit a single line through all `points` at once.
///
/// `FitDistance::L2` is the orthogonal least-squares line: anchor at the
/// centroid, direction along the principal axis of the scatter.
/// `FitDistance::Huber` refines that by iteratively reweighting points by
/// their distance to the current line.
pub fn fit_line(points: &[Point2], distance: &FitDistance) -> FitOutcome {
    if points.is_empty() {
        return FitOutcome::Absent;
    }
    let uniform = vec![1.0; points.len()];
    let Some(mut line) = weighted_line_fit(points, &uniform) else {
        return FitOutcome::Degenerate;
    };

    if let FitDistance::Huber { delta } = *distance {
        let mut weights = uniform;
        for iteration in 0..FIT_MAX_ITERATIONS {
            for (w, &p) in weights.iter_mut().zip(points) {
                *w = huber_weight(line.distance(p), delta);
            }
            let Some(next) = weighted_line_fit(points, &weights) else {
                break;
            };
            let change = (next.direction.x - line.direction.x)
                .hypot(next.direction.y - line.direction.y);
            line = next;
            if change < FIT_CONVERGENCE_EPS {
                debug!(iterations = iteration + 1, "Huber line fit converged");
                break;
            }
        }
    }

    FitOutcome::Fitted(line)
}

fn huber_weight(residual: f64, delta: f64) -> f64 {
    let abs = residual.abs();
    if abs <= delta {
        1.0
    } else {
        delta / abs
    }
}

/// Weighted total least-squares line through `points`.
///
/// Returns `None` when the weights vanish or the scatter has no extent.
pub(crate) fn weighted_line_fit(points: &[Point2], weights: &[f64]) -> Option<FittedLine> {
    let mut sum_w = 0.0;
    let mut mu = Point2::default();
    for (p, &w) in points.iter().zip(weights) {
        sum_w += w;
        mu.x += w * p.x;
        mu.y += w * p.y;
    }
    if sum_w <= EPSILON {
        return None;
    }
    mu.x /= sum_w;
    mu.y /= sum_w;

    let mut cov_xx = 0.0;
    let mut cov_xy = 0.0;
    let mut cov_yy = 0.0;
    for (p, &w) in points.iter().zip(weights) {
        let dx = p.x - mu.x;
        let dy = p.y - mu.y;
        cov_xx += w * dx * dx;
        cov_xy += w * dx * dy;
        cov_yy += w * dy * dy;
    }
    cov_xx /= sum_w;
    cov_xy /= sum_w;
    cov_yy /= sum_w;

    let trace = cov_xx + cov_yy;
    if trace <= EPSILON {
        return None;
    }
    let det_part = (cov_xx - cov_yy) * (cov_xx - cov_yy) + 4.0 * cov_xy * cov_xy;
    let lambda = 0.5 * (trace + det_part.max(0.0).sqrt());

    // Both rows of (C - lambda*I) give an eigenvector; keep the better conditioned.
    let a = Point2::new(cov_xy, lambda - cov_xx);
    let b = Point2::new(lambda - cov_yy, cov_xy);
    let dir = if a.x.hypot(a.y) >= b.x.hypot(b.y) { a } else { b };

    FittedLine::new(dir, mu)
}
