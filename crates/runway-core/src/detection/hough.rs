use std::f64::consts::PI;

use ndarray::Array2;
use rand::prelude::*;
use tracing::debug;

use crate::config::HoughParams;
use crate::consts::{HOUGH_TRACE_PASSES, HOUGH_VISIT_SEED};
use crate::frame::GrayFrame;

use super::fit::weighted_line_fit;
use super::types::{FittedLine, LineSegment, Point2};

/// Anything that turns an edge-strength image into straight segments.
///
/// Every non-zero pixel is an edge point. Implementations must be
/// deterministic for a fixed image.
pub trait SegmentSource {
    fn detect(&self, edges: &GrayFrame) -> Vec<LineSegment>;
}

/// Progressive probabilistic Hough segment detector.
///
/// Edge points are visited once each, in a fixed pseudo-random order, and
/// vote for `(rho, theta)` bins as they are visited. When a point lifts one
/// of its bins to the vote threshold, that bin's line is traced through the
/// edge image outwards from the point, bridging up to `max_gap` empty steps,
/// and re-fitted by least squares until the traced set stops growing. Traced
/// pixels are consumed and their votes withdrawn whether or not the trace
/// is long enough to keep, so the work stays proportional to the number of
/// edge points times the number of angle bins. Traces spanning at least
/// `min_length` become segments.
#[derive(Clone, Debug)]
pub struct HoughSegments {
    params: HoughParams,
}

impl HoughSegments {
    pub fn new(params: HoughParams) -> Self {
        Self { params }
    }

    /// Pixels on each side of the traced line that still count as on it.
    fn half_width(&self) -> isize {
        (self.params.rho.round() as isize).max(1)
    }

    /// Live edge pixels near `line`, walked from `seed` along the line's
    /// dominant axis in both directions until the gap limit is exceeded.
    fn trace(
        &self,
        state: &Array2<EdgeState>,
        line: &FittedLine,
        seed: (usize, usize),
    ) -> Vec<(usize, usize)> {
        let (height, width) = state.dim();
        let d = line.direction;
        let steep = d.y.abs() >= d.x.abs();
        let (start, extent) = if steep { (seed.0, height) } else { (seed.1, width) };
        let half_width = self.half_width();

        let mut members = Vec::new();
        for forward in [true, false] {
            let mut gap = 0usize;
            let mut step = usize::from(!forward);
            loop {
                let major = if forward {
                    start.checked_add(step)
                } else {
                    start.checked_sub(step)
                };
                let Some(major) = major.filter(|&m| m < extent) else {
                    break;
                };
                let minor = if steep {
                    line.anchor.x + (major as f64 - line.anchor.y) * d.x / d.y
                } else {
                    line.anchor.y + (major as f64 - line.anchor.x) * d.y / d.x
                };
                let center = minor.round() as isize;

                let mut hit = false;
                for q in center.saturating_sub(half_width)..=center.saturating_add(half_width) {
                    if q < 0 {
                        continue;
                    }
                    let (row, col) = if steep {
                        (major, q as usize)
                    } else {
                        (q as usize, major)
                    };
                    if row < height && col < width && state[[row, col]] != EdgeState::Empty {
                        members.push((row, col));
                        hit = true;
                    }
                }

                if hit {
                    gap = 0;
                } else {
                    gap += 1;
                    if gap as f64 > self.params.max_gap {
                        break;
                    }
                }
                step += 1;
            }
        }
        members
    }

    /// Trace from `seed`, re-fitting and re-tracing while the set grows.
    fn trace_refined(
        &self,
        state: &Array2<EdgeState>,
        seed_line: &FittedLine,
        seed: (usize, usize),
    ) -> Vec<(usize, usize)> {
        let mut members = self.trace(state, seed_line, seed);
        for _ in 0..HOUGH_TRACE_PASSES {
            let Some(line) = fit_pixels(&members) else {
                break;
            };
            let next = self.trace(state, &line, seed);
            if next.len() <= members.len() {
                break;
            }
            members = next;
        }
        members
    }

    /// Least-squares segment through `members`, clipped to their extent.
    fn segment_from(&self, members: &[(usize, usize)]) -> Option<LineSegment> {
        let line = fit_pixels(members)?;
        let points = members.iter().map(|&(row, col)| pixel_point(row, col));
        let by_position = |a: &Point2, b: &Point2| line.position(*a).total_cmp(&line.position(*b));
        let first = points.clone().min_by(by_position)?;
        let last = points.max_by(by_position)?;
        if line.position(last) - line.position(first) < self.params.min_length {
            return None;
        }

        let (a, b) = (line.project(first), line.project(last));
        Some(LineSegment::new(
            a.x.round() as i32,
            a.y.round() as i32,
            b.x.round() as i32,
            b.y.round() as i32,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgeState {
    Empty,
    /// Edge pixel not yet visited.
    Pending,
    /// Edge pixel whose votes are in the accumulator.
    Voted,
}

struct Accumulator {
    votes: Vec<u32>,
    rho_bins: usize,
    max_rho: f64,
    rho_step: f64,
    cos_table: Vec<f64>,
    sin_table: Vec<f64>,
}

impl Accumulator {
    fn new(width: usize, height: usize, rho_step: f64, theta_step: f64) -> Self {
        let max_rho = ((width * width + height * height) as f64).sqrt();
        let rho_bins = (2.0 * max_rho / rho_step).ceil() as usize + 1;
        let theta_bins = ((PI / theta_step).round() as usize).max(1);

        let (cos_table, sin_table) = (0..theta_bins)
            .map(|t| {
                let theta = t as f64 * theta_step;
                (theta.cos(), theta.sin())
            })
            .unzip();

        Self {
            votes: vec![0; rho_bins * theta_bins],
            rho_bins,
            max_rho,
            rho_step,
            cos_table,
            sin_table,
        }
    }

    fn theta_bins(&self) -> usize {
        self.cos_table.len()
    }

    fn bin(&self, p: Point2, theta: usize) -> usize {
        let rho = p.x * self.cos_table[theta] + p.y * self.sin_table[theta];
        let idx = ((rho + self.max_rho) / self.rho_step).round() as isize;
        theta * self.rho_bins + idx.clamp(0, self.rho_bins as isize - 1) as usize
    }

    /// Adds `p`'s votes and returns `(votes, theta)` of the strongest bin it
    /// touched, lowest theta on ties.
    fn vote(&mut self, p: Point2) -> (u32, usize) {
        let mut best = (0, 0);
        for theta in 0..self.theta_bins() {
            let idx = self.bin(p, theta);
            self.votes[idx] = self.votes[idx].saturating_add(1);
            if self.votes[idx] > best.0 {
                best = (self.votes[idx], theta);
            }
        }
        best
    }

    fn unvote(&mut self, p: Point2) {
        for theta in 0..self.theta_bins() {
            let idx = self.bin(p, theta);
            self.votes[idx] = self.votes[idx].saturating_sub(1);
        }
    }

    /// Line of bin `theta` through `p`.
    fn line_through(&self, theta: usize, p: Point2) -> Option<FittedLine> {
        FittedLine::new(
            Point2::new(-self.sin_table[theta], self.cos_table[theta]),
            p,
        )
    }
}

impl SegmentSource for HoughSegments {
    fn detect(&self, edges: &GrayFrame) -> Vec<LineSegment> {
        let mut order: Vec<(usize, usize)> = edges
            .data
            .indexed_iter()
            .filter(|(_, &v)| v > 0)
            .map(|(idx, _)| idx)
            .collect();
        if order.is_empty() {
            return Vec::new();
        }
        let mut rng = StdRng::seed_from_u64(HOUGH_VISIT_SEED);
        order.shuffle(&mut rng);

        let mut state = edges.data.mapv(|v| {
            if v > 0 {
                EdgeState::Pending
            } else {
                EdgeState::Empty
            }
        });
        let mut acc = Accumulator::new(
            edges.width(),
            edges.height(),
            self.params.rho,
            self.params.theta_deg.to_radians(),
        );
        let threshold = self.params.threshold.max(1);

        let mut segments = Vec::new();
        let mut traces = 0usize;
        for &(row, col) in &order {
            if state[[row, col]] != EdgeState::Pending {
                continue;
            }
            let seed = pixel_point(row, col);
            let (votes, theta) = acc.vote(seed);
            state[[row, col]] = EdgeState::Voted;
            if votes < threshold {
                continue;
            }
            let Some(seed_line) = acc.line_through(theta, seed) else {
                continue;
            };

            traces += 1;
            let members = self.trace_refined(&state, &seed_line, (row, col));
            if let Some(segment) = self.segment_from(&members) {
                segments.push(segment);
            }
            for &(r, c) in &members {
                if state[[r, c]] == EdgeState::Voted {
                    acc.unvote(pixel_point(r, c));
                }
                state[[r, c]] = EdgeState::Empty;
            }
        }

        debug!(
            edge_points = order.len(),
            traces,
            segments = segments.len(),
            "Segment detection complete"
        );
        segments
    }
}

fn pixel_point(row: usize, col: usize) -> Point2 {
    Point2::new(col as f64, row as f64)
}

fn fit_pixels(members: &[(usize, usize)]) -> Option<FittedLine> {
    let points: Vec<Point2> = members.iter().map(|&(r, c)| pixel_point(r, c)).collect();
    let weights = vec![1.0; points.len()];
    weighted_line_fit(&points, &weights)
}
