use serde::Serialize;

use crate::detection::{saturate_slope, FitOutcome, LineSegment, Resolution};
use crate::frame::BgrFrame;
use crate::roi::EffectiveRoi;

/// Anchor and slope of the fitted line, in ROI coordinates.
///
/// Published for every frame; all zero when no line was fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FitDescriptor {
    pub x: f64,
    pub y: f64,
    /// Saturated to `±MAX_SLOPE` for vertical lines.
    pub slope: f64,
}

impl From<&FitOutcome> for FitDescriptor {
    fn from(fit: &FitOutcome) -> Self {
        match fit.line() {
            Some(line) => Self {
                x: line.anchor.x,
                y: line.anchor.y,
                slope: saturate_slope(line.slope()),
            },
            None => Self::default(),
        }
    }
}

/// Numeric result of estimation from an edge image, before annotation.
#[derive(Clone, Debug)]
pub struct Estimate {
    /// Detector output, in detection order.
    pub raw_segments: Vec<LineSegment>,
    /// Segments that passed the slope test.
    pub candidates: Vec<LineSegment>,
    pub fit: FitOutcome,
    pub resolution: Resolution,
}

/// Everything produced for one frame.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub roi: EffectiveRoi,
    pub raw_segments: Vec<LineSegment>,
    pub candidates: Vec<LineSegment>,
    pub fit: FitOutcome,
    pub resolution: Resolution,
    pub fit_descriptor: FitDescriptor,
    /// Full frame with segments, fit and ROI outline drawn on it.
    pub annotated: BgrFrame,
    /// Color-masked, median-smoothed ROI crop.
    pub masked: BgrFrame,
}
