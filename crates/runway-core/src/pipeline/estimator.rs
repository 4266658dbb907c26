use tracing::debug;

use crate::annotate::{annotate, Overlay};
use crate::color::segment_color;
use crate::config::EstimatorConfig;
use crate::detection::{
    classify_segments, fit_line, resolve, HoughSegments, SegmentSource, SlopeThreshold,
};
use crate::edges::edge_strength;
use crate::frame::{BgrFrame, GrayFrame};
use crate::roi::crop_frame;

use super::types::{Estimate, FitDescriptor, FrameReport};

/// Run the full per-frame pipeline with the Hough detector from `config`.
pub fn process_frame(frame: &BgrFrame, config: &EstimatorConfig) -> FrameReport {
    let source = HoughSegments::new(config.hough);
    process_frame_with(frame, config, &source)
}

/// Run the per-frame pipeline with a caller-supplied segment detector.
pub fn process_frame_with<S>(frame: &BgrFrame, config: &EstimatorConfig, source: &S) -> FrameReport
where
    S: SegmentSource + ?Sized,
{
    let roi = config.roi.clipped(frame.width(), frame.height());
    let crop = crop_frame(frame, &roi);
    let segmented = segment_color(&crop, &config.color, config.median_kernel);
    let edges = edge_strength(&segmented.gray);

    let estimate = estimate_from_edges(&edges, config, source);
    let fit_descriptor = FitDescriptor::from(&estimate.fit);

    let annotated = annotate(
        frame,
        &Overlay {
            roi: &roi,
            raw_segments: &estimate.raw_segments,
            candidates: &estimate.candidates,
            fit: &estimate.fit,
        },
    );

    FrameReport {
        roi,
        raw_segments: estimate.raw_segments,
        candidates: estimate.candidates,
        fit: estimate.fit,
        resolution: estimate.resolution,
        fit_descriptor,
        annotated,
        masked: segmented.masked,
    }
}

/// Segment detection through geometry resolution on an edge image that
/// already covers the region of interest.
pub fn estimate_from_edges<S>(edges: &GrayFrame, config: &EstimatorConfig, source: &S) -> Estimate
where
    S: SegmentSource + ?Sized,
{
    let raw_segments = if edges.is_empty() {
        Vec::new()
    } else {
        source.detect(edges)
    };

    let threshold = SlopeThreshold::from_tolerance_deg(config.slope.tolerance_deg);
    let classified = classify_segments(&raw_segments, &threshold);
    let fit = fit_line(&classified.points, &config.fit);
    let resolution = resolve(
        &fit,
        raw_segments.first(),
        edges.width(),
        edges.height(),
        &config.geometry,
    );

    debug!(
        raw = raw_segments.len(),
        candidates = classified.candidates.len(),
        aligned = resolution.alignment().is_some(),
        "Frame estimate complete"
    );

    Estimate {
        raw_segments,
        candidates: classified.candidates,
        fit,
        resolution,
    }
}
