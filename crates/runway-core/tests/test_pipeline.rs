mod common;

use std::io;

use approx::assert_abs_diff_eq;

use common::{edge_line, full_frame_config, sloped_stripe_frame, stripe_frame, PAINT_BGR};
use runway_core::annotate::{CANDIDATE_BGR, FITTED_LINE_BGR, ROI_OUTLINE_BGR};
use runway_core::config::{ConfigStore, EstimatorConfig, GeometryConfig, ParallelFallback};
use runway_core::detection::{
    AlignmentError, DegenerateGeometry, FitOutcome, HoughSegments, LineSegment, Resolution,
    SegmentSource,
};
use runway_core::error::{Result, RunwayError};
use runway_core::frame::{BgrFrame, GrayFrame};
use runway_core::pipeline::{
    estimate_from_edges, process_frame, process_frame_with, run_frames, FitDescriptor, FrameSink,
    NullSink,
};
use runway_core::roi::RegionOfInterest;

fn stripe_config() -> EstimatorConfig {
    EstimatorConfig {
        roi: RegionOfInterest::new(100, 50, 400, 200),
        ..EstimatorConfig::default()
    }
}

fn stripe_scene() -> BgrFrame {
    // ROI columns 195..=204, centered in the 400-wide ROI.
    stripe_frame(600, 300, 295, 304, PAINT_BGR)
}

#[test]
fn test_roi_outside_frame_reports_nothing() {
    let frame = stripe_frame(640, 480, 300, 310, PAINT_BGR);
    let report = process_frame(&frame, &EstimatorConfig::default());

    assert!(report.roi.is_empty());
    assert!(report.raw_segments.is_empty());
    assert_eq!(report.fit, FitOutcome::Absent);
    assert_eq!(report.resolution, Resolution::Absent);
    assert_eq!(report.fit_descriptor, FitDescriptor::default());
    assert!(report.masked.is_empty());
    assert_eq!(report.annotated, frame);
}

#[test]
fn test_empty_scene_has_no_alignment() {
    let frame = BgrFrame::filled(300, 600, [0, 0, 0]);
    let report = process_frame(&frame, &stripe_config());
    assert!(report.raw_segments.is_empty());
    assert!(report.resolution.alignment().is_none());
    assert_eq!(report.fit_descriptor, FitDescriptor::default());
}

#[test]
fn test_centered_stripe_has_zero_lateral_error() {
    let report = process_frame(&stripe_scene(), &stripe_config());

    assert_eq!(report.roi.width, 400);
    assert_eq!(report.roi.height, 200);
    let mut raw = report.raw_segments.clone();
    raw.sort_by_key(|s| s.start.x);
    assert_eq!(
        raw,
        vec![LineSegment::new(195, 0, 195, 199), LineSegment::new(205, 0, 205, 199)]
    );
    assert_eq!(report.candidates, report.raw_segments);

    let error = report.resolution.alignment().expect("alignment");
    assert_abs_diff_eq!(error.lateral_error, 0.0, epsilon = 1e-12);
    assert!(error.angle_error.is_finite());
    assert_abs_diff_eq!(report.fit_descriptor.x, 200.0, epsilon = 1e-9);
}

#[test]
fn test_debug_images() {
    let frame = stripe_scene();
    let report = process_frame(&frame, &stripe_config());

    assert_eq!((report.masked.width(), report.masked.height()), (400, 200));
    assert_eq!(report.masked.pixel(100, 200), PAINT_BGR);
    assert_eq!(report.masked.pixel(100, 20), [0, 0, 0]);

    let annotated = &report.annotated;
    assert_eq!((annotated.width(), annotated.height()), (600, 300));
    assert_eq!(annotated.pixel(50, 100), ROI_OUTLINE_BGR);
    assert_eq!(annotated.pixel(150, 295), CANDIDATE_BGR);
    assert_eq!(annotated.pixel(150, 300), FITTED_LINE_BGR);
    // Outside the ROI nothing is drawn.
    assert_eq!(annotated.pixel(10, 10), frame.pixel(10, 10));
    assert_eq!(annotated.pixel(280, 300), frame.pixel(280, 300));
}

#[test]
fn test_fitted_line_drawn_without_alignment() {
    let mut config = stripe_config();
    config.geometry.parallel_fallback = ParallelFallback::Skip;
    let report = process_frame(&stripe_scene(), &config);

    assert_eq!(
        report.resolution,
        Resolution::Degenerate(DegenerateGeometry::ParallelLines)
    );
    assert!(matches!(report.fit, FitOutcome::Fitted(_)));
    assert_eq!(report.annotated.pixel(150, 300), FITTED_LINE_BGR);
}

#[test]
fn test_synthetic_edge_line_end_to_end() {
    let mut config = full_frame_config(1000, 350);
    config.geometry = GeometryConfig {
        reference_slope: 349.0 / 20.0,
        ..GeometryConfig::default()
    };
    let edges = edge_line(1000, 350, 500.0, 520.0);
    let estimate = estimate_from_edges(&edges, &config, &HoughSegments::new(config.hough));

    assert_eq!(estimate.raw_segments.len(), 1);
    assert_eq!(estimate.candidates.len(), 1);

    let Resolution::Aligned(detail) = estimate.resolution else {
        panic!("expected alignment, got {:?}", estimate.resolution);
    };
    // Bottom-row crossing of the line through (500, 0) and (520, 349).
    let bottom_x = 500.0 + 20.0 * 350.0 / 349.0;
    assert_abs_diff_eq!(detail.bottom.x, bottom_x, epsilon = 1e-9);
    assert_abs_diff_eq!(detail.error.angle_error, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(
        detail.error.lateral_error,
        (500.0 - bottom_x) * config.geometry.lateral_scale,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(detail.error.lateral_error, -0.020, epsilon = 1e-4);
}

#[test]
fn test_shifted_line_moves_lateral_error() {
    let config = full_frame_config(1000, 350);
    let source = HoughSegments::new(config.hough);
    let lateral = |shift: f64| {
        let edges = edge_line(1000, 350, 500.0 + shift, 520.0 + shift);
        estimate_from_edges(&edges, &config, &source)
            .resolution
            .alignment()
            .expect("alignment")
            .lateral_error
    };

    let base = lateral(0.0);
    let shifted = lateral(10.0);
    assert_abs_diff_eq!(shifted - base, -10.0 * config.geometry.lateral_scale, epsilon = 1e-9);
}

#[test]
fn test_thick_stripe_shift_moves_lateral_error() {
    // Both stripe edges run almost parallel to the fitted centerline, so
    // the first raw segment must not be intersected with it.
    let config = full_frame_config(400, 200);
    let lateral = |shift: f64| {
        let frame = sloped_stripe_frame(400, 200, 190.0 + shift, 230.0 + shift, 6, PAINT_BGR);
        let report = process_frame(&frame, &config);
        assert_eq!(report.raw_segments.len(), 2);
        let Resolution::Aligned(detail) = report.resolution else {
            panic!("expected alignment, got {:?}", report.resolution);
        };
        assert!(detail.parallel_fallback);
        assert_abs_diff_eq!(detail.intersection.y, 200.0);
        assert!((0.0..=400.0).contains(&detail.intersection.x));
        detail.error.lateral_error
    };

    let base = lateral(0.0);
    for d in [5.0, 10.0, 20.0] {
        assert_abs_diff_eq!(
            lateral(d) - base,
            -d * config.geometry.lateral_scale,
            epsilon = 1e-9
        );
    }
}

/// Returns fixed segments regardless of the image.
struct FixedSegments(Vec<LineSegment>);

impl SegmentSource for FixedSegments {
    fn detect(&self, _edges: &GrayFrame) -> Vec<LineSegment> {
        self.0.clone()
    }
}

#[test]
fn test_custom_segment_source() {
    let source = FixedSegments(vec![
        LineSegment::new(0, 100, 399, 100),
        LineSegment::new(200, 0, 200, 199),
    ]);
    let report = process_frame_with(&stripe_scene(), &stripe_config(), &source);

    // The horizontal segment fails the slope test but is still the
    // lateral reference.
    assert_eq!(report.candidates, vec![LineSegment::new(200, 0, 200, 199)]);
    let Resolution::Aligned(detail) = report.resolution else {
        panic!("expected alignment");
    };
    assert!(!detail.parallel_fallback);
    assert_abs_diff_eq!(detail.intersection.x, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(detail.intersection.y, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(detail.error.lateral_error, 0.0, epsilon = 1e-12);
}

#[test]
fn test_only_shallow_segments_means_no_detection() {
    let source = FixedSegments(vec![LineSegment::new(0, 100, 399, 110)]);
    let report = process_frame_with(&stripe_scene(), &stripe_config(), &source);
    assert!(report.candidates.is_empty());
    assert_eq!(report.fit, FitOutcome::Absent);
    assert!(report.resolution.alignment().is_none());
    assert_eq!(report.fit_descriptor, FitDescriptor::default());
}

#[derive(Default)]
struct RecordingSink {
    fits: Vec<(usize, FitDescriptor)>,
    alignments: Vec<(usize, AlignmentError)>,
    images: usize,
    fail_images: bool,
}

impl FrameSink for RecordingSink {
    fn publish_fit(&mut self, index: usize, fit: &FitDescriptor) {
        self.fits.push((index, *fit));
    }

    fn publish_alignment(&mut self, index: usize, error: &AlignmentError) {
        self.alignments.push((index, *error));
    }

    fn publish_debug_images(
        &mut self,
        _index: usize,
        _annotated: &BgrFrame,
        _masked: &BgrFrame,
    ) -> Result<()> {
        self.images += 1;
        if self.fail_images {
            return Err(RunwayError::Io(io::Error::other("disk full")));
        }
        Ok(())
    }
}

fn frame_stream() -> Vec<Result<BgrFrame>> {
    vec![
        Ok(stripe_scene()),
        Err(RunwayError::Io(io::Error::new(io::ErrorKind::InvalidData, "corrupt"))),
        Ok(BgrFrame::filled(300, 600, [0, 0, 0])),
    ]
}

#[test]
fn test_run_frames_skips_decode_failures() {
    let store = ConfigStore::new(stripe_config()).unwrap();
    let mut sink = RecordingSink::default();
    let summary = run_frames(frame_stream(), &store, &mut sink);

    assert_eq!(summary.frames_seen, 3);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.aligned, 1);

    let fit_indices: Vec<usize> = sink.fits.iter().map(|(i, _)| *i).collect();
    assert_eq!(fit_indices, vec![0, 2]);
    assert_eq!(sink.fits[1].1, FitDescriptor::default());
    assert_eq!(sink.alignments.len(), 1);
    assert_eq!(sink.alignments[0].0, 0);
    assert_eq!(sink.images, 2);
}

#[test]
fn test_run_frames_survives_debug_image_errors() {
    let store = ConfigStore::new(stripe_config()).unwrap();
    let mut sink = RecordingSink {
        fail_images: true,
        ..RecordingSink::default()
    };
    let summary = run_frames(frame_stream(), &store, &mut sink);
    assert_eq!(summary.processed, 2);
    assert_eq!(sink.fits.len(), 2);
}

#[test]
fn test_run_frames_with_null_sink() {
    let store = ConfigStore::new(stripe_config()).unwrap();
    let summary = run_frames(frame_stream(), &store, &mut NullSink);
    assert_eq!(summary.aligned, 1);
    assert_eq!(summary.skipped, 1);
}
