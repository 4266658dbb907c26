mod common;

use std::time::{Duration, Instant};

use rand::prelude::*;

use common::edge_line;
use runway_core::config::HoughParams;
use runway_core::detection::{HoughSegments, LineSegment, SegmentSource};
use runway_core::frame::GrayFrame;

fn column(width: usize, height: usize, x: usize, rows: impl IntoIterator<Item = usize>) -> GrayFrame {
    let mut edges = GrayFrame::zeros(height, width);
    for y in rows {
        edges.data[[y, x]] = 255;
    }
    edges
}

fn params(threshold: u32, min_length: f64, max_gap: f64) -> HoughParams {
    HoughParams {
        threshold,
        min_length,
        max_gap,
        ..HoughParams::default()
    }
}

#[test]
fn test_empty_image_has_no_segments() {
    let detector = HoughSegments::new(HoughParams::default());
    assert!(detector.detect(&GrayFrame::zeros(50, 50)).is_empty());
    assert!(detector.detect(&GrayFrame::zeros(0, 0)).is_empty());
}

#[test]
fn test_vertical_column_single_segment() {
    let edges = column(100, 100, 30, 10..90);
    let segments = HoughSegments::new(HoughParams::default()).detect(&edges);
    assert_eq!(segments, vec![LineSegment::new(30, 10, 30, 89)]);
}

#[test]
fn test_gap_splits_segment() {
    let edges = column(100, 100, 30, (0..40).chain(60..100));

    let mut split = HoughSegments::new(params(20, 30.0, 10.0)).detect(&edges);
    split.sort_by_key(|s| s.start.y);
    assert_eq!(
        split,
        vec![LineSegment::new(30, 0, 30, 39), LineSegment::new(30, 60, 30, 99)]
    );

    let bridged = HoughSegments::new(params(20, 30.0, 35.0)).detect(&edges);
    assert_eq!(bridged, vec![LineSegment::new(30, 0, 30, 99)]);
}

#[test]
fn test_short_runs_are_dropped() {
    let edges = column(100, 100, 30, (0..40).chain(60..100));
    let segments = HoughSegments::new(params(20, 50.0, 10.0)).detect(&edges);
    assert!(segments.is_empty());
}

#[test]
fn test_vote_threshold() {
    let edges = column(100, 100, 30, 10..90);
    let segments = HoughSegments::new(params(100, 10.0, 35.0)).detect(&edges);
    assert!(segments.is_empty());
}

#[test]
fn test_sloped_line_endpoints() {
    let edges = edge_line(1000, 350, 500.0, 520.0);
    let segments = HoughSegments::new(HoughParams::default()).detect(&edges);
    assert_eq!(segments.len(), 1);

    let s = segments[0];
    let (top, bottom) = if s.start.y < s.end.y {
        (s.start, s.end)
    } else {
        (s.end, s.start)
    };
    assert_eq!((top.x, top.y), (500, 0));
    assert_eq!((bottom.x, bottom.y), (520, 349));
}

#[test]
fn test_detection_is_deterministic() {
    let edges = edge_line(300, 200, 100.0, 140.0);
    let detector = HoughSegments::new(HoughParams::default());
    assert_eq!(detector.detect(&edges), detector.detect(&edges));
}

#[test]
fn test_thick_band_is_one_segment() {
    let mut edges = GrayFrame::zeros(200, 400);
    for y in 0..200 {
        edges.data[[y, 194]] = 255;
        edges.data[[y, 195]] = 255;
    }
    let segments = HoughSegments::new(HoughParams::default()).detect(&edges);
    assert_eq!(segments, vec![LineSegment::new(195, 0, 195, 199)]);
}

#[test]
fn test_noisy_image_stays_fast() {
    let (width, height) = (1000, 350);
    let mut rng = StdRng::seed_from_u64(7);
    let mut edges = GrayFrame::zeros(height, width);
    for v in edges.data.iter_mut() {
        if rng.gen_bool(0.3) {
            *v = 255;
        }
    }

    let detector = HoughSegments::new(HoughParams::default());
    let started = Instant::now();
    let segments = detector.detect(&edges);
    let elapsed = started.elapsed();

    assert!(
        elapsed < Duration::from_secs(30),
        "detection on a noisy {width}x{height} image took {elapsed:?}"
    );
    assert_eq!(segments, detector.detect(&edges));
}
