use approx::assert_abs_diff_eq;

use runway_core::detection::{classify_segments, LineSegment, SlopeThreshold};

#[test]
fn test_tolerance_to_min_slope() {
    let threshold = SlopeThreshold::from_tolerance_deg(25.0);
    assert_abs_diff_eq!(threshold.min_abs_slope(), 65f64.to_radians().tan(), epsilon = 1e-12);
    assert_abs_diff_eq!(threshold.min_abs_slope(), 2.1445069, epsilon = 1e-6);
}

#[test]
fn test_boundary_is_inclusive() {
    let threshold = SlopeThreshold::from_min_abs_slope(2.0);
    assert!(threshold.accepts(&LineSegment::new(0, 0, 1, 2)));
    assert!(threshold.accepts(&LineSegment::new(0, 0, 1, -2)));
    assert!(!threshold.accepts(&LineSegment::new(0, 0, 100, 199)));
}

#[test]
fn test_tolerance_boundary_is_inclusive() {
    // 45° tolerance: the boundary slope is exactly one.
    let threshold = SlopeThreshold::from_tolerance_deg(45.0);
    assert!(threshold.accepts(&LineSegment::new(0, 0, 1, 1)));
    assert!(threshold.accepts(&LineSegment::new(0, 0, 1, -1)));
    assert!(threshold.accepts(&LineSegment::new(10, 10, 60, 60)));
    assert!(!threshold.accepts(&LineSegment::new(0, 0, 100, 99)));
}

#[test]
fn test_vertical_always_accepted() {
    let threshold = SlopeThreshold::from_tolerance_deg(1.0);
    assert!(threshold.accepts(&LineSegment::new(5, 0, 5, 100)));
}

#[test]
fn test_horizontal_rejected() {
    let threshold = SlopeThreshold::from_tolerance_deg(89.0);
    assert!(!threshold.accepts(&LineSegment::new(0, 5, 100, 5)));
}

#[test]
fn test_classify_keeps_order_and_endpoints() {
    let segments = [
        LineSegment::new(10, 0, 12, 40),
        LineSegment::new(0, 0, 50, 5),
        LineSegment::new(30, 0, 30, 60),
    ];
    let classified = classify_segments(&segments, &SlopeThreshold::from_tolerance_deg(25.0));

    assert_eq!(classified.candidates, vec![segments[0], segments[2]]);
    assert_eq!(classified.points.len(), 4);
    assert_eq!((classified.points[0].x, classified.points[0].y), (10.0, 0.0));
    assert_eq!((classified.points[1].x, classified.points[1].y), (12.0, 40.0));
    assert_eq!((classified.points[3].x, classified.points[3].y), (30.0, 60.0));
}

#[test]
fn test_classify_empty() {
    let classified = classify_segments(&[], &SlopeThreshold::from_tolerance_deg(25.0));
    assert!(classified.is_empty());
    assert!(classified.points.is_empty());
}
