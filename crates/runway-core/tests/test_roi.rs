use runway_core::frame::BgrFrame;
use runway_core::roi::{crop_frame, RegionOfInterest};

#[test]
fn test_roi_inside_frame_unchanged() {
    let roi = RegionOfInterest::new(10, 20, 30, 40).clipped(100, 100);
    assert_eq!((roi.x, roi.y, roi.width, roi.height), (10, 20, 30, 40));
}

#[test]
fn test_roi_clipped_at_right_and_bottom() {
    let roi = RegionOfInterest::new(80, 90, 50, 50).clipped(100, 100);
    assert_eq!((roi.x, roi.y, roi.width, roi.height), (80, 90, 20, 10));
}

#[test]
fn test_roi_negative_origin_clipped() {
    let roi = RegionOfInterest::new(-10, -5, 30, 20).clipped(100, 100);
    assert_eq!((roi.x, roi.y, roi.width, roi.height), (0, 0, 20, 15));
}

#[test]
fn test_roi_fully_outside_is_empty() {
    let roi = RegionOfInterest::default().clipped(640, 480);
    assert!(roi.is_empty());

    let roi = RegionOfInterest::new(-100, -100, 50, 50).clipped(640, 480);
    assert!(roi.is_empty());
}

#[test]
fn test_roi_negative_size_is_empty() {
    let roi = RegionOfInterest::new(10, 10, -5, 20).clipped(100, 100);
    assert!(roi.is_empty());
}

#[test]
fn test_crop_copies_region() {
    let mut frame = BgrFrame::filled(10, 10, [0, 0, 0]);
    frame.set_pixel(3, 4, [1, 2, 3]);

    let roi = RegionOfInterest::new(4, 3, 2, 2).clipped(10, 10);
    let crop = crop_frame(&frame, &roi);

    assert_eq!(crop.width(), 2);
    assert_eq!(crop.height(), 2);
    assert_eq!(crop.pixel(0, 0), [1, 2, 3]);
    assert_eq!(crop.pixel(1, 1), [0, 0, 0]);
}

#[test]
fn test_crop_empty_roi_gives_empty_frame() {
    let frame = BgrFrame::filled(10, 10, [5, 5, 5]);
    let roi = RegionOfInterest::new(50, 50, 10, 10).clipped(10, 10);
    assert!(crop_frame(&frame, &roi).is_empty());
}
