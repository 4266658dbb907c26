#![allow(dead_code)]

use ndarray::Array2;

use runway_core::config::EstimatorConfig;
use runway_core::frame::{BgrFrame, GrayFrame};
use runway_core::roi::RegionOfInterest;

/// A BGR color inside the default HSV band: H=15, S=46, V=110, gray 102.
pub const PAINT_BGR: [u8; 3] = [90, 100, 110];

/// Black frame with a vertical stripe of `bgr` over columns `lo..=hi`.
pub fn stripe_frame(width: usize, height: usize, lo: usize, hi: usize, bgr: [u8; 3]) -> BgrFrame {
    let mut frame = BgrFrame::filled(height, width, [0, 0, 0]);
    for row in 0..height {
        for col in lo..=hi.min(width - 1) {
            frame.set_pixel(row, col, bgr);
        }
    }
    frame
}

/// Black frame with a `2 * half_width + 1` px band of `bgr` centered on the
/// line from `(x_top, 0)` towards `(x_bottom, height)`.
pub fn sloped_stripe_frame(
    width: usize,
    height: usize,
    x_top: f64,
    x_bottom: f64,
    half_width: i64,
    bgr: [u8; 3],
) -> BgrFrame {
    let mut frame = BgrFrame::filled(height, width, [0, 0, 0]);
    for row in 0..height {
        let center = (x_top + (x_bottom - x_top) * row as f64 / height as f64).round() as i64;
        for col in (center - half_width)..=(center + half_width) {
            if col >= 0 && (col as usize) < width {
                frame.set_pixel(row, col as usize, bgr);
            }
        }
    }
    frame
}

/// Edge image with one rasterized line from `(x_top, 0)` towards
/// `(x_bottom, height)`: one pixel per row at
/// `round(x_top + (x_bottom - x_top) * y / height)`.
pub fn edge_line(width: usize, height: usize, x_top: f64, x_bottom: f64) -> GrayFrame {
    let mut data = Array2::<u8>::zeros((height, width));
    for y in 0..height {
        let x = (x_top + (x_bottom - x_top) * y as f64 / height as f64).round();
        if x >= 0.0 && (x as usize) < width {
            data[[y, x as usize]] = 255;
        }
    }
    GrayFrame::new(data)
}

/// Default config with the ROI covering `(0, 0, width, height)`.
pub fn full_frame_config(width: usize, height: usize) -> EstimatorConfig {
    EstimatorConfig {
        roi: RegionOfInterest::new(0, 0, width as i64, height as i64),
        ..EstimatorConfig::default()
    }
}
