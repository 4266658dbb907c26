use ndarray::Array2;

use crate::consts::{HUE_RANGE, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::frame::{BgrFrame, GrayFrame};

/// Convert one BGR pixel to 8-bit HSV.
///
/// Hue is halved into [0, 180); saturation and value span [0, 255].
pub fn bgr_to_hsv(bgr: [u8; 3]) -> [u8; 3] {
    let [b, g, r] = bgr.map(i32::from);
    let v = b.max(g).max(r);
    let min = b.min(g).min(r);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        (255.0 * diff as f32 / v as f32).round() as i32
    };

    let h = if diff == 0 {
        0
    } else {
        // Sixths of the hue circle, scaled so a full turn is HUE_RANGE.
        let sector = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let mut h = (sector as f32 * HUE_RANGE as f32 / (6.0 * diff as f32)).round() as i32;
        if h < 0 {
            h += HUE_RANGE as i32;
        }
        h
    };

    [h as u8, s.clamp(0, 255) as u8, v as u8]
}

/// BT.601 luminance of one BGR pixel, rounded to the nearest level.
pub fn bgr_to_gray(bgr: [u8; 3]) -> u8 {
    let y = LUMINANCE_B * bgr[0] as f32 + LUMINANCE_G * bgr[1] as f32 + LUMINANCE_R * bgr[2] as f32;
    y.round().clamp(0.0, 255.0) as u8
}

/// Grayscale conversion of a whole frame.
pub fn to_gray(frame: &BgrFrame) -> GrayFrame {
    let (h, w) = (frame.height(), frame.width());
    let data = Array2::from_shape_fn((h, w), |(row, col)| bgr_to_gray(frame.pixel(row, col)));
    GrayFrame::new(data)
}
