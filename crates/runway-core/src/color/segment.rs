use ndarray::Array2;
use tracing::debug;

use crate::config::HsvRange;
use crate::filters::median::median_blur;
use crate::frame::{BgrFrame, GrayFrame};

use super::convert::{bgr_to_hsv, to_gray};

/// Output of color segmentation for one region of interest.
#[derive(Clone, Debug)]
pub struct Segmented {
    /// Masked and median-smoothed color crop.
    pub masked: BgrFrame,
    /// Grayscale conversion of `masked`.
    pub gray: GrayFrame,
    /// Pixels that passed the HSV test, before smoothing.
    pub mask: Array2<bool>,
}

/// Binary mask of pixels whose HSV value lies inside `range` on all channels.
pub fn hsv_mask(frame: &BgrFrame, range: &HsvRange) -> Array2<bool> {
    let (h, w) = (frame.height(), frame.width());
    Array2::from_shape_fn((h, w), |(row, col)| {
        range.contains(bgr_to_hsv(frame.pixel(row, col)))
    })
}

/// Zero every pixel outside `mask`.
pub fn apply_mask(frame: &BgrFrame, mask: &Array2<bool>) -> BgrFrame {
    let mut out = frame.clone();
    for ((row, col), &keep) in mask.indexed_iter() {
        if !keep {
            out.set_pixel(row, col, [0, 0, 0]);
        }
    }
    out
}

/// Keep only pixels inside `range`; the rest become black.
///
/// Applying this to its own output returns the output unchanged.
pub fn mask_color(frame: &BgrFrame, range: &HsvRange) -> (BgrFrame, Array2<bool>) {
    let mask = hsv_mask(frame, range);
    (apply_mask(frame, &mask), mask)
}

/// Color-segment a cropped region: HSV mask, median smoothing, grayscale.
pub fn segment_color(crop: &BgrFrame, range: &HsvRange, median_kernel: usize) -> Segmented {
    let (masked, mask) = mask_color(crop, range);
    let smoothed = median_blur(&masked, median_kernel);
    let gray = to_gray(&smoothed);

    debug!(
        width = crop.width(),
        height = crop.height(),
        passing = mask.iter().filter(|&&m| m).count(),
        "Color segmentation complete"
    );

    Segmented {
        masked: smoothed,
        gray,
        mask,
    }
}
