//! Horizontal-gradient edge strength.
//!
//! The masked grayscale crop is correlated with a Sobel-weighted Prewitt
//! pair, one kernel per gradient sign. Each response is saturated to 8 bits
//! before the two are added, so a rising and a falling boundary both show up
//! while flat and mostly-horizontal texture stays dark.

use ndarray::Array2;
use tracing::debug;

use crate::frame::GrayFrame;

/// Responds to dark-to-bright transitions from left to right.
pub const PREWITT_POSITIVE: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Responds to bright-to-dark transitions from left to right.
pub const PREWITT_NEGATIVE: [[i32; 3]; 3] = [[1, 0, -1], [2, 0, -2], [1, 0, -1]];

/// Edge-strength image of the same size as `gray`.
pub fn edge_strength(gray: &GrayFrame) -> GrayFrame {
    if gray.is_empty() {
        return gray.clone();
    }
    let rising = correlate3x3(&gray.data, &PREWITT_POSITIVE);
    let falling = correlate3x3(&gray.data, &PREWITT_NEGATIVE);

    let mut data = rising;
    data.zip_mut_with(&falling, |a, &b| *a = a.saturating_add(b));

    debug!(
        nonzero = data.iter().filter(|&&v| v > 0).count(),
        "Edge extraction complete"
    );
    GrayFrame::new(data)
}

/// 3x3 correlation saturated to [0, 255], reflect-101 border.
pub fn correlate3x3(data: &Array2<u8>, kernel: &[[i32; 3]; 3]) -> Array2<u8> {
    let (h, w) = data.dim();
    let mut result = Array2::<u8>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let mut sum = 0i32;
            for (kr, krow) in kernel.iter().enumerate() {
                let r = reflect101(row as isize + kr as isize - 1, h);
                for (kc, &kv) in krow.iter().enumerate() {
                    if kv == 0 {
                        continue;
                    }
                    let c = reflect101(col as isize + kc as isize - 1, w);
                    sum += kv * data[[r, c]] as i32;
                }
            }
            result[[row, col]] = sum.clamp(0, 255) as u8;
        }
    }

    result
}

/// Mirror an index about the border without repeating the edge sample.
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= n {
        i = 2 * (n - 1) - i;
    }
    i.clamp(0, n - 1) as usize
}
