use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::frame::BgrFrame;

/// Median filter each channel over a `ksize` x `ksize` window.
///
/// Borders replicate the edge pixel. `ksize` of 1 (or an empty frame)
/// returns a copy.
pub fn median_blur(frame: &BgrFrame, ksize: usize) -> BgrFrame {
    if ksize <= 1 || frame.is_empty() {
        return frame.clone();
    }
    let (h, w) = (frame.height(), frame.width());
    let radius = ksize / 2;
    let src = frame.data.view();

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<u8>> = (0..h)
            .into_par_iter()
            .map(|row| median_row(&src, row, radius))
            .collect();

        let mut data = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (i, val) in row_data.into_iter().enumerate() {
                data[[row, i / COLOR_CHANNEL_COUNT, i % COLOR_CHANNEL_COUNT]] = val;
            }
        }
        BgrFrame { data }
    } else {
        let mut data = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));
        for row in 0..h {
            for (i, val) in median_row(&src, row, radius).into_iter().enumerate() {
                data[[row, i / COLOR_CHANNEL_COUNT, i % COLOR_CHANNEL_COUNT]] = val;
            }
        }
        BgrFrame { data }
    }
}

/// Medians for every (col, channel) of one row, interleaved.
fn median_row(src: &ArrayView3<u8>, row: usize, radius: usize) -> Vec<u8> {
    let (h, w, _) = src.dim();
    let side = 2 * radius + 1;
    let mut window = Vec::with_capacity(side * side);
    let mut out = Vec::with_capacity(w * COLOR_CHANNEL_COUNT);

    for col in 0..w {
        for ch in 0..COLOR_CHANNEL_COUNT {
            window.clear();
            for dr in 0..side {
                let r = (row + dr).saturating_sub(radius).min(h - 1);
                for dc in 0..side {
                    let c = (col + dc).saturating_sub(radius).min(w - 1);
                    window.push(src[[r, c, ch]]);
                }
            }
            let mid = window.len() / 2;
            let (_, median, _) = window.select_nth_unstable(mid);
            out.push(*median);
        }
    }

    out
}
