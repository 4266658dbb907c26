use std::path::Path;

use image::{ImageFormat, RgbImage};
use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, RunwayError};
use crate::frame::BgrFrame;

/// File extensions treated as frames when expanding a directory.
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Whether `path` has one of [`FRAME_EXTENSIONS`] (case-insensitive).
pub fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FRAME_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Load any image the `image` crate can decode as an 8-bit BGR frame.
pub fn load_bgr_frame(path: &Path) -> Result<BgrFrame> {
    let rgb = image::open(path)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    let mut data = Array3::<u8>::zeros((h as usize, w as usize, COLOR_CHANNEL_COUNT));

    for (col, row, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let (row, col) = (row as usize, col as usize);
        data[[row, col, 0]] = b;
        data[[row, col, 1]] = g;
        data[[row, col, 2]] = r;
    }

    Ok(BgrFrame { data })
}

/// Save a BGR frame as 8-bit RGB, format chosen from the extension.
/// Unknown extensions are written as PNG.
pub fn save_bgr_frame(frame: &BgrFrame, path: &Path) -> Result<()> {
    if frame.is_empty() {
        return Err(RunwayError::InvalidDimensions {
            width: frame.width(),
            height: frame.height(),
        });
    }

    let (h, w) = (frame.height(), frame.width());
    let mut img = RgbImage::new(w as u32, h as u32);
    for (col, row, pixel) in img.enumerate_pixels_mut() {
        let [b, g, r] = frame.pixel(row as usize, col as usize);
        pixel.0 = [r, g, b];
    }

    match ImageFormat::from_path(path) {
        Ok(format) => img.save_with_format(path, format)?,
        Err(_) => img.save_with_format(path, ImageFormat::Png)?,
    }
    Ok(())
}
