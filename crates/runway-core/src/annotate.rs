//! Diagnostic overlays. Nothing here feeds back into estimation.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use ndarray::Array3;
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::detection::geometry::boundary_crossings;
use crate::detection::{FitOutcome, LineSegment, Point2};
use crate::frame::BgrFrame;
use crate::roi::EffectiveRoi;

/// Raw detector output.
pub const RAW_SEGMENT_BGR: [u8; 3] = [0, 255, 0];
/// Segments that passed the slope test.
pub const CANDIDATE_BGR: [u8; 3] = [255, 0, 0];
/// The fitted line between the ROI's bottom and top rows.
pub const FITTED_LINE_BGR: [u8; 3] = [0, 0, 255];
pub const ROI_OUTLINE_BGR: [u8; 3] = [0, 255, 255];

const LINE_THICKNESS: i32 = 2;

/// What to draw for one frame, in ROI coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Overlay<'a> {
    pub roi: &'a EffectiveRoi,
    pub raw_segments: &'a [LineSegment],
    pub candidates: &'a [LineSegment],
    /// Drawn between the ROI's bottom and top rows whenever a line was
    /// fitted, whatever the geometry made of it.
    pub fit: &'a FitOutcome,
}

/// Copy of `frame` with the overlay drawn on it.
///
/// Never fails: if the frame cannot be wrapped as a drawing canvas the
/// copy is returned without overlays.
pub fn annotate(frame: &BgrFrame, overlay: &Overlay<'_>) -> BgrFrame {
    let Some(mut canvas) = to_canvas(frame) else {
        debug!("Annotation skipped: frame is not drawable");
        return frame.clone();
    };

    let origin = Point2::new(overlay.roi.x as f64, overlay.roi.y as f64);
    if !overlay.roi.is_empty() {
        let rect = Rect::at(overlay.roi.x as i32, overlay.roi.y as i32)
            .of_size(overlay.roi.width as u32, overlay.roi.height as u32);
        draw_hollow_rect_mut(&mut canvas, rect, Rgb(ROI_OUTLINE_BGR));
    }

    for segment in overlay.raw_segments {
        let (a, b) = (segment.start.to_point(), segment.end.to_point());
        draw_segment(&mut canvas, origin, a, b, RAW_SEGMENT_BGR);
    }
    for segment in overlay.candidates {
        let (a, b) = (segment.start.to_point(), segment.end.to_point());
        draw_segment(&mut canvas, origin, a, b, CANDIDATE_BGR);
    }
    let crossings = overlay
        .fit
        .line()
        .and_then(|line| boundary_crossings(line, overlay.roi.height as f64));
    if let Some((bottom, top)) = crossings {
        draw_segment(&mut canvas, origin, bottom, top, FITTED_LINE_BGR);
    }

    from_canvas(canvas).unwrap_or_else(|| frame.clone())
}

/// Draw a `LINE_THICKNESS`-pixel line, offset across its minor axis.
fn draw_segment(canvas: &mut RgbImage, origin: Point2, a: Point2, b: Point2, bgr: [u8; 3]) {
    let a = Point2::new(origin.x + a.x, origin.y + a.y);
    let b = Point2::new(origin.x + b.x, origin.y + b.y);
    let (w, h) = canvas.dimensions();
    let Some((a, b)) = clip_to_canvas(a, b, w as f64, h as f64) else {
        return;
    };

    let steep = (b.y - a.y).abs() > (b.x - a.x).abs();
    for k in 0..LINE_THICKNESS {
        let (ox, oy) = if steep { (k as f64, 0.0) } else { (0.0, k as f64) };
        draw_line_segment_mut(
            canvas,
            ((a.x + ox) as f32, (a.y + oy) as f32),
            ((b.x + ox) as f32, (b.y + oy) as f32),
            Rgb(bgr),
        );
    }
}

/// Liang-Barsky clip of `a-b` to `[0, w) x [0, h)`.
fn clip_to_canvas(a: Point2, b: Point2, w: f64, h: f64) -> Option<(Point2, Point2)> {
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    let edges = [
        (-dx, a.x),
        (dx, w - 1.0 - a.x),
        (-dy, a.y),
        (dy, h - 1.0 - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((
        Point2::new(a.x + t0 * dx, a.y + t0 * dy),
        Point2::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

// Channel order stays BGR inside the canvas; imageproc does not interpret it.
fn to_canvas(frame: &BgrFrame) -> Option<RgbImage> {
    if frame.is_empty() {
        return None;
    }
    let raw: Vec<u8> = frame.data.iter().copied().collect();
    RgbImage::from_raw(frame.width() as u32, frame.height() as u32, raw)
}

fn from_canvas(canvas: RgbImage) -> Option<BgrFrame> {
    let (w, h) = canvas.dimensions();
    let data = Array3::from_shape_vec(
        (h as usize, w as usize, COLOR_CHANNEL_COUNT),
        canvas.into_raw(),
    )
    .ok()?;
    Some(BgrFrame { data })
}
