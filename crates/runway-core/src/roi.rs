use ndarray::s;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ROI_HEIGHT, DEFAULT_ROI_WIDTH, DEFAULT_ROI_X, DEFAULT_ROI_Y};
use crate::frame::BgrFrame;

/// A rectangle in frame coordinates. Coordinates may be negative and the
/// rectangle may extend past the frame; [`RegionOfInterest::clipped`] yields
/// the part that actually exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        Self {
            x: DEFAULT_ROI_X,
            y: DEFAULT_ROI_Y,
            width: DEFAULT_ROI_WIDTH,
            height: DEFAULT_ROI_HEIGHT,
        }
    }
}

impl RegionOfInterest {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersect with a `frame_w` x `frame_h` image.
    ///
    /// An empty intersection is returned as a zero-sized rectangle anchored
    /// at the clamped origin, never as an error.
    pub fn clipped(&self, frame_w: usize, frame_h: usize) -> EffectiveRoi {
        let x0 = self.x.clamp(0, frame_w as i64);
        let y0 = self.y.clamp(0, frame_h as i64);
        let x1 = self.x.saturating_add(self.width.max(0)).clamp(0, frame_w as i64);
        let y1 = self.y.saturating_add(self.height.max(0)).clamp(0, frame_h as i64);

        EffectiveRoi {
            x: x0 as usize,
            y: y0 as usize,
            width: (x1 - x0).max(0) as usize,
            height: (y1 - y0).max(0) as usize,
        }
    }
}

/// A region of interest already intersected with the frame bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveRoi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl EffectiveRoi {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Copy the effective region out of `frame`. Empty regions give an empty frame.
pub fn crop_frame(frame: &BgrFrame, roi: &EffectiveRoi) -> BgrFrame {
    if roi.is_empty() {
        return BgrFrame::empty();
    }
    let view = frame.data.slice(s![
        roi.y..roi.y + roi.height,
        roi.x..roi.x + roi.width,
        ..
    ]);
    BgrFrame {
        data: view.to_owned(),
    }
}
