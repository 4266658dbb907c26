use ndarray::{Array2, Array3};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, RunwayError};

/// A single 8-bit color frame in BGR channel order.
#[derive(Clone, Debug, PartialEq)]
pub struct BgrFrame {
    /// Pixel data, row-major, shape = (height, width, 3)
    pub data: Array3<u8>,
}

impl BgrFrame {
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != COLOR_CHANNEL_COUNT {
            return Err(RunwayError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        Ok(Self { data })
    }

    /// A frame filled with one BGR color.
    pub fn filled(height: usize, width: usize, bgr: [u8; 3]) -> Self {
        let data = Array3::from_shape_fn((height, width, COLOR_CHANNEL_COUNT), |(_, _, ch)| bgr[ch]);
        Self { data }
    }

    /// A zero-sized frame, produced when the region of interest misses the image.
    pub fn empty() -> Self {
        Self {
            data: Array3::zeros((0, 0, COLOR_CHANNEL_COUNT)),
        }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        ]
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, bgr: [u8; 3]) {
        for (ch, &v) in bgr.iter().enumerate() {
            self.data[[row, col, ch]] = v;
        }
    }
}

/// A single-channel 8-bit image (grayscale or edge strength).
#[derive(Clone, Debug, PartialEq)]
pub struct GrayFrame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
}

impl GrayFrame {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
