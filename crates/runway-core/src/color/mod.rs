pub mod convert;
pub mod segment;

pub use convert::{bgr_to_gray, bgr_to_hsv, to_gray};
pub use segment::{apply_mask, hsv_mask, mask_color, segment_color, Segmented};
