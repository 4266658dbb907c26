pub mod image_io;

pub use image_io::{is_frame_file, load_bgr_frame, save_bgr_frame};
