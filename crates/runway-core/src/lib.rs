pub mod annotate;
pub mod color;
pub mod config;
pub mod consts;
pub mod detection;
pub mod edges;
pub mod error;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod roi;

pub use config::{ConfigStore, EstimatorConfig};
pub use detection::AlignmentError;
pub use error::{Result, RunwayError};
pub use frame::{BgrFrame, GrayFrame};
pub use pipeline::{process_frame, run_frames, FitDescriptor, FrameReport, FrameSink};
