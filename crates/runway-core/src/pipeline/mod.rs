mod estimator;
mod stream;
mod types;

pub use estimator::{estimate_from_edges, process_frame, process_frame_with};
pub use stream::{run_frames, FrameSink, NullSink, StreamSummary};
pub use types::{Estimate, FitDescriptor, FrameReport};
