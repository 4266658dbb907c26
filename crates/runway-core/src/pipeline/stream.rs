use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::detection::AlignmentError;
use crate::error::Result;
use crate::frame::BgrFrame;

use super::estimator::process_frame;
use super::types::FitDescriptor;

/// Receives per-frame results. All methods default to no-ops.
pub trait FrameSink {
    /// Called for every processed frame, with a zeroed descriptor when
    /// nothing was fit.
    fn publish_fit(&mut self, _index: usize, _fit: &FitDescriptor) {}

    /// Called only when the frame produced a defined alignment.
    fn publish_alignment(&mut self, _index: usize, _error: &AlignmentError) {}

    /// Errors are logged and otherwise ignored.
    fn publish_debug_images(
        &mut self,
        _index: usize,
        _annotated: &BgrFrame,
        _masked: &BgrFrame,
    ) -> Result<()> {
        Ok(())
    }
}

/// Sink that discards everything.
pub struct NullSink;
impl FrameSink for NullSink {}

/// Counters for one [`run_frames`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    pub frames_seen: usize,
    pub processed: usize,
    /// Frames that failed to decode.
    pub skipped: usize,
    /// Frames that produced an alignment error.
    pub aligned: usize,
}

/// Process frames in order, taking a fresh config snapshot per frame.
///
/// A frame that fails to decode is logged and skipped; the stream continues.
pub fn run_frames<I, S>(frames: I, store: &ConfigStore, sink: &mut S) -> StreamSummary
where
    I: IntoIterator<Item = Result<BgrFrame>>,
    S: FrameSink + ?Sized,
{
    let mut summary = StreamSummary::default();

    for (index, frame) in frames.into_iter().enumerate() {
        summary.frames_seen += 1;
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!(index, error = %e, "Skipping frame that failed to decode");
                summary.skipped += 1;
                continue;
            }
        };

        let config = store.snapshot();
        let report = process_frame(&frame, &config);
        summary.processed += 1;

        sink.publish_fit(index, &report.fit_descriptor);
        if let Some(error) = report.resolution.alignment() {
            summary.aligned += 1;
            sink.publish_alignment(index, &error);
        }
        if let Err(e) = sink.publish_debug_images(index, &report.annotated, &report.masked) {
            debug!(index, error = %e, "Debug image publish failed");
        }
    }

    summary
}
