pub mod classify;
pub mod fit;
pub mod geometry;
pub mod hough;
pub mod types;

pub use classify::{classify_segments, Classified, SlopeThreshold};
pub use fit::{fit_line, FitOutcome};
pub use geometry::{
    resolve, AlignmentDetail, AlignmentError, DegenerateGeometry, Resolution,
};
pub use hough::{HoughSegments, SegmentSource};
pub use types::{saturate_slope, FittedLine, LineSegment, PixelPoint, Point2};
