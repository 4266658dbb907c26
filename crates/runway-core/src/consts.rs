/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a BGR frame.
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Hue is stored halved so that it fits in a byte: [0, 180).
pub const HUE_RANGE: u8 = 180;

/// Default region of interest (x, y, width, height) in frame coordinates.
pub const DEFAULT_ROI_X: i64 = 2250;
pub const DEFAULT_ROI_Y: i64 = 400;
pub const DEFAULT_ROI_WIDTH: i64 = 1000;
pub const DEFAULT_ROI_HEIGHT: i64 = 350;

/// Default HSV band isolating weathered white paint.
pub const DEFAULT_HUE_LOW: u8 = 0;
pub const DEFAULT_HUE_HIGH: u8 = 25;
pub const DEFAULT_SAT_LOW: u8 = 27;
pub const DEFAULT_SAT_HIGH: u8 = 80;
pub const DEFAULT_VAL_LOW: u8 = 70;
pub const DEFAULT_VAL_HIGH: u8 = 125;

/// Default median filter window (must be odd).
pub const DEFAULT_MEDIAN_KERNEL: usize = 7;

/// Default angular tolerance from vertical, in degrees.
pub const DEFAULT_SLOPE_TOLERANCE_DEG: f64 = 25.0;

/// Camera-frame slope of the ground line at perfect alignment.
pub const DEFAULT_REFERENCE_SLOPE: f64 = 1.8;

/// Pixel to output-unit factor for lateral error.
pub const DEFAULT_LATERAL_SCALE: f64 = 0.001;

/// Default Hough distance resolution in pixels.
pub const DEFAULT_HOUGH_RHO: f64 = 1.0;

/// Default Hough angle resolution in degrees.
pub const DEFAULT_HOUGH_THETA_DEG: f64 = 1.0;

/// Default accumulator threshold (votes).
pub const DEFAULT_HOUGH_THRESHOLD: u32 = 50;

/// Default minimum segment length in pixels.
pub const DEFAULT_HOUGH_MIN_LENGTH: f64 = 50.0;

/// Default maximum gap bridged inside one segment, in pixels.
pub const DEFAULT_HOUGH_MAX_GAP: f64 = 35.0;

/// Seed of the fixed edge-point visiting order used by the Hough detector.
pub const HOUGH_VISIT_SEED: u64 = 0x5eed_1a7e;

/// Line re-fits while tracing one Hough candidate.
pub const HOUGH_TRACE_PASSES: usize = 3;

/// Default Huber threshold (pixels) for robust fitting.
pub const DEFAULT_HUBER_DELTA: f64 = 2.0;

/// Iteration cap for reweighted line fitting.
pub const FIT_MAX_ITERATIONS: usize = 20;

/// Direction change below which reweighted fitting is considered converged.
pub const FIT_CONVERGENCE_EPS: f64 = 1e-9;

/// Magnitude reported in place of an infinite slope.
pub const MAX_SLOPE: f64 = 1.0e4;

/// Sine of the angle below which two lines are treated as parallel.
pub const PARALLEL_SIN_EPS: f64 = 1e-9;

/// Default minimum crossing sine (about 0.57 degrees) between the reference
/// segment and the fitted line before their intersection is trusted.
pub const DEFAULT_MIN_CROSSING_SIN: f64 = 1e-2;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-12;
