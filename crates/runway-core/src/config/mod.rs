mod store;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_HOUGH_MAX_GAP, DEFAULT_HOUGH_MIN_LENGTH, DEFAULT_HOUGH_RHO, DEFAULT_HOUGH_THETA_DEG,
    DEFAULT_HOUGH_THRESHOLD, DEFAULT_HUBER_DELTA, DEFAULT_HUE_HIGH, DEFAULT_HUE_LOW,
    DEFAULT_LATERAL_SCALE, DEFAULT_MEDIAN_KERNEL, DEFAULT_MIN_CROSSING_SIN,
    DEFAULT_REFERENCE_SLOPE, DEFAULT_SAT_HIGH, DEFAULT_SAT_LOW, DEFAULT_SLOPE_TOLERANCE_DEG,
    DEFAULT_VAL_HIGH, DEFAULT_VAL_LOW, HUE_RANGE,
};
use crate::error::{Result, RunwayError};
use crate::roi::RegionOfInterest;

pub use store::ConfigStore;

/// Complete tuning for one estimator run.
///
/// Treated as an immutable snapshot: a frame is processed against exactly
/// one `EstimatorConfig`, and reconfiguration replaces the whole value
/// (see [`ConfigStore`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Median filter window applied to the masked crop.
    #[serde(default = "default_median_kernel")]
    pub median_kernel: usize,
    #[serde(default)]
    pub fit: FitDistance,
    #[serde(default)]
    pub roi: RegionOfInterest,
    #[serde(default)]
    pub color: HsvRange,
    #[serde(default)]
    pub slope: SlopeConfig,
    #[serde(default)]
    pub hough: HoughParams,
    #[serde(default)]
    pub geometry: GeometryConfig,
}

fn default_median_kernel() -> usize {
    DEFAULT_MEDIAN_KERNEL
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            median_kernel: DEFAULT_MEDIAN_KERNEL,
            fit: FitDistance::default(),
            roi: RegionOfInterest::default(),
            color: HsvRange::default(),
            slope: SlopeConfig::default(),
            hough: HoughParams::default(),
            geometry: GeometryConfig::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.median_kernel == 0 || self.median_kernel % 2 == 0 {
            return Err(RunwayError::InvalidConfig(format!(
                "median_kernel must be odd and positive, got {}",
                self.median_kernel
            )));
        }
        self.color.validate()?;
        self.slope.validate()?;
        self.hough.validate()?;
        self.fit.validate()?;
        self.geometry.validate()?;
        Ok(())
    }
}

/// Inclusive HSV band, OpenCV 8-bit convention (hue in [0, 180)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub hue_low: u8,
    pub hue_high: u8,
    pub sat_low: u8,
    pub sat_high: u8,
    pub val_low: u8,
    pub val_high: u8,
}

impl Default for HsvRange {
    fn default() -> Self {
        Self {
            hue_low: DEFAULT_HUE_LOW,
            hue_high: DEFAULT_HUE_HIGH,
            sat_low: DEFAULT_SAT_LOW,
            sat_high: DEFAULT_SAT_HIGH,
            val_low: DEFAULT_VAL_LOW,
            val_high: DEFAULT_VAL_HIGH,
        }
    }
}

impl HsvRange {
    pub fn low(&self) -> [u8; 3] {
        [self.hue_low, self.sat_low, self.val_low]
    }

    pub fn high(&self) -> [u8; 3] {
        [self.hue_high, self.sat_high, self.val_high]
    }

    /// True when every channel of `hsv` lies inside its band.
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        let low = self.low();
        let high = self.high();
        (0..3).all(|ch| hsv[ch] >= low[ch] && hsv[ch] <= high[ch])
    }

    fn validate(&self) -> Result<()> {
        let names = ["hue", "saturation", "value"];
        let (low, high) = (self.low(), self.high());
        for ch in 0..3 {
            if low[ch] > high[ch] {
                return Err(RunwayError::InvalidConfig(format!(
                    "{} range is inverted: {} > {}",
                    names[ch], low[ch], high[ch]
                )));
            }
        }
        if self.hue_low >= HUE_RANGE {
            return Err(RunwayError::InvalidConfig(format!(
                "hue_low {} is outside [0, {HUE_RANGE})",
                self.hue_low
            )));
        }
        Ok(())
    }
}

/// Steepness requirement for candidate segments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlopeConfig {
    /// Maximum deviation from vertical, in degrees.
    #[serde(default = "default_tolerance_deg")]
    pub tolerance_deg: f64,
}

fn default_tolerance_deg() -> f64 {
    DEFAULT_SLOPE_TOLERANCE_DEG
}

impl Default for SlopeConfig {
    fn default() -> Self {
        Self {
            tolerance_deg: DEFAULT_SLOPE_TOLERANCE_DEG,
        }
    }
}

impl SlopeConfig {
    fn validate(&self) -> Result<()> {
        if !(self.tolerance_deg > 0.0 && self.tolerance_deg < 90.0) {
            return Err(RunwayError::InvalidConfig(format!(
                "slope tolerance must be in (0, 90) degrees, got {}",
                self.tolerance_deg
            )));
        }
        Ok(())
    }
}

/// Parameters of the line segment detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoughParams {
    /// Distance resolution of the accumulator, in pixels.
    #[serde(default = "default_rho")]
    pub rho: f64,
    /// Angle resolution of the accumulator, in degrees.
    #[serde(default = "default_theta_deg")]
    pub theta_deg: f64,
    /// Minimum accumulator votes for a line.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Shortest segment reported, in pixels.
    #[serde(default = "default_min_length")]
    pub min_length: f64,
    /// Largest gap between points of one segment, in pixels.
    #[serde(default = "default_max_gap")]
    pub max_gap: f64,
}

fn default_rho() -> f64 {
    DEFAULT_HOUGH_RHO
}
fn default_theta_deg() -> f64 {
    DEFAULT_HOUGH_THETA_DEG
}
fn default_threshold() -> u32 {
    DEFAULT_HOUGH_THRESHOLD
}
fn default_min_length() -> f64 {
    DEFAULT_HOUGH_MIN_LENGTH
}
fn default_max_gap() -> f64 {
    DEFAULT_HOUGH_MAX_GAP
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: DEFAULT_HOUGH_RHO,
            theta_deg: DEFAULT_HOUGH_THETA_DEG,
            threshold: DEFAULT_HOUGH_THRESHOLD,
            min_length: DEFAULT_HOUGH_MIN_LENGTH,
            max_gap: DEFAULT_HOUGH_MAX_GAP,
        }
    }
}

impl HoughParams {
    fn validate(&self) -> Result<()> {
        if !(self.rho.is_finite() && self.rho > 0.0) {
            return Err(RunwayError::InvalidConfig(format!(
                "hough rho must be positive, got {}",
                self.rho
            )));
        }
        if !(self.theta_deg.is_finite() && self.theta_deg > 0.0 && self.theta_deg <= 90.0) {
            return Err(RunwayError::InvalidConfig(format!(
                "hough theta must be in (0, 90] degrees, got {}",
                self.theta_deg
            )));
        }
        if !(self.min_length.is_finite() && self.min_length >= 0.0) {
            return Err(RunwayError::InvalidConfig(
                "hough min_length must be non-negative".into(),
            ));
        }
        if !(self.max_gap.is_finite() && self.max_gap >= 0.0) {
            return Err(RunwayError::InvalidConfig(
                "hough max_gap must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Distance measure minimized by the line fitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum FitDistance {
    /// Plain orthogonal least squares.
    #[default]
    L2,
    /// Huber loss: quadratic within `delta` pixels, linear beyond.
    Huber { delta: f64 },
}

impl FitDistance {
    pub fn huber() -> Self {
        Self::Huber {
            delta: DEFAULT_HUBER_DELTA,
        }
    }

    fn validate(&self) -> Result<()> {
        if let Self::Huber { delta } = self {
            if !(delta.is_finite() && *delta > 0.0) {
                return Err(RunwayError::InvalidConfig(format!(
                    "Huber delta must be positive, got {delta}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for FitDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L2 => write!(f, "L2"),
            Self::Huber { delta } => write!(f, "Huber (delta={delta})"),
        }
    }
}

/// What to use as the lateral reference point when the first detected
/// segment is parallel to the fitted line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParallelFallback {
    /// Where the fitted line crosses the bottom row of the ROI.
    #[default]
    RoiBottom,
    /// Report no alignment for the frame.
    Skip,
}

impl fmt::Display for ParallelFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoiBottom => write!(f, "ROI bottom"),
            Self::Skip => write!(f, "Skip"),
        }
    }
}

/// Conversion of the fitted line into alignment errors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Slope (rows per column) of the line at perfect alignment.
    #[serde(default = "default_reference_slope")]
    pub reference_slope: f64,
    /// Pixel to output-unit factor for the lateral error.
    #[serde(default = "default_lateral_scale")]
    pub lateral_scale: f64,
    /// Smallest `|sin|` of the angle between the reference segment and the
    /// fitted line for their intersection to be used.
    #[serde(default = "default_min_crossing_sin")]
    pub min_crossing_sin: f64,
    #[serde(default)]
    pub parallel_fallback: ParallelFallback,
}

fn default_reference_slope() -> f64 {
    DEFAULT_REFERENCE_SLOPE
}
fn default_lateral_scale() -> f64 {
    DEFAULT_LATERAL_SCALE
}
fn default_min_crossing_sin() -> f64 {
    DEFAULT_MIN_CROSSING_SIN
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            reference_slope: DEFAULT_REFERENCE_SLOPE,
            lateral_scale: DEFAULT_LATERAL_SCALE,
            min_crossing_sin: DEFAULT_MIN_CROSSING_SIN,
            parallel_fallback: ParallelFallback::default(),
        }
    }
}

impl GeometryConfig {
    fn validate(&self) -> Result<()> {
        if !self.reference_slope.is_finite() || !self.lateral_scale.is_finite() {
            return Err(RunwayError::InvalidConfig(
                "reference_slope and lateral_scale must be finite".into(),
            ));
        }
        if !(self.min_crossing_sin > 0.0 && self.min_crossing_sin < 1.0) {
            return Err(RunwayError::InvalidConfig(format!(
                "min_crossing_sin must be in (0, 1), got {}",
                self.min_crossing_sin
            )));
        }
        Ok(())
    }
}
