// src/config.rs

use crate::error::PipelineError;
use crate::types::ColorClass;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub scoring: ScoringConfig,
    pub video: VideoConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.detection.validate()?;
        self.scoring.validate()
    }
}

// ============================================================================
// DETECTION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub roi: RoiConfig,
    pub colors: ColorConfig,
    pub edges: EdgeConfig,
    pub blob: BlobConfig,
    pub steering: SteeringConfig,
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.roi.validate()?;
        for class in ColorClass::ALL {
            self.colors
                .bounds(class)
                .validate()
                .map_err(|e| PipelineError::config(format!("{} bounds: {}", class.as_str(), e)))?;
        }
        self.edges.validate()?;
        self.steering.validate()
    }
}

/// Horizontal band of the frame searched for cones, as fractions of frame height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    pub start_fraction: f64,
    pub height_fraction: f64,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            start_fraction: 0.55,
            height_fraction: 0.23,
        }
    }
}

impl RoiConfig {
    fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..1.0).contains(&self.start_fraction) {
            return Err(PipelineError::config(format!(
                "roi.start_fraction {} must be in [0, 1)",
                self.start_fraction
            )));
        }
        if self.height_fraction <= 0.0 || self.start_fraction + self.height_fraction > 1.0 {
            return Err(PipelineError::config(format!(
                "roi.height_fraction {} must be > 0 and fit below start {}",
                self.height_fraction, self.start_fraction
            )));
        }
        Ok(())
    }
}

/// Inclusive HSV range, OpenCV 8-bit scale (H 0-180, S/V 0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvBounds {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvBounds {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }

    fn validate(&self) -> Result<(), String> {
        if (0..3).any(|c| self.lower[c] > self.upper[c]) {
            return Err(format!("lower {:?} exceeds upper {:?}", self.lower, self.upper));
        }
        if self.upper[0] > 180 {
            return Err(format!("hue {} above 180", self.upper[0]));
        }
        Ok(())
    }
}

/// Bounds per cone color. Defaults need recalibration against real footage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub blue: HsvBounds,
    pub yellow: HsvBounds,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            blue: HsvBounds::new([100, 100, 0], [140, 255, 255]),
            yellow: HsvBounds::new([16, 0, 143], [39, 255, 255]),
        }
    }
}

impl ColorConfig {
    pub fn bounds(&self, class: ColorClass) -> HsvBounds {
        match class {
            ColorClass::Blue => self.blue,
            ColorClass::Yellow => self.yellow,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

impl EdgeConfig {
    fn validate(&self) -> Result<(), PipelineError> {
        if self.low_threshold < 0.0 || self.low_threshold > self.high_threshold {
            return Err(PipelineError::config(format!(
                "edge thresholds {}/{} must satisfy 0 <= low <= high",
                self.low_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    /// A bounding box must be strictly larger than this (px²) to count as a cone.
    pub min_area: i64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self { min_area: 400 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePoint {
    #[default]
    BottomCenter,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub margin_degrees: f64,
    pub reference: ReferencePoint,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            margin_degrees: 50.0,
            reference: ReferencePoint::BottomCenter,
        }
    }
}

impl SteeringConfig {
    fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=90.0).contains(&self.margin_degrees) {
            return Err(PipelineError::config(format!(
                "steering.margin_degrees {} must be in [0, 90]",
                self.margin_degrees
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SCORING / VIDEO / LOGGING
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Polynomial coefficients, lowest order first.
    pub coefficients: Vec<f64>,
    pub lower_ratio: f64,
    pub upper_ratio: f64,
    pub group: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coefficients: vec![
                0.0,
                3.88192460e-03,
                -2.24144143e-05,
                -5.07314594e-07,
                7.27527660e-09,
                3.34496405e-11,
                -5.53052388e-13,
            ],
            lower_ratio: 0.75,
            upper_ratio: 1.25,
            group: "group_02".to_string(),
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<(), PipelineError> {
        if self.coefficients.is_empty() {
            return Err(PipelineError::config("scoring.coefficients is empty"));
        }
        if self.lower_ratio <= 0.0 || self.lower_ratio > self.upper_ratio {
            return Err(PipelineError::config(format!(
                "scoring ratios {}/{} must satisfy 0 < lower <= upper",
                self.lower_ratio, self.upper_ratio
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub save_annotated: bool,
    pub display: bool,
    pub results_file: Option<String>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            input_dir: "videos".to_string(),
            output_dir: "output".to_string(),
            save_annotated: false,
            display: false,
            results_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = r#"
detection:
  blob:
    min_area: 750
  colors:
    yellow:
      lower: [20, 80, 120]
      upper: [35, 255, 255]
logging:
  level: debug
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.detection.blob.min_area, 750);
        assert_eq!(config.detection.colors.yellow.lower, [20, 80, 120]);
        assert_eq!(config.detection.colors.blue, ColorConfig::default().blue);
        assert_eq!(config.detection.roi.start_fraction, 0.55);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_roi_outside_frame_rejected() {
        let mut config = Config::default();
        config.detection.roi.start_fraction = 0.9;
        config.detection.roi.height_fraction = 0.2;
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = Config::default();
        config.detection.colors.blue = HsvBounds::new([140, 0, 0], [100, 255, 255]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("BLUE"));
    }

    #[test]
    fn test_margin_range() {
        let mut config = Config::default();
        config.detection.steering.margin_degrees = 91.0;
        assert!(config.validate().is_err());
        config.detection.steering.margin_degrees = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bounds_inclusive() {
        let b = HsvBounds::new([16, 0, 143], [39, 255, 255]);
        assert!(b.contains([16, 0, 143]));
        assert!(b.contains([39, 255, 255]));
        assert!(!b.contains([15, 0, 143]));
        assert!(!b.contains([30, 10, 142]));
    }
}
