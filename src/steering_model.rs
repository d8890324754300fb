// src/steering_model.rs
//
// Steering-angle estimate from yaw rate, scored against the recorded
// ground-truth steering request. Independent of the cone pipeline.

use crate::config::ScoringConfig;
use std::fmt;

#[derive(Debug, Clone)]
pub struct SteeringModel {
    coefficients: Vec<f64>,
    lower_ratio: f64,
    upper_ratio: f64,
}

impl SteeringModel {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            coefficients: config.coefficients.clone(),
            lower_ratio: config.lower_ratio,
            upper_ratio: config.upper_ratio,
        }
    }

    /// Σ cᵢ · vⁱ over the coefficient table, lowest order first.
    pub fn predict(&self, angular_velocity_z: f64) -> f64 {
        // Horner, highest order first
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * angular_velocity_z + c)
    }

    /// Prediction accepted when inside [lower·gt, upper·gt]; bounds swap for negative gt.
    pub fn within_tolerance(&self, prediction: f64, ground_truth: f64) -> bool {
        let (lo, hi) = if ground_truth < 0.0 {
            (self.upper_ratio * ground_truth, self.lower_ratio * ground_truth)
        } else {
            (self.lower_ratio * ground_truth, self.upper_ratio * ground_truth)
        };
        prediction >= lo && prediction <= hi
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccuracyTracker {
    pub total: u64,
    pub correct: u64,
}

impl AccuracyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores one sample. Samples with zero ground truth are skipped and return `None`.
    pub fn record(
        &mut self,
        model: &SteeringModel,
        prediction: f64,
        ground_truth: f64,
    ) -> Option<bool> {
        if ground_truth == 0.0 {
            return None;
        }
        self.total += 1;
        let hit = model.within_tolerance(prediction, ground_truth);
        if hit {
            self.correct += 1;
        }
        Some(hit)
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// `group;timestamp_us;prediction` output line.
#[derive(Debug, Clone)]
pub struct ScoreLine<'a> {
    pub group: &'a str,
    pub timestamp_us: i64,
    pub prediction: f64,
}

impl fmt::Display for ScoreLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.group, self.timestamp_us, self.prediction)
    }
}
