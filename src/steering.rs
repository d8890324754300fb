// src/steering.rs
//
// Bearing of each cone from the vehicle reference point, classified into a
// discrete steering decision with two threshold zones around straight ahead.
//
// Angles are in degrees, measured counter-clockwise from the +x axis with
// image y flipped, so a cone straight ahead sits at 90°, to the right < 90°
// and to the left > 90°.

use crate::config::{ReferencePoint, SteeringConfig};
use crate::types::{Point2D, SlotPair, SteeringDecision};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteeringAssessment {
    pub left_angle: Option<f64>,
    pub right_angle: Option<f64>,
    pub decision: SteeringDecision,
}

#[derive(Debug, Clone, Copy)]
pub struct SteeringDecider {
    left_threshold: f64,
    right_threshold: f64,
    reference: ReferencePoint,
}

impl SteeringDecider {
    pub fn new(config: &SteeringConfig) -> Self {
        Self {
            left_threshold: 90.0 + config.margin_degrees,
            right_threshold: 90.0 - config.margin_degrees,
            reference: config.reference,
        }
    }

    pub fn left_threshold(&self) -> f64 {
        self.left_threshold
    }

    pub fn right_threshold(&self) -> f64 {
        self.right_threshold
    }

    pub fn reference_point(&self, frame_width: usize, frame_height: usize) -> Point2D {
        match self.reference {
            ReferencePoint::BottomCenter => {
                Point2D::new((frame_width / 2) as i32, frame_height as i32)
            }
        }
    }

    pub fn decide(
        &self,
        slots: &SlotPair,
        frame_width: usize,
        frame_height: usize,
    ) -> SteeringAssessment {
        let origin = self.reference_point(frame_width, frame_height);
        let left_angle = slots.left.as_option().map(|p| bearing_degrees(origin, p));
        let right_angle = slots.right.as_option().map(|p| bearing_degrees(origin, p));
        let decision = self.classify(left_angle, right_angle);

        debug!(
            "Steering: left={:?} right={:?} thresholds L{:.1}/R{:.1} -> {}",
            left_angle,
            right_angle,
            self.left_threshold,
            self.right_threshold,
            decision.as_str()
        );

        SteeringAssessment {
            left_angle,
            right_angle,
            decision,
        }
    }

    /// Threshold rule on already computed bearings. `None` means no cone in that slot.
    pub fn classify(&self, left_angle: Option<f64>, right_angle: Option<f64>) -> SteeringDecision {
        let turn_right = right_angle.is_some_and(|a| a >= self.right_threshold);
        let turn_left = left_angle.is_some_and(|a| 180.0 - a <= self.left_threshold);

        match (turn_left, turn_right) {
            (true, true) => SteeringDecision::Ambiguous,
            (true, false) => SteeringDecision::Left,
            (false, true) => SteeringDecision::Right,
            (false, false) => SteeringDecision::Straight,
        }
    }
}

/// Angle of the vector origin -> target, in degrees, image y flipped.
pub fn bearing_degrees(origin: Point2D, target: Point2D) -> f64 {
    let dx = (target.x - origin.x) as f64;
    let dy = (origin.y - target.y) as f64;
    dy.atan2(dx).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Detection;

    fn decider(margin: f64) -> SteeringDecider {
        SteeringDecider::new(&SteeringConfig {
            margin_degrees: margin,
            ..SteeringConfig::default()
        })
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_thresholds_from_margin() {
        let d = decider(50.0);
        assert_eq!(d.left_threshold(), 140.0);
        assert_eq!(d.right_threshold(), 40.0);
    }

    #[test]
    fn test_bearing_quadrants() {
        let o = Point2D::new(320, 480);
        assert!(close(bearing_degrees(o, Point2D::new(320, 380)), 90.0));
        assert!(close(bearing_degrees(o, Point2D::new(420, 380)), 45.0));
        assert!(close(bearing_degrees(o, Point2D::new(220, 380)), 135.0));
        assert!(close(bearing_degrees(o, Point2D::new(420, 480)), 0.0));
        assert!(close(bearing_degrees(o, Point2D::new(220, 480)), 180.0));
        assert!(close(bearing_degrees(o, Point2D::new(220, 580)), -135.0));
    }

    #[test]
    fn test_no_cones_is_straight() {
        assert_eq!(decider(50.0).classify(None, None), SteeringDecision::Straight);
        let a = decider(50.0).decide(&SlotPair::default(), 640, 480);
        assert_eq!(a.decision, SteeringDecision::Straight);
        assert_eq!(a.left_angle, None);
        assert_eq!(a.right_angle, None);
    }

    #[test]
    fn test_left_cone_at_140_degrees() {
        // 180 - 140 = 40 <= 140
        let d = decider(50.0);
        assert!(180.0 - 140.0 <= d.left_threshold());
        assert_eq!(d.classify(Some(140.0), None), SteeringDecision::Left);
    }

    #[test]
    fn test_left_condition_boundary_inclusive() {
        let d = decider(50.0);
        // 180 - 40 == 140 exactly
        assert_eq!(d.classify(Some(40.0), None), SteeringDecision::Left);
        assert_eq!(d.classify(Some(39.5), None), SteeringDecision::Straight);
    }

    #[test]
    fn test_right_condition_boundary_inclusive() {
        let d = decider(50.0);
        assert_eq!(d.classify(None, Some(40.0)), SteeringDecision::Right);
        assert_eq!(d.classify(None, Some(39.999)), SteeringDecision::Straight);
    }

    #[test]
    fn test_both_conditions_ambiguous() {
        let d = decider(50.0);
        assert_eq!(
            d.classify(Some(120.0), Some(70.0)),
            SteeringDecision::Ambiguous
        );
    }

    #[test]
    fn test_right_far_out_left_missing_is_straight() {
        let d = decider(50.0);
        assert_eq!(d.classify(None, Some(10.0)), SteeringDecision::Straight);
    }

    #[test]
    fn test_decide_from_slots() {
        let d = decider(50.0);
        let slots = SlotPair {
            left: Detection::missing(),
            right: Detection::found(Point2D::new(420, 380)),
        };
        let a = d.decide(&slots, 640, 480);
        assert!(close(a.right_angle.unwrap(), 45.0));
        assert_eq!(a.decision, SteeringDecision::Right);

        let slots = SlotPair {
            left: Detection::found(Point2D::new(220, 380)),
            right: Detection::found(Point2D::new(420, 380)),
        };
        assert_eq!(
            d.decide(&slots, 640, 480).decision,
            SteeringDecision::Ambiguous
        );
    }

    #[test]
    fn test_zero_margin() {
        let d = decider(0.0);
        assert_eq!(d.classify(None, Some(90.0)), SteeringDecision::Right);
        assert_eq!(d.classify(Some(90.0), None), SteeringDecision::Left);
        assert_eq!(d.classify(Some(89.0), None), SteeringDecision::Straight);
    }
}
