// src/pipeline/orchestrator.rs
//
// Per-frame composition:
//   roi_rect -> (segment -> boundaries -> extract) x 2 colors -> slot pair -> steering
//
// The pipeline only reads the frame. Annotation happens afterwards in
// `overlay::annotate`, so drawn shapes can never feed back into detection.

use super::frame_result::FrameResult;
use crate::config::DetectionConfig;
use crate::detection::{select_cones, BoundaryFinder};
use crate::error::PipelineError;
use crate::region::{roi_rect, FrameRegion};
use crate::steering::SteeringDecider;
use crate::types::Frame;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ConePipeline<B> {
    config: DetectionConfig,
    decider: SteeringDecider,
    finder: B,
}

impl<B: BoundaryFinder> ConePipeline<B> {
    /// Validates the configuration once; a bad config is a startup error.
    pub fn new(config: DetectionConfig, finder: B) -> Result<Self, PipelineError> {
        config.validate()?;
        let decider = SteeringDecider::new(&config.steering);
        Ok(Self {
            config,
            decider,
            finder,
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn decider(&self) -> &SteeringDecider {
        &self.decider
    }

    pub fn process(&self, frame_id: u64, frame: &Frame) -> Result<FrameResult, PipelineError> {
        let roi = roi_rect(frame.width(), frame.height(), &self.config.roi)?;
        let region = FrameRegion::new(frame, roi)?;

        let selection = select_cones(&self.finder, &region, &self.config)?;
        let assessment = self
            .decider
            .decide(&selection.slots, frame.width(), frame.height());

        debug!(
            "Frame {}: left={:?} right={:?} -> {}",
            frame_id,
            selection.slots.left.as_option(),
            selection.slots.right.as_option(),
            assessment.decision.as_str()
        );

        Ok(FrameResult {
            frame_id,
            timestamp_ms: frame.timestamp_ms,
            roi,
            slots: selection.slots,
            boxes: selection.boxes,
            left_angle: assessment.left_angle,
            right_angle: assessment.right_angle,
            decision: assessment.decision,
        })
    }
}
