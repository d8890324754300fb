// src/pipeline/frame_result.rs
//
// Everything the pipeline concluded about one frame. Built once, read by
// the overlay, the metrics and the results log; never updated afterwards.

use crate::detection::SlotBoxes;
use crate::types::{Rect, SlotPair, SteeringDecision};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameResult {
    pub frame_id: u64,
    pub timestamp_ms: f64,
    pub roi: Rect,
    pub slots: SlotPair,
    pub boxes: SlotBoxes,
    pub left_angle: Option<f64>,
    pub right_angle: Option<f64>,
    pub decision: SteeringDecision,
}

impl FrameResult {
    pub fn cones_found(&self) -> usize {
        self.slots.left.is_valid() as usize + self.slots.right.is_valid() as usize
    }
}
