// src/pipeline/metrics.rs
//
// Run counters for the frame loop. Updated by the caller after each
// processed frame; the pipeline itself stays stateless.

use super::frame_result::FrameResult;
use crate::types::SteeringDecision;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub total_frames: Arc<AtomicU64>,
    pub frames_with_left: Arc<AtomicU64>,
    pub frames_with_right: Arc<AtomicU64>,
    pub straight: Arc<AtomicU64>,
    pub left: Arc<AtomicU64>,
    pub right: Arc<AtomicU64>,
    pub ambiguous: Arc<AtomicU64>,
    pub dropped_frames: Arc<AtomicU64>,
    pub pipeline_time_us: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            total_frames: Arc::new(AtomicU64::new(0)),
            frames_with_left: Arc::new(AtomicU64::new(0)),
            frames_with_right: Arc::new(AtomicU64::new(0)),
            straight: Arc::new(AtomicU64::new(0)),
            left: Arc::new(AtomicU64::new(0)),
            right: Arc::new(AtomicU64::new(0)),
            ambiguous: Arc::new(AtomicU64::new(0)),
            dropped_frames: Arc::new(AtomicU64::new(0)),
            pipeline_time_us: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_timing(&self, counter: &AtomicU64, duration_us: u64) {
        counter.store(duration_us, Ordering::Relaxed);
    }

    pub fn record(&self, result: &FrameResult, duration_us: u64) {
        self.inc(&self.total_frames);
        if result.slots.left.is_valid() {
            self.inc(&self.frames_with_left);
        }
        if result.slots.right.is_valid() {
            self.inc(&self.frames_with_right);
        }
        let counter = match result.decision {
            SteeringDecision::Straight => &self.straight,
            SteeringDecision::Left => &self.left,
            SteeringDecision::Right => &self.right,
            SteeringDecision::Ambiguous => &self.ambiguous,
        };
        self.inc(counter);
        self.set_timing(&self.pipeline_time_us, duration_us);
    }

    pub fn record_dropped(&self) {
        self.inc(&self.total_frames);
        self.inc(&self.dropped_frames);
    }

    pub fn fps(&self) -> f64 {
        let frames = self.total_frames.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames.load(Ordering::Relaxed),
            fps: self.fps(),
            frames_with_left: self.frames_with_left.load(Ordering::Relaxed),
            frames_with_right: self.frames_with_right.load(Ordering::Relaxed),
            straight: self.straight.load(Ordering::Relaxed),
            left: self.left.load(Ordering::Relaxed),
            right: self.right.load(Ordering::Relaxed),
            ambiguous: self.ambiguous.load(Ordering::Relaxed),
            dropped_frames: self.dropped_frames.load(Ordering::Relaxed),
            last_pipeline_us: self.pipeline_time_us.load(Ordering::Relaxed),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub fps: f64,
    pub frames_with_left: u64,
    pub frames_with_right: u64,
    pub straight: u64,
    pub left: u64,
    pub right: u64,
    pub ambiguous: u64,
    pub dropped_frames: u64,
    pub last_pipeline_us: u64,
    pub elapsed_secs: f64,
}
