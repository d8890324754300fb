// src/pipeline/mod.rs

pub mod frame_result;
pub mod metrics;
pub mod orchestrator;

pub use frame_result::FrameResult;
pub use metrics::{MetricsSummary, PipelineMetrics};
pub use orchestrator::ConePipeline;
