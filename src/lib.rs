// src/lib.rs
//
// Two-color cone perception and steering classification, one frame at a time.

pub mod color_segmentation;
pub mod config;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod region;
pub mod steering;
pub mod steering_model;
pub mod types;

#[cfg(feature = "opencv")]
pub mod overlay;
#[cfg(feature = "opencv")]
pub mod video_processor;

pub use config::Config;
pub use error::PipelineError;
pub use pipeline::{ConePipeline, FrameResult, PipelineMetrics};
pub use types::{
    ColorClass, Detection, Frame, PixelFormat, Point2D, Rect, Slot, SlotPair, SteeringDecision,
};
