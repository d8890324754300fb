// src/error.rs

use thiserror::Error;

/// Errors raised by the perception pipeline.
///
/// A frame without cones is not an error; it yields sentinel detections.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("invalid region: rows {y}..{bottom} exceed frame height {frame_height} (width {width})")]
    InvalidRegion {
        y: i32,
        bottom: i32,
        width: i32,
        frame_height: i32,
    },

    #[error("frame buffer size mismatch: expected {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("vision backend: {0}")]
    Vision(String),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        PipelineError::InvalidConfig(msg.into())
    }
}

#[cfg(feature = "opencv")]
impl From<opencv::Error> for PipelineError {
    fn from(err: opencv::Error) -> Self {
        PipelineError::Vision(err.to_string())
    }
}
