// src/region.rs
//
// Region of interest: the horizontal band where cones appear.

use crate::config::RoiConfig;
use crate::error::PipelineError;
use crate::types::{Bgr, Frame, Rect};

/// ROI rectangle for a frame of the given size.
///
/// Rows `[floor(H * start), floor(H * start) + floor(H * height))`, all columns.
pub fn roi_rect(
    frame_width: usize,
    frame_height: usize,
    roi: &RoiConfig,
) -> Result<Rect, PipelineError> {
    let h = frame_height as f64;
    let y = (h * roi.start_fraction).floor() as i32;
    let height = (h * roi.height_fraction).floor() as i32;
    let width = frame_width as i32;

    let rect = Rect::new(0, y, width, height);
    if rect.is_empty() || y < 0 || rect.bottom() > frame_height as i32 {
        return Err(PipelineError::InvalidRegion {
            y,
            bottom: rect.bottom(),
            width,
            frame_height: frame_height as i32,
        });
    }
    Ok(rect)
}

/// Borrowed view of a frame restricted to a rectangle.
#[derive(Debug, Clone, Copy)]
pub struct FrameRegion<'a> {
    frame: &'a Frame,
    rect: Rect,
}

impl<'a> FrameRegion<'a> {
    pub fn new(frame: &'a Frame, rect: Rect) -> Result<Self, PipelineError> {
        if rect.x < 0
            || rect.y < 0
            || rect.is_empty()
            || rect.right() > frame.width() as i32
            || rect.bottom() > frame.height() as i32
        {
            return Err(PipelineError::InvalidRegion {
                y: rect.y,
                bottom: rect.bottom(),
                width: rect.width,
                frame_height: frame.height() as i32,
            });
        }
        Ok(Self { frame, rect })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> usize {
        self.rect.width as usize
    }

    pub fn height(&self) -> usize {
        self.rect.height as usize
    }

    /// Pixel at region-local (x, y).
    #[inline]
    pub fn bgr_at(&self, x: usize, y: usize) -> Bgr {
        self.frame
            .bgr_at(self.rect.x as usize + x, self.rect.y as usize + y)
    }
}
