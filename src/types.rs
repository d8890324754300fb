// src/types.rs

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

// ============================================================================
// FRAME
// ============================================================================

/// Byte layout of a frame buffer. Channel order follows OpenCV (blue first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Bgr,
    Bgra,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Bgr => 3,
            PixelFormat::Bgra => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: usize,
    height: usize,
    format: PixelFormat,
    pub timestamp_ms: f64,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        format: PixelFormat,
        timestamp_ms: f64,
    ) -> Result<Self, PipelineError> {
        let expected = width * height * format.channels();
        if data.len() != expected {
            return Err(PipelineError::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
            timestamp_ms,
        })
    }

    /// Frame filled with a single BGR color.
    pub fn filled(width: usize, height: usize, format: PixelFormat, color: Bgr) -> Self {
        let channels = format.channels();
        let mut data = vec![255u8; width * height * channels];
        for px in data.chunks_exact_mut(channels) {
            px[0] = color.b;
            px[1] = color.g;
            px[2] = color.r;
        }
        Self {
            data,
            width,
            height,
            format,
            timestamp_ms: 0.0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at (x, y) as BGR. Caller guarantees the coordinate is in bounds.
    #[inline]
    pub fn bgr_at(&self, x: usize, y: usize) -> Bgr {
        let idx = (y * self.width + x) * self.format.channels();
        Bgr::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Writes a BGR pixel, leaving alpha untouched. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_bgr(&mut self, x: i32, y: i32, color: Bgr) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * self.format.channels();
        self.data[idx] = color.b;
        self.data[idx + 1] = color.g;
        self.data[idx + 2] = color.r;
    }

    /// Paints a filled BGR rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, rect: Rect, color: Bgr) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set_bgr(x, y, color);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bgr {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Bgr {
    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: i32,
    pub y: i32,
}

impl Point2D {
    /// Reserved coordinate meaning "no cone found".
    pub const SENTINEL: Point2D = Point2D { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// DETECTIONS
// ============================================================================

/// A cone position, or the sentinel when nothing qualified.
///
/// `valid` is false exactly when `point` is [`Point2D::SENTINEL`]; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    point: Point2D,
    valid: bool,
}

impl Detection {
    pub fn found(point: Point2D) -> Self {
        if point == Point2D::SENTINEL {
            return Self::missing();
        }
        Self { point, valid: true }
    }

    pub fn missing() -> Self {
        Self {
            point: Point2D::SENTINEL,
            valid: false,
        }
    }

    pub fn point(&self) -> Point2D {
        self.point
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn as_option(&self) -> Option<Point2D> {
        self.valid.then_some(self.point)
    }
}

impl Default for Detection {
    fn default() -> Self {
        Self::missing()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slot {
    Left,
    Right,
}

/// Cone colors, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorClass {
    Blue,
    Yellow,
}

impl ColorClass {
    pub const ALL: [ColorClass; 2] = [ColorClass::Blue, ColorClass::Yellow];

    /// Fixed class to slot binding: blue cones mark the left side, yellow the right.
    pub const fn slot(&self) -> Slot {
        match self {
            ColorClass::Blue => Slot::Left,
            ColorClass::Yellow => Slot::Right,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Blue => "BLUE",
            ColorClass::Yellow => "YELLOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotPair {
    pub left: Detection,
    pub right: Detection,
}

impl SlotPair {
    pub fn get(&self, slot: Slot) -> Detection {
        match slot {
            Slot::Left => self.left,
            Slot::Right => self.right,
        }
    }

    pub fn set(&mut self, slot: Slot, detection: Detection) {
        match slot {
            Slot::Left => self.left = detection,
            Slot::Right => self.right = detection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SteeringDecision {
    Straight,
    Left,
    Right,
    Ambiguous,
}

impl SteeringDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            SteeringDecision::Straight => "STRAIGHT",
            SteeringDecision::Left => "LEFT",
            SteeringDecision::Right => "RIGHT",
            SteeringDecision::Ambiguous => "AMBIGUOUS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rejects_wrong_buffer_size() {
        let err = Frame::new(vec![0u8; 10], 4, 4, PixelFormat::Bgr, 0.0).unwrap_err();
        assert_eq!(
            err,
            PipelineError::FrameSize {
                expected: 48,
                actual: 10
            }
        );
    }

    #[test]
    fn test_bgra_pixel_access_skips_alpha() {
        let mut frame = Frame::filled(3, 2, PixelFormat::Bgra, Bgr::new(1, 2, 3));
        frame.set_bgr(2, 1, Bgr::new(9, 8, 7));
        assert_eq!(frame.bgr_at(0, 0), Bgr::new(1, 2, 3));
        assert_eq!(frame.bgr_at(2, 1), Bgr::new(9, 8, 7));
        assert_eq!(frame.data()[(1 * 3 + 2) * 4 + 3], 255);
    }

    #[test]
    fn test_detection_sentinel_is_never_valid() {
        let d = Detection::found(Point2D::SENTINEL);
        assert!(!d.is_valid());
        assert_eq!(d.as_option(), None);

        let d = Detection::found(Point2D::new(0, 0));
        assert!(d.is_valid());
        assert_eq!(d.as_option(), Some(Point2D::new(0, 0)));
    }

    #[test]
    fn test_class_slot_binding() {
        assert_eq!(ColorClass::Blue.slot(), Slot::Left);
        assert_eq!(ColorClass::Yellow.slot(), Slot::Right);
    }
}
