// src/color_segmentation.rs
//
// HSV thresholding of the ROI into a binary mask, one mask per cone color.
//
// HSV uses the OpenCV 8-bit scale so calibration tables taken from
// OpenCV tooling can be pasted into config.yaml unchanged:
//   H: 0-180 (degrees / 2), S: 0-255, V: 0-255

use crate::config::HsvBounds;
use crate::region::FrameRegion;
use crate::types::Bgr;
use tracing::debug;

// ============================================================================
// MASK
// ============================================================================

/// Single-channel image, 0 = background, 255 = set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    pub const SET: u8 = 255;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.get(x, y) != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    /// Sets every pixel of a rectangle (x, y, w, h), clipped to the mask.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for yy in y..(y + h).min(self.height) {
            for xx in x..(x + w).min(self.width) {
                self.set(xx, yy, Self::SET);
            }
        }
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

// ============================================================================
// HSV CONVERSION
// ============================================================================

/// BGR to 8-bit HSV, matching OpenCV's `COLOR_BGR2HSV`.
#[inline]
pub fn bgr_to_hsv(px: Bgr) -> [u8; 3] {
    let b = px.b as i32;
    let g = px.g as i32;
    let r = px.r as i32;

    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        round_half_up(255.0 * diff as f32 / v as f32)
    };

    let h = if diff == 0 {
        0
    } else {
        // Red wins ties, then green
        let sector = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let h = round_half_up(sector as f32 * 30.0 / diff as f32);
        if h < 0 {
            h + 180
        } else {
            h
        }
    };

    [h as u8, s.clamp(0, 255) as u8, v as u8]
}

#[inline]
fn round_half_up(x: f32) -> i32 {
    (x + 0.5).floor() as i32
}

// ============================================================================
// SEGMENTATION
// ============================================================================

/// Mask of ROI pixels whose HSV value lies inside `bounds` on every channel.
pub fn segment(region: &FrameRegion<'_>, bounds: &HsvBounds) -> Mask {
    let mut mask = Mask::new(region.width(), region.height());

    for y in 0..region.height() {
        for x in 0..region.width() {
            if bounds.contains(bgr_to_hsv(region.bgr_at(x, y))) {
                mask.set(x, y, Mask::SET);
            }
        }
    }

    debug!(
        "Segmented {}x{} ROI: {} px in {:?}..{:?}",
        mask.width(),
        mask.height(),
        mask.count_set(),
        bounds.lower,
        bounds.upper
    );

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorConfig;
    use crate::types::{Frame, PixelFormat, Rect};

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(bgr_to_hsv(Bgr::new(255, 0, 0)), [120, 255, 255]); // blue
        assert_eq!(bgr_to_hsv(Bgr::new(0, 255, 0)), [60, 255, 255]); // green
        assert_eq!(bgr_to_hsv(Bgr::new(0, 0, 255)), [0, 255, 255]); // red
        assert_eq!(bgr_to_hsv(Bgr::new(0, 255, 255)), [30, 255, 255]); // yellow
    }

    #[test]
    fn test_hsv_greys_have_no_hue() {
        assert_eq!(bgr_to_hsv(Bgr::new(0, 0, 0)), [0, 0, 0]);
        assert_eq!(bgr_to_hsv(Bgr::new(128, 128, 128)), [0, 0, 128]);
    }

    #[test]
    fn test_hsv_magenta_wraps() {
        // R max, G < B -> negative sector wraps to 150
        assert_eq!(bgr_to_hsv(Bgr::new(255, 0, 255)), [150, 255, 255]);
    }

    #[test]
    fn test_segment_isolates_each_color() {
        let mut frame = Frame::filled(20, 10, PixelFormat::Bgra, Bgr::new(128, 128, 128));
        frame.fill_rect(Rect::new(2, 2, 3, 3), Bgr::new(255, 0, 0));
        frame.fill_rect(Rect::new(10, 4, 4, 2), Bgr::new(0, 255, 255));

        let region = FrameRegion::new(&frame, Rect::new(0, 0, 20, 10)).unwrap();
        let colors = ColorConfig::default();

        let blue = segment(&region, &colors.blue);
        assert_eq!(blue.count_set(), 9);
        assert!(blue.is_set(2, 2));
        assert!(!blue.is_set(10, 4));

        let yellow = segment(&region, &colors.yellow);
        assert_eq!(yellow.count_set(), 8);
        assert!(yellow.is_set(13, 5));
    }

    #[test]
    fn test_segment_uses_region_coordinates() {
        let mut frame = Frame::filled(10, 10, PixelFormat::Bgr, Bgr::new(0, 0, 0));
        frame.fill_rect(Rect::new(4, 7, 1, 1), Bgr::new(255, 0, 0));
        let region = FrameRegion::new(&frame, Rect::new(0, 5, 10, 4)).unwrap();
        let mask = segment(&region, &ColorConfig::default().blue);
        assert_eq!(mask.count_set(), 1);
        assert!(mask.is_set(4, 2));
    }
}
