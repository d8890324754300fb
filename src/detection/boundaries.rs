// src/detection/boundaries.rs
//
// Mask -> Canny edge map -> external contours -> bounding boxes.

use crate::color_segmentation::Mask;
use crate::config::EdgeConfig;
use crate::error::PipelineError;
use crate::types::Rect;

/// Finds the outer boundaries of the blobs in a binary mask.
///
/// Boxes are in mask-local coordinates. Ordering is not part of the
/// contract; `extract` fixes it before selection.
pub trait BoundaryFinder {
    fn outer_boxes(&self, mask: &Mask, edges: &EdgeConfig) -> Result<Vec<Rect>, PipelineError>;
}

/// `imgproc::canny` followed by `find_contours(RETR_EXTERNAL)`.
#[cfg(feature = "opencv")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImgprocBoundaries;

#[cfg(feature = "opencv")]
impl BoundaryFinder for ImgprocBoundaries {
    fn outer_boxes(&self, mask: &Mask, edges: &EdgeConfig) -> Result<Vec<Rect>, PipelineError> {
        use opencv::core::{Mat, Point, Vector};
        use opencv::{imgproc, prelude::*};

        if mask.width() == 0 || mask.height() == 0 {
            return Ok(Vec::new());
        }

        let src = Mat::from_slice(mask.data())?
            .reshape(1, mask.height() as i32)?
            .try_clone()?;

        let mut edge_map = Mat::default();
        imgproc::canny(
            &src,
            &mut edge_map,
            edges.low_threshold as f64,
            edges.high_threshold as f64,
            3,
            false,
        )?;

        let mut contours = Vector::<Vector<Point>>::new();
        imgproc::find_contours(
            &edge_map,
            &mut contours,
            imgproc::RETR_EXTERNAL,
            imgproc::CHAIN_APPROX_SIMPLE,
            Point::new(0, 0),
        )?;

        let mut boxes = Vec::with_capacity(contours.len());
        for contour in contours.iter() {
            let r = imgproc::bounding_rect(&contour)?;
            boxes.push(Rect::new(r.x, r.y, r.width, r.height));
        }
        Ok(boxes)
    }
}

/// Finders that skip edge detection, for tests that care about selection.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Hands back the same boxes, in the same order, for every mask.
    pub struct FixedBoxes(pub Vec<Rect>);

    impl BoundaryFinder for FixedBoxes {
        fn outer_boxes(&self, _: &Mask, _: &EdgeConfig) -> Result<Vec<Rect>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    /// One box per mask: the extent of every set pixel.
    pub struct MaskExtent;

    impl BoundaryFinder for MaskExtent {
        fn outer_boxes(&self, mask: &Mask, _: &EdgeConfig) -> Result<Vec<Rect>, PipelineError> {
            let mut extent: Option<(usize, usize, usize, usize)> = None;
            for y in 0..mask.height() {
                for x in 0..mask.width() {
                    if !mask.is_set(x, y) {
                        continue;
                    }
                    extent = Some(match extent {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    });
                }
            }
            Ok(extent
                .map(|(x0, y0, x1, y1)| {
                    vec![Rect::new(
                        x0 as i32,
                        y0 as i32,
                        (x1 - x0 + 1) as i32,
                        (y1 - y0 + 1) as i32,
                    )]
                })
                .unwrap_or_default())
        }
    }
}

#[cfg(all(test, feature = "opencv"))]
mod tests {
    use super::*;

    fn boxes(mask: &Mask) -> Vec<Rect> {
        ImgprocBoundaries
            .outer_boxes(mask, &EdgeConfig::default())
            .unwrap()
    }

    #[test]
    fn test_empty_mask_has_no_boundaries() {
        assert!(boxes(&Mask::new(640, 110)).is_empty());
    }

    #[test]
    fn test_filled_blob_outline_box() {
        let mut mask = Mask::new(640, 110);
        mask.fill_rect(10, 20, 25, 20);
        // Edge pixels sit one column/row outside on the leading sides
        assert_eq!(boxes(&mask), vec![Rect::new(9, 19, 26, 21)]);
    }

    #[test]
    fn test_blob_in_concave_gap_is_its_own_boundary() {
        let mut mask = Mask::new(200, 110);
        // L shape: vertical bar plus bottom bar
        mask.fill_rect(5, 5, 10, 60);
        mask.fill_rect(5, 55, 100, 10);
        // Separate blob inside the L's bounding box but not enclosed by it
        mask.fill_rect(50, 20, 25, 20);

        let found = boxes(&mask);
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|b| b.x >= 45 && b.right() <= 80));
    }

    #[test]
    fn test_hollow_outline_reports_outer_only() {
        let mut mask = Mask::new(100, 100);
        mask.fill_rect(10, 10, 60, 60);
        for y in 25..55 {
            for x in 25..55 {
                mask.set(x, y, 0);
            }
        }
        let found = boxes(&mask);
        assert_eq!(found.len(), 1);
        assert!(found[0].x <= 10 && found[0].right() >= 70);
    }
}
