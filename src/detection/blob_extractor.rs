// src/detection/blob_extractor.rs
//
// Mask -> outer boxes -> one representative cone point.

use super::boundaries::BoundaryFinder;
use crate::color_segmentation::Mask;
use crate::config::{BlobConfig, EdgeConfig};
use crate::error::PipelineError;
use crate::types::{Detection, Point2D, Rect};
use serde::Serialize;
use tracing::debug;

/// Outcome of scanning one color mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlobScan {
    pub detection: Detection,
    /// Box that passed the area gate, in full-frame coordinates. Overlay only.
    pub qualifying_box: Option<Rect>,
}

impl BlobScan {
    pub fn empty() -> Self {
        Self {
            detection: Detection::missing(),
            qualifying_box: None,
        }
    }
}

/// Picks the cone point from boxes given in mask-local coordinates.
///
/// Walks the boxes in order while remembering the lowest one on screen
/// (largest y, earlier box wins ties). At the first box whose area exceeds
/// `min_area` the point `(nearest.x + nearest.h, nearest.y + nearest.h)` is
/// emitted, shifted by the ROI origin into frame coordinates.
pub fn select_candidate(boxes: &[Rect], roi: Rect, min_area: i64) -> BlobScan {
    let mut nearest: Option<Rect> = None;

    for bbox in boxes {
        let nearest_box = match nearest {
            Some(n) if bbox.y <= n.y => n,
            _ => *bbox,
        };
        nearest = Some(nearest_box);

        if bbox.area() > min_area {
            let point = Point2D::new(
                roi.x + nearest_box.x + nearest_box.height,
                roi.y + nearest_box.y + nearest_box.height,
            );
            return BlobScan {
                detection: Detection::found(point),
                qualifying_box: Some(bbox.translate(roi.x, roi.y)),
            };
        }
    }

    BlobScan::empty()
}

/// Orders boxes bottom-up, the order OpenCV's contour scan reports them in.
///
/// Lower rows come first, ties broken right to left. Pinned here because the
/// contour order differs between OpenCV releases.
pub fn nearest_first(boxes: &mut [Rect]) {
    boxes.sort_by(|a, b| b.y.cmp(&a.y).then(b.x.cmp(&a.x)));
}

/// Full extraction for one class mask covering `roi`.
pub fn extract<B: BoundaryFinder + ?Sized>(
    finder: &B,
    mask: &Mask,
    roi: Rect,
    edges: &EdgeConfig,
    blob: &BlobConfig,
) -> Result<BlobScan, PipelineError> {
    let mut boxes = finder.outer_boxes(mask, edges)?;
    nearest_first(&mut boxes);
    let scan = select_candidate(&boxes, roi, blob.min_area);

    debug!(
        "Blob scan: {} boundaries, area gate {} -> {:?}",
        boxes.len(),
        blob.min_area,
        scan.detection.as_option()
    );

    Ok(scan)
}
