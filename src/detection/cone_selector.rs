// src/detection/cone_selector.rs

use super::blob_extractor::{extract, BlobScan};
use super::boundaries::BoundaryFinder;
use crate::color_segmentation::segment;
use crate::config::DetectionConfig;
use crate::error::PipelineError;
use crate::region::FrameRegion;
use crate::types::{ColorClass, Rect, Slot, SlotPair};
use serde::Serialize;
use tracing::debug;

/// Area-gated boxes per slot, in full-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotBoxes {
    pub left: Option<Rect>,
    pub right: Option<Rect>,
}

impl SlotBoxes {
    pub fn iter(&self) -> impl Iterator<Item = Rect> + '_ {
        self.left.iter().chain(self.right.iter()).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConeSelection {
    pub slots: SlotPair,
    pub boxes: SlotBoxes,
}

/// Runs segmentation and blob extraction once per color class on the ROI.
///
/// Each class writes only its own slot; a missing cone on one side never
/// borrows the other side's detection.
pub fn select_cones<B: BoundaryFinder + ?Sized>(
    finder: &B,
    region: &FrameRegion<'_>,
    config: &DetectionConfig,
) -> Result<ConeSelection, PipelineError> {
    select_cones_in_order(finder, region, config, ColorClass::ALL)
}

pub(crate) fn select_cones_in_order<B: BoundaryFinder + ?Sized>(
    finder: &B,
    region: &FrameRegion<'_>,
    config: &DetectionConfig,
    order: [ColorClass; 2],
) -> Result<ConeSelection, PipelineError> {
    let mut slots = SlotPair::default();
    let mut boxes = SlotBoxes::default();

    for class in order {
        let mask = segment(region, &config.colors.bounds(class));
        let scan = extract(finder, &mask, region.rect(), &config.edges, &config.blob)?;
        assign(&mut slots, &mut boxes, class, scan);

        debug!(
            "{} cone -> {:?} slot: {:?}",
            class.as_str(),
            class.slot(),
            scan.detection.as_option()
        );
    }

    Ok(ConeSelection { slots, boxes })
}

fn assign(slots: &mut SlotPair, boxes: &mut SlotBoxes, class: ColorClass, scan: BlobScan) {
    let slot = class.slot();
    slots.set(slot, scan.detection);
    match slot {
        Slot::Left => boxes.left = scan.qualifying_box,
        Slot::Right => boxes.right = scan.qualifying_box,
    }
}
