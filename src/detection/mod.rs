// src/detection/mod.rs

mod blob_extractor;
mod boundaries;
mod cone_selector;

// Re-export public APIs
pub use blob_extractor::{extract, nearest_first, select_candidate, BlobScan};
pub use boundaries::BoundaryFinder;
pub use cone_selector::{select_cones, ConeSelection, SlotBoxes};

#[cfg(feature = "opencv")]
pub use boundaries::ImgprocBoundaries;

#[cfg(test)]
pub(crate) use boundaries::testing;
