//! External text detector contract and detection geometry
//!
//! The detector is an external collaborator: it receives a raster and a
//! deny-list of literal strings, and returns labeled text bounding boxes in
//! the raster's coordinate space. This module pins down that contract and
//! maps raw detections back into instance pixel coordinates.

#[cfg(feature = "ocr")]
pub mod ocr;

use crate::error::Result;
use crate::phi::PhiDenyList;
use crate::raster::Raster;
use crate::types::{Detection, Rectangle};

/// A text-entity detector primed for one image
pub trait TextDetector {
    /// Detects text entities in `raster`
    ///
    /// The returned order is preserved all the way to mask application, so
    /// it determines which detection wins when regions overlap.
    fn detect(&self, raster: &Raster) -> Result<Vec<Detection>>;
}

/// Capability for building detectors primed with a per-image deny-list
///
/// A fresh detector is requested for every image because the deny-list is
/// derived from that image's own metadata.
pub trait DetectorFactory {
    type Detector: TextDetector;

    fn make_detector(&self, deny_list: &PhiDenyList) -> Result<Self::Detector>;
}

/// Maps detections from padded-raster coordinates to instance coordinates
///
/// The padding border only shifts the origin, so `top` and `left` move back
/// by the padding width (clamped at zero) while `width` and `height` pass
/// through unchanged. Input order is preserved.
pub fn reconcile_boxes(detections: &[Detection], padding_width: u32) -> Vec<Rectangle> {
    detections
        .iter()
        .map(|d| Rectangle {
            top: d.top.saturating_sub(padding_width),
            left: d.left.saturating_sub(padding_width),
            width: d.width,
            height: d.height,
        })
        .collect()
}
