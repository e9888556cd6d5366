//! Destructive overwrite of detected text regions
//!
//! Applies reconciled rectangles to a copy of the instance's pixel buffer
//! and commits the buffer back into the copy. The caller's instance is
//! never mutated.

use crate::error::Result;
use crate::instance::DicomInstance;
use crate::raster::{self, color};
use crate::types::{BoxColorSetting, ColorMode, MaskColor, Rectangle};
use log::debug;
use tempfile::TempDir;

/// Redacts `boxes` on a copy of `instance` and returns the copy
///
/// Rectangles are applied in input order, so overlapping regions resolve
/// last-write-wins; preserving the detector's ordering keeps the output
/// reproducible. The redacted pixel buffer is committed only after every
/// rectangle has been applied.
pub fn apply_redaction(
    instance: &DicomInstance,
    boxes: &[Rectangle],
    setting: BoxColorSetting,
) -> Result<DicomInstance> {
    let mut pixels = instance.pixels()?;
    let mask = mask_color(instance, setting)?;
    debug!("applying {} redaction box(es) with {:?}", boxes.len(), mask);
    for rect in boxes {
        pixels.fill_rect(rect, mask)?;
    }
    let mut redacted = instance.clone();
    redacted.put_pixels(&pixels);
    Ok(redacted)
}

/// Selects the mask color for an instance
///
/// Grayscale instances use the exact value histogram of their native pixel
/// array. Color instances round-trip through a scoped temporary directory:
/// the instance is serialized, re-opened and re-rasterized, because
/// dominant-color sampling is implemented against the raster
/// representation. The temporary directory is released when this function
/// returns, on the error paths included.
pub fn mask_color(instance: &DicomInstance, setting: BoxColorSetting) -> Result<MaskColor> {
    match instance.color_mode()? {
        ColorMode::Grayscale => color::most_common_pixel_value(&instance.pixels()?, setting),
        ColorMode::Color => {
            let tmp = TempDir::new()?;
            let path = tmp.path().join("instance.dcm");
            instance.save(&path)?;
            let reloaded = DicomInstance::open(&path)?;
            let raster = raster::normalize(&reloaded)?;
            Ok(color::background_color(&raster, setting.invert()))
        }
    }
}
