//! Detector-ready rasters derived from DICOM pixel data
//!
//! A raster is the normalized 8-bit image handed to the external text
//! detector. Grayscale rasters are contrast-stretched to the full [0, 255]
//! range; color rasters keep their channel values as stored.

pub mod color;
pub mod pad;

use crate::error::{PhiscrubError, Result};
use crate::instance::DicomInstance;
use crate::pixels::PixelBuffer;
use crate::types::ColorMode;
use image::{GrayImage, RgbImage};

/// Normalized 8-bit image derived from a DICOM pixel buffer
#[derive(Debug, Clone)]
pub enum Raster {
    Grayscale(GrayImage),
    Rgb(RgbImage),
}

impl Raster {
    /// Raster size as `(width, height)`, i.e. `(columns, rows)`
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Raster::Grayscale(img) => img.dimensions(),
            Raster::Rgb(img) => img.dimensions(),
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        match self {
            Raster::Grayscale(_) => ColorMode::Grayscale,
            Raster::Rgb(_) => ColorMode::Color,
        }
    }
}

/// Converts an instance's pixel data into its detection raster
///
/// Grayscale data is windowed (when the instance carries a VOI window),
/// clipped at zero, divided by its maximum and scaled to 8 bits, which
/// guarantees a full-range contrast stretch. Color data is passed through
/// unscaled.
///
/// # Errors
///
/// Propagates pixel decoding errors, and rejects instances whose
/// photometric interpretation disagrees with their sample count.
pub fn normalize(instance: &DicomInstance) -> Result<Raster> {
    let pixels = instance.pixels()?;
    match instance.color_mode()? {
        ColorMode::Grayscale => {
            let (rows, cols) = (pixels.rows(), pixels.cols());
            let mut values: Vec<f32> = match &pixels {
                PixelBuffer::Mono8 { data, .. } => data.iter().map(|&v| v as f32).collect(),
                PixelBuffer::Mono16 { data, .. } => data.iter().map(|&v| v as f32).collect(),
                PixelBuffer::Rgb8 { .. } => {
                    return Err(PhiscrubError::InvalidValue(
                        "single-channel photometric interpretation with three-sample pixel data"
                            .to_string(),
                    ))
                }
            };
            if let Some((center, width)) = instance.window() {
                apply_linear_window(&mut values, center as f32, width as f32);
            }
            let scaled = stretch_to_u8(&values);
            GrayImage::from_raw(cols, rows, scaled)
                .map(Raster::Grayscale)
                .ok_or_else(|| {
                    PhiscrubError::InvalidValue(
                        "pixel data does not fill its declared shape".to_string(),
                    )
                })
        }
        ColorMode::Color => match pixels {
            PixelBuffer::Rgb8 { rows, cols, data } => RgbImage::from_raw(cols, rows, data)
                .map(Raster::Rgb)
                .ok_or_else(|| {
                    PhiscrubError::InvalidValue(
                        "pixel data does not fill its declared shape".to_string(),
                    )
                }),
            _ => Err(PhiscrubError::InvalidValue(
                "RGB photometric interpretation with single-channel pixel data".to_string(),
            )),
        },
    }
}

/// Linear VOI lookup (DICOM PS3.3 C.11.2.1.2) with output range [0, 255]
fn apply_linear_window(values: &mut [f32], center: f32, width: f32) {
    let lower = center - 0.5 - (width - 1.0) / 2.0;
    let upper = center - 0.5 + (width - 1.0) / 2.0;
    if width <= 1.0 {
        // degenerate window: threshold at the center
        for v in values.iter_mut() {
            *v = if *v <= lower { 0.0 } else { 255.0 };
        }
        return;
    }
    for v in values.iter_mut() {
        *v = if *v <= lower {
            0.0
        } else if *v > upper {
            255.0
        } else {
            ((*v - (center - 0.5)) / (width - 1.0) + 0.5) * 255.0
        };
    }
}

/// Clips negatives, divides by the array maximum and truncates to u8
fn stretch_to_u8(values: &[f32]) -> Vec<u8> {
    let max = values.iter().fold(f32::MIN, |acc, &v| acc.max(v));
    if max <= 0.0 {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&v| (v.max(0.0) / max * 255.0) as u8)
        .collect()
}
