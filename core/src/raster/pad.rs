//! Uniform background padding around a raster
//!
//! Text detectors lose recall near image edges; a border of background-
//! matching pixels gives edge-adjacent text room to be detected. The
//! transform is invertible by a fixed offset, handled when detections are
//! reconciled back to instance coordinates.

use super::color::{dominant_rgb, gray_mode};
use super::Raster;
use crate::error::{PhiscrubError, Result};
use image::{imageops, GrayImage, Luma, Rgb, RgbImage};

/// Sanity bound: padding this wide is almost certainly a misconfiguration
const MAX_PADDING: u32 = 100;

/// Validates a padding width without touching any image data
pub fn validate_padding(padding_width: u32) -> Result<()> {
    if padding_width == 0 {
        return Err(PhiscrubError::Config(
            "padding width must be positive".to_string(),
        ));
    }
    if padding_width >= MAX_PADDING {
        return Err(PhiscrubError::Config(format!(
            "padding width must be under {} pixels, got {}",
            MAX_PADDING, padding_width
        )));
    }
    Ok(())
}

/// Adds a uniform border of background color on all four sides
///
/// # Errors
///
/// Rejects widths of zero or `>= 100` as configuration errors.
pub fn add_padding(raster: &Raster, padding_width: u32) -> Result<Raster> {
    validate_padding(padding_width)?;

    let (width, height) = raster.dimensions();
    let new_width = width + 2 * padding_width;
    let new_height = height + 2 * padding_width;
    let offset = padding_width as i64;

    match raster {
        Raster::Grayscale(img) => {
            let border = gray_mode(img);
            let mut padded = GrayImage::from_pixel(new_width, new_height, Luma([border]));
            imageops::replace(&mut padded, img, offset, offset);
            Ok(Raster::Grayscale(padded))
        }
        Raster::Rgb(img) => {
            let border = dominant_rgb(img);
            let mut padded = RgbImage::from_pixel(new_width, new_height, Rgb(border));
            imageops::replace(&mut padded, img, offset, offset);
            Ok(Raster::Rgb(padded))
        }
    }
}
