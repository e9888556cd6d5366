//! Background and mask color selection

use super::Raster;
use crate::error::{PhiscrubError, Result};
use crate::pixels::PixelBuffer;
use crate::types::{BoxColorSetting, MaskColor};
use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Most frequent intensity of a grayscale raster
///
/// Ties break toward the smallest value: the histogram is scanned in
/// intensity order and only a strictly greater count wins.
pub(crate) fn gray_mode(img: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in img.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }
    let mut best = 0usize;
    let mut count = 0u64;
    for (value, &c) in histogram.iter().enumerate() {
        if c > count {
            best = value;
            count = c;
        }
    }
    best as u8
}

/// Dominant color of an RGB raster
///
/// Shrinks the image to a single pixel with a non-interpolating filter,
/// which approximates the dominant color without a full histogram.
pub(crate) fn dominant_rgb(img: &RgbImage) -> [u8; 3] {
    let tiny = imageops::resize(img, 1, 1, FilterType::Nearest);
    tiny.get_pixel(0, 0).0
}

/// Selects the background color of a raster
///
/// With `invert` set, the raster is color-inverted before sampling, which
/// yields a color that contrasts with the background instead.
pub fn background_color(raster: &Raster, invert: bool) -> MaskColor {
    match raster {
        Raster::Grayscale(img) => {
            let img = if invert {
                let mut inverted = img.clone();
                imageops::invert(&mut inverted);
                Cow::Owned(inverted)
            } else {
                Cow::Borrowed(img)
            };
            MaskColor::Gray(gray_mode(&img) as u16)
        }
        Raster::Rgb(img) => {
            let img = if invert {
                let mut inverted = img.clone();
                imageops::invert(&mut inverted);
                Cow::Owned(inverted)
            } else {
                Cow::Borrowed(img)
            };
            MaskColor::Rgb(dominant_rgb(&img))
        }
    }
}

/// Most (or least) common pixel value of a native grayscale array
///
/// Works on the instance's stored values, so the returned mask color can be
/// written back without any raster round-trip. `Contrast` returns
/// `max − mode`, a value maximally distinct from the background;
/// `Background` returns the mode itself.
///
/// # Errors
///
/// Returns [`PhiscrubError::Unsupported`] for color buffers; their mask
/// color must be sampled from the raster instead.
pub fn most_common_pixel_value(
    pixels: &PixelBuffer,
    setting: BoxColorSetting,
) -> Result<MaskColor> {
    let values: Box<dyn Iterator<Item = u16> + '_> = match pixels {
        PixelBuffer::Mono8 { data, .. } => Box::new(data.iter().map(|&v| v as u16)),
        PixelBuffer::Mono16 { data, .. } => Box::new(data.iter().copied()),
        PixelBuffer::Rgb8 { .. } => {
            return Err(PhiscrubError::Unsupported(
                "most common pixel value retrieval is only supported for grayscale images"
                    .to_string(),
            ))
        }
    };

    let mut counts: BTreeMap<u16, u64> = BTreeMap::new();
    let mut max_value = 0u16;
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
        max_value = max_value.max(value);
    }
    // value-ordered iteration plus strict comparison keeps the smallest
    // value on count ties
    let mut mode = 0u16;
    let mut best = 0u64;
    for (&value, &count) in &counts {
        if count > best {
            mode = value;
            best = count;
        }
    }

    Ok(match setting {
        BoxColorSetting::Contrast => MaskColor::Gray(max_value - mode),
        BoxColorSetting::Background => MaskColor::Gray(mode),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn gray_raster(width: u32, height: u32, pixels: Vec<u8>) -> Raster {
        Raster::Grayscale(GrayImage::from_raw(width, height, pixels).unwrap())
    }

    #[test]
    fn test_gray_background_is_mode() {
        let raster = gray_raster(2, 2, vec![7, 7, 7, 200]);
        assert_eq!(background_color(&raster, false), MaskColor::Gray(7));
    }

    #[test]
    fn test_gray_mode_tie_breaks_to_smallest() {
        let raster = gray_raster(2, 2, vec![9, 3, 3, 9]);
        assert_eq!(background_color(&raster, false), MaskColor::Gray(3));
    }

    #[test]
    fn test_gray_background_inverted() {
        let raster = gray_raster(2, 2, vec![7, 7, 7, 200]);
        assert_eq!(background_color(&raster, true), MaskColor::Gray(248));
    }

    #[test]
    fn test_background_color_is_idempotent() {
        let raster = gray_raster(3, 1, vec![4, 4, 250]);
        let first = background_color(&raster, true);
        let second = background_color(&raster, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rgb_dominant_color() {
        let img = RgbImage::from_pixel(8, 8, Rgb([12, 34, 56]));
        let raster = Raster::Rgb(img);
        assert_eq!(
            background_color(&raster, false),
            MaskColor::Rgb([12, 34, 56])
        );
        assert_eq!(
            background_color(&raster, true),
            MaskColor::Rgb([243, 221, 199])
        );
    }

    #[test]
    fn test_most_common_pixel_value_contrast() {
        let pixels = PixelBuffer::Mono16 {
            rows: 2,
            cols: 2,
            data: vec![0, 0, 0, 4095],
        };
        assert_eq!(
            most_common_pixel_value(&pixels, BoxColorSetting::Contrast).unwrap(),
            MaskColor::Gray(4095)
        );
        assert_eq!(
            most_common_pixel_value(&pixels, BoxColorSetting::Background).unwrap(),
            MaskColor::Gray(0)
        );
    }

    #[test]
    fn test_most_common_pixel_value_tie_break() {
        let pixels = PixelBuffer::Mono8 {
            rows: 1,
            cols: 4,
            data: vec![5, 5, 9, 9],
        };
        // two values occur twice; the smaller one is the mode
        assert_eq!(
            most_common_pixel_value(&pixels, BoxColorSetting::Background).unwrap(),
            MaskColor::Gray(5)
        );
    }

    #[test]
    fn test_most_common_pixel_value_rejects_color() {
        let pixels = PixelBuffer::Rgb8 {
            rows: 1,
            cols: 1,
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            most_common_pixel_value(&pixels, BoxColorSetting::Contrast),
            Err(PhiscrubError::Unsupported(_))
        ));
    }

    #[test]
    fn test_gray_mode_on_uniform_image() {
        let img = GrayImage::from_pixel(4, 4, Luma([128]));
        assert_eq!(gray_mode(&img), 128);
    }
}
