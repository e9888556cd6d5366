//! Native pixel buffer decoding and encoding
//!
//! Pixel data is kept in its stored bit depth so that redacted instances can
//! be written back losslessly. Only native (non-encapsulated) little-endian
//! layouts are handled; everything else is reported as unsupported rather
//! than silently approximated.

use crate::error::{PhiscrubError, Result};
use crate::tags;
use crate::types::{MaskColor, Rectangle};
use dicom_core::value::Value;
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_object::InMemDicomObject;

/// Decoded native pixel array of a DICOM instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelBuffer {
    /// Single channel, 8 bits allocated
    Mono8 {
        rows: u32,
        cols: u32,
        data: Vec<u8>,
    },
    /// Single channel, 16 bits allocated
    Mono16 {
        rows: u32,
        cols: u32,
        data: Vec<u16>,
    },
    /// Three interleaved channels, 8 bits allocated
    Rgb8 {
        rows: u32,
        cols: u32,
        data: Vec<u8>,
    },
}

impl PixelBuffer {
    pub fn rows(&self) -> u32 {
        match self {
            PixelBuffer::Mono8 { rows, .. }
            | PixelBuffer::Mono16 { rows, .. }
            | PixelBuffer::Rgb8 { rows, .. } => *rows,
        }
    }

    pub fn cols(&self) -> u32 {
        match self {
            PixelBuffer::Mono8 { cols, .. }
            | PixelBuffer::Mono16 { cols, .. }
            | PixelBuffer::Rgb8 { cols, .. } => *cols,
        }
    }

    /// Decodes the PixelData element of `dcm` into a native buffer
    ///
    /// # Errors
    ///
    /// Returns an error if a mandatory image-pixel element is missing, the
    /// pixel data is shorter than the declared shape, or the layout is one
    /// this crate does not handle (encapsulated data, signed representation,
    /// planar color, multi-frame, bit depths other than 8/16).
    pub fn decode(dcm: &InMemDicomObject) -> Result<PixelBuffer> {
        let rows = tags::get_u16_value(dcm, tags::ROWS)
            .ok_or_else(|| PhiscrubError::Dicom("missing Rows".to_string()))? as u32;
        let cols = tags::get_u16_value(dcm, tags::COLUMNS)
            .ok_or_else(|| PhiscrubError::Dicom("missing Columns".to_string()))? as u32;
        let bits_allocated = tags::get_u16_value(dcm, tags::BITS_ALLOCATED)
            .ok_or_else(|| PhiscrubError::Dicom("missing BitsAllocated".to_string()))?;
        let samples = tags::get_u16_value(dcm, tags::SAMPLES_PER_PIXEL).unwrap_or(1);

        if let Some(frames) = tags::get_int_value(dcm, tags::NUMBER_OF_FRAMES) {
            if frames > 1 {
                return Err(PhiscrubError::Unsupported(format!(
                    "multi-frame pixel data ({} frames)",
                    frames
                )));
            }
        }
        if tags::get_u16_value(dcm, tags::PIXEL_REPRESENTATION).unwrap_or(0) != 0 {
            return Err(PhiscrubError::Unsupported(
                "signed pixel representation".to_string(),
            ));
        }
        if samples == 3 && tags::get_u16_value(dcm, tags::PLANAR_CONFIGURATION).unwrap_or(0) != 0 {
            return Err(PhiscrubError::Unsupported(
                "planar color pixel data".to_string(),
            ));
        }

        let elem = dcm
            .element(tags::PIXEL_DATA)
            .map_err(|_| PhiscrubError::Dicom("missing PixelData".to_string()))?;
        let primitive = match elem.value() {
            Value::Primitive(p) => p,
            _ => {
                return Err(PhiscrubError::Unsupported(
                    "encapsulated pixel data".to_string(),
                ))
            }
        };

        if !matches!((bits_allocated, samples), (8, 1) | (16, 1) | (8, 3)) {
            return Err(PhiscrubError::Unsupported(format!(
                "pixel layout with {} bits allocated and {} samples per pixel",
                bits_allocated, samples
            )));
        }

        let bytes = primitive.to_bytes();
        let expected =
            rows as usize * cols as usize * samples as usize * (bits_allocated / 8) as usize;
        if bytes.len() < expected {
            return Err(PhiscrubError::InvalidValue(format!(
                "pixel data has {} bytes, expected {}",
                bytes.len(),
                expected
            )));
        }
        let bytes = &bytes[..expected];

        match (bits_allocated, samples) {
            (8, 1) => Ok(PixelBuffer::Mono8 {
                rows,
                cols,
                data: bytes.to_vec(),
            }),
            (16, 1) => Ok(PixelBuffer::Mono16 {
                rows,
                cols,
                data: bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect(),
            }),
            _ => Ok(PixelBuffer::Rgb8 {
                rows,
                cols,
                data: bytes.to_vec(),
            }),
        }
    }

    /// Overwrites the span `[top, top+height) x [left, left+width)` with `color`
    ///
    /// Spans reaching past the buffer are clamped to its bounds. The mask
    /// color must match the buffer's layout.
    pub fn fill_rect(&mut self, rect: &Rectangle, color: MaskColor) -> Result<()> {
        match (self, color) {
            (PixelBuffer::Mono8 { rows, cols, data }, MaskColor::Gray(value)) => {
                let value = value.min(u8::MAX as u16) as u8;
                for row in rect.top..(rect.top + rect.height).min(*rows) {
                    for col in rect.left..(rect.left + rect.width).min(*cols) {
                        data[(row * *cols + col) as usize] = value;
                    }
                }
                Ok(())
            }
            (PixelBuffer::Mono16 { rows, cols, data }, MaskColor::Gray(value)) => {
                for row in rect.top..(rect.top + rect.height).min(*rows) {
                    for col in rect.left..(rect.left + rect.width).min(*cols) {
                        data[(row * *cols + col) as usize] = value;
                    }
                }
                Ok(())
            }
            (PixelBuffer::Rgb8 { rows, cols, data }, MaskColor::Rgb(rgb)) => {
                for row in rect.top..(rect.top + rect.height).min(*rows) {
                    for col in rect.left..(rect.left + rect.width).min(*cols) {
                        let offset = ((row * *cols + col) * 3) as usize;
                        data[offset..offset + 3].copy_from_slice(&rgb);
                    }
                }
                Ok(())
            }
            _ => Err(PhiscrubError::Unsupported(
                "mask color does not match the pixel layout".to_string(),
            )),
        }
    }

    /// Re-encodes the buffer into a PixelData element on `dcm`
    pub fn store_into(&self, dcm: &mut InMemDicomObject) {
        let (vr, mut bytes) = match self {
            PixelBuffer::Mono8 { data, .. } => (VR::OB, data.clone()),
            PixelBuffer::Rgb8 { data, .. } => (VR::OB, data.clone()),
            PixelBuffer::Mono16 { data, .. } => (
                VR::OW,
                data.iter().flat_map(|v| v.to_le_bytes()).collect(),
            ),
        };
        // value lengths must stay even on the wire
        if bytes.len() % 2 == 1 {
            bytes.push(0);
        }
        dcm.put(DataElement::new(
            tags::PIXEL_DATA,
            vr,
            PrimitiveValue::from(bytes),
        ));
    }
}
