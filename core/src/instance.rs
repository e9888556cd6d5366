//! Loaded DICOM instance wrapper

use crate::error::{PhiscrubError, Result};
use crate::pixels::PixelBuffer;
use crate::tags;
use crate::types::{ColorMode, PhotometricInterpretation};
use dicom_object::{open_file, DefaultDicomObject, InMemDicomObject};
use std::path::Path;

/// Implicit VR Little Endian transfer syntax UID
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
/// Explicit VR Little Endian transfer syntax UID
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

/// A DICOM instance loaded into memory
///
/// Wraps the file-backed dataset and gates it to the native little-endian
/// transfer syntaxes this crate can re-encode losslessly. Redaction never
/// mutates an instance in place; operations that change pixel data return a
/// new instance value.
#[derive(Debug, Clone)]
pub struct DicomInstance {
    obj: DefaultDicomObject,
}

impl DicomInstance {
    /// Wraps an already-open object, verifying its transfer syntax
    ///
    /// # Errors
    ///
    /// Returns [`PhiscrubError::Unsupported`] for encapsulated or big-endian
    /// transfer syntaxes.
    pub fn new(obj: DefaultDicomObject) -> Result<Self> {
        let ts = obj
            .meta()
            .transfer_syntax
            .trim_end_matches('\0')
            .to_string();
        if ts != IMPLICIT_VR_LITTLE_ENDIAN && ts != EXPLICIT_VR_LITTLE_ENDIAN {
            return Err(PhiscrubError::Unsupported(format!(
                "transfer syntax {} (only native little-endian data is handled)",
                ts
            )));
        }
        Ok(Self { obj })
    }

    /// Reads a DICOM file from disk
    pub fn open(path: &Path) -> Result<Self> {
        Self::new(open_file(path)?)
    }

    /// Writes the instance to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        self.obj
            .write_to_file(path)
            .map_err(|e| PhiscrubError::Dicom(format!("{}", e)))
    }

    /// The instance's dataset (metadata elements plus pixel data)
    pub fn dataset(&self) -> &InMemDicomObject {
        &self.obj
    }

    /// Parsed PhotometricInterpretation element
    ///
    /// # Errors
    ///
    /// Returns an error if the element is absent; an image without it cannot
    /// be classified for redaction.
    pub fn photometric_interpretation(&self) -> Result<PhotometricInterpretation> {
        let value = tags::get_string_value(&self.obj, tags::PHOTOMETRIC_INTERPRETATION)
            .ok_or_else(|| {
                PhiscrubError::Dicom("missing PhotometricInterpretation".to_string())
            })?;
        Ok(PhotometricInterpretation::from_str(&value))
    }

    /// Grayscale/color classification of the pixel data
    pub fn color_mode(&self) -> Result<ColorMode> {
        Ok(self.photometric_interpretation()?.color_mode())
    }

    /// Decodes the native pixel buffer
    pub fn pixels(&self) -> Result<PixelBuffer> {
        PixelBuffer::decode(&self.obj)
    }

    /// VOI window (center, width) when the instance carries a usable window
    ///
    /// Both elements must be present and the width must be at least one
    /// intensity step; anything else means no windowing is applied.
    pub fn window(&self) -> Option<(f64, f64)> {
        let center = tags::get_f64_value(&self.obj, tags::WINDOW_CENTER)?;
        let width = tags::get_f64_value(&self.obj, tags::WINDOW_WIDTH)?;
        if width >= 1.0 {
            Some((center, width))
        } else {
            None
        }
    }

    /// Replaces the pixel data element with the contents of `buffer`
    pub(crate) fn put_pixels(&mut self, buffer: &PixelBuffer) {
        buffer.store_into(&mut self.obj);
    }
}
