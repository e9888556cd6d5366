use crate::error::PhiscrubError;
use std::fmt;
use std::str::FromStr;

/// DICOM Photometric Interpretation values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotometricInterpretation {
    Unknown,
    Monochrome1,
    Monochrome2,
    PaletteColor,
    Rgb,
    Hsv,
    Argb,
    Cmyk,
    YbrFull,
    YbrFull422,
    YbrPartial422,
    YbrPartial420,
    YbrIct,
    YbrRct,
}

impl PhotometricInterpretation {
    /// Parses photometric interpretation from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MONOCHROME1" => PhotometricInterpretation::Monochrome1,
            "MONOCHROME2" => PhotometricInterpretation::Monochrome2,
            "PALETTE COLOR" => PhotometricInterpretation::PaletteColor,
            "RGB" => PhotometricInterpretation::Rgb,
            "HSV" => PhotometricInterpretation::Hsv,
            "ARGB" => PhotometricInterpretation::Argb,
            "CMYK" => PhotometricInterpretation::Cmyk,
            "YBR_FULL" => PhotometricInterpretation::YbrFull,
            "YBR_FULL_422" => PhotometricInterpretation::YbrFull422,
            "YBR_PARTIAL_422" => PhotometricInterpretation::YbrPartial422,
            "YBR_PARTIAL_420" => PhotometricInterpretation::YbrPartial420,
            "YBR_ICT" => PhotometricInterpretation::YbrIct,
            "YBR_RCT" => PhotometricInterpretation::YbrRct,
            _ => PhotometricInterpretation::Unknown,
        }
    }

    /// Returns the pixel color mode for redaction purposes
    ///
    /// Exactly `RGB` is treated as color; every other interpretation is
    /// handled as grayscale. This is a deliberate simplification: palette
    /// and YBR images get grayscale treatment rather than a decode error.
    pub fn color_mode(&self) -> ColorMode {
        match self {
            PhotometricInterpretation::Rgb => ColorMode::Color,
            _ => ColorMode::Grayscale,
        }
    }
}

impl fmt::Display for PhotometricInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhotometricInterpretation::Unknown => "UNKNOWN",
            PhotometricInterpretation::Monochrome1 => "MONOCHROME1",
            PhotometricInterpretation::Monochrome2 => "MONOCHROME2",
            PhotometricInterpretation::PaletteColor => "PALETTE COLOR",
            PhotometricInterpretation::Rgb => "RGB",
            PhotometricInterpretation::Hsv => "HSV",
            PhotometricInterpretation::Argb => "ARGB",
            PhotometricInterpretation::Cmyk => "CMYK",
            PhotometricInterpretation::YbrFull => "YBR_FULL",
            PhotometricInterpretation::YbrFull422 => "YBR_FULL_422",
            PhotometricInterpretation::YbrPartial422 => "YBR_PARTIAL_422",
            PhotometricInterpretation::YbrPartial420 => "YBR_PARTIAL_420",
            PhotometricInterpretation::YbrIct => "YBR_ICT",
            PhotometricInterpretation::YbrRct => "YBR_RCT",
        };
        write!(f, "{}", name)
    }
}

/// Pixel layout of a DICOM instance or raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Single-channel intensity data
    Grayscale,
    /// Three-channel interleaved RGB data
    Color,
}

/// A redaction mask color
///
/// Grayscale intensities are carried as `u16` so that 16-bit instance pixel
/// values survive unclamped; 8-bit buffers narrow at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskColor {
    Gray(u16),
    Rgb([u8; 3]),
}

/// How the redaction mask color is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxColorSetting {
    /// Masks stand out relative to the background
    #[default]
    Contrast,
    /// Masks are the same color as the background
    Background,
}

impl BoxColorSetting {
    /// Whether raster-based color sampling should invert first
    pub fn invert(&self) -> bool {
        matches!(self, BoxColorSetting::Contrast)
    }
}

impl FromStr for BoxColorSetting {
    type Err = PhiscrubError;

    /// Parses the setting case-insensitively, accepting the documented
    /// synonyms: contrast/invert/inverted/inverse and background/bg.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contrast" | "invert" | "inverted" | "inverse" => Ok(BoxColorSetting::Contrast),
            "background" | "bg" => Ok(BoxColorSetting::Background),
            other => Err(PhiscrubError::Config(format!(
                "box color setting must be 'contrast' or 'background', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BoxColorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxColorSetting::Contrast => write!(f, "contrast"),
            BoxColorSetting::Background => write!(f, "background"),
        }
    }
}
