use thiserror::Error;

/// Result type for phiscrub operations
pub type Result<T> = std::result::Result<T, PhiscrubError>;

/// Error types for phiscrub operations
#[derive(Error, Debug)]
pub enum PhiscrubError {
    /// Invalid configuration (padding width, box color setting, destination collision)
    #[error("configuration error: {0}")]
    Config(String),

    /// Input path missing or of the wrong kind for the requested mode
    #[error("input not found: {0}")]
    InputNotFound(String),

    /// Operation invoked on data it does not support
    #[error("unsupported data: {0}")]
    Unsupported(String),

    /// DICOM reading or writing error
    #[error("DICOM error: {0}")]
    Dicom(String),

    /// Invalid element value
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// External text detector error
    #[error("detector error: {0}")]
    Detector(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raster handling error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for PhiscrubError {
    fn from(e: dicom_object::ReadError) -> Self {
        PhiscrubError::Dicom(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for PhiscrubError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        PhiscrubError::InvalidValue(format!("{}", e))
    }
}
