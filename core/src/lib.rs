pub mod api;
pub mod cli;
pub mod detect;
pub mod error;
pub mod files;
pub mod instance;
pub mod phi;
pub mod pixels;
pub mod raster;
pub mod redact;
pub mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{
    DicomImageRedactor, ErrorPolicy, FailureReport, FileReport, RedactConfig, RedactionSummary,
};
#[cfg(feature = "ocr")]
pub use detect::ocr::OcrsDetectorFactory;
pub use detect::{reconcile_boxes, DetectorFactory, TextDetector};
pub use error::{PhiscrubError, Result};
pub use instance::DicomInstance;
pub use phi::{synthesize_deny_list, PhiDenyList};
pub use pixels::PixelBuffer;
pub use raster::Raster;
pub use redact::apply_redaction;
pub use types::*;
