//! ocrs-backed reference implementation of the detector contract
//!
//! Recognizes every detected word and reports a PERSON detection when the
//! recognized text is in the deny-list. A deny-list hit is a literal match,
//! so detections carry a score of 1.0.

use super::{DetectorFactory, TextDetector};
use crate::error::{PhiscrubError, Result};
use crate::phi::PhiDenyList;
use crate::raster::Raster;
use crate::types::Detection;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use rten_imageproc::BoundingRect;
use std::path::Path;
use std::sync::Arc;

/// Builds [`OcrsDetector`]s sharing one loaded engine
pub struct OcrsDetectorFactory {
    engine: Arc<OcrEngine>,
}

impl OcrsDetectorFactory {
    /// Loads the detection and recognition models from disk
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either model fails to load.
    pub fn from_model_files(detection_model: &Path, recognition_model: &Path) -> Result<Self> {
        let detection = Model::load_file(detection_model).map_err(|e| {
            PhiscrubError::Config(format!(
                "failed to load detection model {}: {}",
                detection_model.display(),
                e
            ))
        })?;
        let recognition = Model::load_file(recognition_model).map_err(|e| {
            PhiscrubError::Config(format!(
                "failed to load recognition model {}: {}",
                recognition_model.display(),
                e
            ))
        })?;
        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection),
            recognition_model: Some(recognition),
            ..Default::default()
        })
        .map_err(|e| PhiscrubError::Detector(format!("{}", e)))?;
        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}

impl DetectorFactory for OcrsDetectorFactory {
    type Detector = OcrsDetector;

    fn make_detector(&self, deny_list: &PhiDenyList) -> Result<OcrsDetector> {
        Ok(OcrsDetector {
            engine: Arc::clone(&self.engine),
            deny_list: deny_list.clone(),
        })
    }
}

/// Detector matching recognized words against one image's deny-list
pub struct OcrsDetector {
    engine: Arc<OcrEngine>,
    deny_list: PhiDenyList,
}

impl TextDetector for OcrsDetector {
    fn detect(&self, raster: &Raster) -> Result<Vec<Detection>> {
        let rgb = match raster {
            Raster::Rgb(img) => img.clone(),
            Raster::Grayscale(img) => image::DynamicImage::ImageLuma8(img.clone()).to_rgb8(),
        };
        let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
            .map_err(|e| PhiscrubError::Detector(format!("{}", e)))?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| PhiscrubError::Detector(format!("{}", e)))?;
        let words = self
            .engine
            .detect_words(&input)
            .map_err(|e| PhiscrubError::Detector(format!("{}", e)))?;

        let mut detections = Vec::new();
        for word in words {
            let texts = self
                .engine
                .recognize_text(&input, &[vec![word]])
                .map_err(|e| PhiscrubError::Detector(format!("{}", e)))?;
            let matched = texts
                .iter()
                .flatten()
                .map(|line| line.to_string())
                .any(|text| self.deny_list.contains(text.trim()));
            if !matched {
                continue;
            }
            let rect = word.bounding_rect();
            let corner = rect.top_left();
            detections.push(Detection {
                entity_type: "PERSON".to_string(),
                score: 1.0,
                left: corner.x.max(0.0) as u32,
                top: corner.y.max(0.0) as u32,
                width: word.width().max(0.0) as u32,
                height: word.height().max(0.0) as u32,
            });
        }
        Ok(detections)
    }
}
