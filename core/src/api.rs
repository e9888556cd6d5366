use crate::detect::{reconcile_boxes, DetectorFactory, TextDetector};
use crate::error::{PhiscrubError, Result};
use crate::files;
use crate::instance::DicomInstance;
use crate::phi::synthesize_deny_list;
use crate::raster::{self, pad};
use crate::redact::apply_redaction;
use crate::types::BoxColorSetting;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Directory-mode behavior when one file's redaction fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing file and propagate its error
    #[default]
    Abort,
    /// Log the failure, record it in the summary and keep going
    Continue,
}

/// Redaction configuration
#[derive(Debug, Clone)]
pub struct RedactConfig {
    /// Uniform padding in pixels added around the raster before detection
    pub padding_width: u32,
    /// How the mask color is chosen
    pub box_color: BoxColorSetting,
    /// Directory-mode failure handling
    pub on_error: ErrorPolicy,
}

impl Default for RedactConfig {
    fn default() -> Self {
        Self {
            padding_width: 25,
            box_color: BoxColorSetting::Contrast,
            on_error: ErrorPolicy::Abort,
        }
    }
}

impl RedactConfig {
    /// Checks the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        pad::validate_padding(self.padding_width)
    }
}

/// Per-file outcome recorded in the summary
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FileReport {
    pub path: PathBuf,
    pub boxes_redacted: usize,
}

/// A file that failed during a best-effort directory run
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FailureReport {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a redaction run
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RedactionSummary {
    /// Path of the redacted file or directory
    pub output: PathBuf,
    pub files: Vec<FileReport>,
    pub failures: Vec<FailureReport>,
}

/// Redacts burned-in PHI text from DICOM images
///
/// The orchestrator sequences the whole per-file pipeline: raster
/// conversion, padding, deny-list synthesis, detection, geometry
/// reconciliation, mask application and persistence. The text detector is
/// an injected capability; a fresh detector is requested per image so it
/// can be primed with that image's own deny-list.
///
/// # Example
///
/// ```no_run
/// use phiscrub_core::{DicomImageRedactor, RedactConfig};
/// use phiscrub_core::{Detection, DetectorFactory, PhiDenyList, Raster, TextDetector};
/// use std::path::Path;
///
/// struct NoopDetector;
/// impl TextDetector for NoopDetector {
///     fn detect(&self, _raster: &Raster) -> phiscrub_core::Result<Vec<Detection>> {
///         Ok(Vec::new())
///     }
/// }
///
/// struct NoopFactory;
/// impl DetectorFactory for NoopFactory {
///     type Detector = NoopDetector;
///     fn make_detector(&self, _deny_list: &PhiDenyList) -> phiscrub_core::Result<NoopDetector> {
///         Ok(NoopDetector)
///     }
/// }
///
/// let redactor = DicomImageRedactor::new(NoopFactory, RedactConfig::default()).unwrap();
/// let summary = redactor
///     .redact(Path::new("scan.dcm"), Path::new("redacted/"))
///     .unwrap();
/// println!("output at {}", summary.output.display());
/// ```
pub struct DicomImageRedactor<F: DetectorFactory> {
    factory: F,
    config: RedactConfig,
}

impl<F: DetectorFactory> DicomImageRedactor<F> {
    /// Creates a redactor, validating the configuration up front
    pub fn new(factory: F, config: RedactConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { factory, config })
    }

    /// Copy-mode entry: duplicates `input` under `output_dir` and redacts
    /// the copy
    ///
    /// The source file or tree is never mutated. Returns a summary carrying
    /// the output location and per-file region counts.
    pub fn redact(&self, input: &Path, output_dir: &Path) -> Result<RedactionSummary> {
        files::validate_paths(input, output_dir)?;
        let dst = files::copy_for_processing(input, output_dir)?;
        self.redact_in_place(&dst)
    }

    /// Overwrite-mode entry: redacts `path` where it lives
    ///
    /// Only call this on a copy you are prepared to lose; the pixel data is
    /// destroyed in place.
    pub fn redact_in_place(&self, path: &Path) -> Result<RedactionSummary> {
        if path.is_dir() {
            self.redact_directory(path)
        } else if path.is_file() {
            let report = self.redact_single(path)?;
            Ok(RedactionSummary {
                output: path.to_path_buf(),
                files: vec![report],
                failures: Vec::new(),
            })
        } else {
            Err(PhiscrubError::InputNotFound(format!(
                "{} does not exist",
                path.display()
            )))
        }
    }

    fn redact_directory(&self, dir: &Path) -> Result<RedactionSummary> {
        let mut summary = RedactionSummary {
            output: dir.to_path_buf(),
            files: Vec::new(),
            failures: Vec::new(),
        };
        for file in files::collect_dicom_files(dir) {
            match self.redact_single(&file) {
                Ok(report) => summary.files.push(report),
                Err(e) => match self.config.on_error {
                    ErrorPolicy::Abort => return Err(e),
                    ErrorPolicy::Continue => {
                        warn!("skipping {}: {}", file.display(), e);
                        summary.failures.push(FailureReport {
                            path: file,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }
        Ok(summary)
    }

    /// The per-file redaction procedure
    fn redact_single(&self, path: &Path) -> Result<FileReport> {
        info!("redacting {}", path.display());
        let instance = DicomInstance::open(path)?;

        let raster = raster::normalize(&instance)?;
        let padded = pad::add_padding(&raster, self.config.padding_width)?;

        let deny_list = synthesize_deny_list(instance.dataset());
        let detector = self.factory.make_detector(&deny_list)?;
        let detections = detector.detect(&padded)?;

        let boxes = reconcile_boxes(&detections, self.config.padding_width);
        let redacted = apply_redaction(&instance, &boxes, self.config.box_color)?;
        redacted.save(path)?;

        info!("redacted {} region(s) in {}", boxes.len(), path.display());
        Ok(FileReport {
            path: path.to_path_buf(),
            boxes_redacted: boxes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phi::PhiDenyList;
    use crate::pixels::PixelBuffer;
    use crate::raster::Raster;
    use crate::testing;
    use crate::types::Detection;
    use std::fs;
    use tempfile::TempDir;

    /// Detector returning a fixed set of boxes in padded coordinates
    struct FixedDetector {
        detections: Vec<Detection>,
    }

    impl TextDetector for FixedDetector {
        fn detect(&self, _raster: &Raster) -> Result<Vec<Detection>> {
            Ok(self.detections.clone())
        }
    }

    struct FixedFactory {
        detections: Vec<Detection>,
        expect_deny_entry: Option<String>,
    }

    impl DetectorFactory for FixedFactory {
        type Detector = FixedDetector;

        fn make_detector(&self, deny_list: &PhiDenyList) -> Result<FixedDetector> {
            if let Some(entry) = &self.expect_deny_entry {
                assert!(deny_list.contains(entry), "deny list missing {}", entry);
            }
            Ok(FixedDetector {
                detections: self.detections.clone(),
            })
        }
    }

    fn detection(left: u32, top: u32, width: u32, height: u32) -> Detection {
        Detection {
            entity_type: "PERSON".to_string(),
            score: 1.0,
            left,
            top,
            width,
            height,
        }
    }

    fn write_test_instance(path: &std::path::Path) {
        use crate::tags;
        use dicom_core::{DataElement, PrimitiveValue, VR};

        // background 0, a white "text" row burned in at row 2, cols 1..5
        let mut pixels = vec![0u8; 8 * 8];
        for col in 1..5 {
            pixels[2 * 8 + col] = 255;
        }
        let mut dataset = testing::gray_dataset(8, 8, pixels);
        dataset.put(DataElement::new(
            tags::PATIENT_NAME,
            VR::PN,
            PrimitiveValue::from("Smith^John"),
        ));
        testing::file_object(dataset).write_to_file(path).unwrap();
    }

    fn config(padding: u32) -> RedactConfig {
        RedactConfig {
            padding_width: padding,
            ..RedactConfig::default()
        }
    }

    #[test]
    fn test_rejects_invalid_padding_at_construction() {
        let factory = FixedFactory {
            detections: Vec::new(),
            expect_deny_entry: None,
        };
        assert!(DicomImageRedactor::new(factory, config(0)).is_err());
        let factory = FixedFactory {
            detections: Vec::new(),
            expect_deny_entry: None,
        };
        assert!(DicomImageRedactor::new(factory, config(150)).is_err());
    }

    #[test]
    fn test_end_to_end_contrast_redaction() {
        let work = TempDir::new().unwrap();
        let out = work.path().join("redacted");
        let input = work.path().join("scan.dcm");
        write_test_instance(&input);

        // the detector reports the burned-in text region, shifted by the
        // padding it saw
        let padding = 25u32;
        let factory = FixedFactory {
            detections: vec![detection(1 + padding, 2 + padding, 4, 1)],
            expect_deny_entry: Some("Smith John".to_string()),
        };
        let redactor = DicomImageRedactor::new(factory, config(padding)).unwrap();
        let summary = redactor.redact(&input, &out).unwrap();

        assert_eq!(summary.output, out.join("scan.dcm"));
        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.files[0].boxes_redacted, 1);
        assert!(summary.failures.is_empty());

        // background mode is 0, so the contrast mask is 255 − 0: the text
        // region is overwritten with white, everything else untouched
        let redacted = DicomInstance::open(&summary.output).unwrap();
        let PixelBuffer::Mono8 { data, .. } = redacted.pixels().unwrap() else {
            panic!("expected 8-bit grayscale");
        };
        for col in 1..5 {
            assert_eq!(data[2 * 8 + col], 255);
        }
        assert_eq!(data[0], 0);
        assert_eq!(data[2 * 8 + 6], 0);

        // the source file is untouched
        let original = DicomInstance::open(&input).unwrap();
        let PixelBuffer::Mono8 { data, .. } = original.pixels().unwrap() else {
            panic!("expected 8-bit grayscale");
        };
        assert_eq!(data[2 * 8 + 1], 255);
    }

    #[test]
    fn test_directory_mode_processes_all_files() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("study");
        fs::create_dir_all(src.join("series")).unwrap();
        write_test_instance(&src.join("a.dcm"));
        write_test_instance(&src.join("series").join("b.dcm"));

        let factory = FixedFactory {
            detections: Vec::new(),
            expect_deny_entry: None,
        };
        let redactor = DicomImageRedactor::new(factory, config(25)).unwrap();
        let out = work.path().join("out");
        let summary = redactor.redact(&src, &out).unwrap();

        assert_eq!(summary.files.len(), 2);
        assert!(out.join("study").join("series").join("b.dcm").is_file());
    }

    #[test]
    fn test_directory_mode_abort_on_error() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("study");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("bad.dcm"), b"not a dicom file").unwrap();
        write_test_instance(&src.join("good.dcm"));

        let factory = FixedFactory {
            detections: Vec::new(),
            expect_deny_entry: None,
        };
        let redactor = DicomImageRedactor::new(factory, config(25)).unwrap();
        let out = work.path().join("out");
        assert!(redactor.redact(&src, &out).is_err());
    }

    #[test]
    fn test_directory_mode_continue_on_error() {
        let work = TempDir::new().unwrap();
        let src = work.path().join("study");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("bad.dcm"), b"not a dicom file").unwrap();
        write_test_instance(&src.join("good.dcm"));

        let factory = FixedFactory {
            detections: Vec::new(),
            expect_deny_entry: None,
        };
        let redactor = DicomImageRedactor::new(
            factory,
            RedactConfig {
                on_error: ErrorPolicy::Continue,
                ..config(25)
            },
        )
        .unwrap();
        let out = work.path().join("out");
        let summary = redactor.redact(&src, &out).unwrap();

        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].path.ends_with("bad.dcm"));
    }

    #[test]
    fn test_missing_input_is_rejected_before_copying() {
        let work = TempDir::new().unwrap();
        let factory = FixedFactory {
            detections: Vec::new(),
            expect_deny_entry: None,
        };
        let redactor = DicomImageRedactor::new(factory, config(25)).unwrap();
        let missing = work.path().join("missing.dcm");
        assert!(matches!(
            redactor.redact(&missing, work.path()),
            Err(PhiscrubError::InputNotFound(_))
        ));
    }
}
