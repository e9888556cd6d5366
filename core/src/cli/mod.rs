pub mod report;

pub use report::TextReport;

use crate::api::ErrorPolicy;
use crate::types::BoxColorSetting;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for phiscrub
#[derive(Parser, Debug)]
#[command(name = "phiscrub")]
#[command(about = "Redact burned-in PHI text from DICOM images")]
#[command(version)]
pub struct Cli {
    /// DICOM file or directory to redact
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory to place the redacted copy under (copy mode)
    #[arg(
        short,
        long,
        value_name = "DIR",
        conflicts_with = "in_place",
        required_unless_present = "in_place"
    )]
    pub output_dir: Option<PathBuf>,

    /// Redact the input where it lives instead of copying first
    #[arg(long)]
    pub in_place: bool,

    /// Padding width in pixels added around the image before detection
    #[arg(short, long, default_value_t = 25)]
    pub padding: u32,

    /// Mask color selection (contrast or background)
    #[arg(short, long, default_value = "contrast")]
    pub box_color: BoxColorSetting,

    /// Behavior when one file in a directory fails
    #[arg(long, default_value = "abort")]
    pub on_error: OnErrorArg,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Path to the text detection model
    #[arg(long, value_name = "FILE")]
    pub detection_model: Option<PathBuf>,

    /// Path to the text recognition model
    #[arg(long, value_name = "FILE")]
    pub recognition_model: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Directory-mode failure handling options
#[derive(Debug, Clone, ValueEnum)]
pub enum OnErrorArg {
    /// Stop at the first failing file
    Abort,
    /// Log the failure and keep going
    Continue,
}

impl From<OnErrorArg> for ErrorPolicy {
    fn from(arg: OnErrorArg) -> Self {
        match arg {
            OnErrorArg::Abort => ErrorPolicy::Abort,
            OnErrorArg::Continue => ErrorPolicy::Continue,
        }
    }
}
