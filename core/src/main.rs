use clap::Parser;
use log::{error, info};
use phiscrub_core::cli::{Cli, OutputFormat, TextReport};
use phiscrub_core::{RedactConfig, RedactionSummary, Result};
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = RedactConfig {
        padding_width: cli.padding,
        box_color: cli.box_color,
        on_error: cli.on_error.clone().into(),
    };

    info!("redacting {}", cli.input.display());

    let summary = match run(&cli, config) {
        Ok(summary) => summary,
        Err(e) => {
            error!("redaction failed: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_summary(&summary, cli.format);

    if !summary.failures.is_empty() {
        process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

#[cfg(feature = "ocr")]
fn run(cli: &Cli, config: RedactConfig) -> Result<RedactionSummary> {
    use phiscrub_core::{DicomImageRedactor, OcrsDetectorFactory, PhiscrubError};

    let (Some(detection), Some(recognition)) = (&cli.detection_model, &cli.recognition_model)
    else {
        return Err(PhiscrubError::Config(
            "--detection-model and --recognition-model are required".to_string(),
        ));
    };

    let factory = OcrsDetectorFactory::from_model_files(detection, recognition)?;
    let redactor = DicomImageRedactor::new(factory, config)?;

    if cli.in_place {
        redactor.redact_in_place(&cli.input)
    } else {
        let output_dir = cli
            .output_dir
            .as_ref()
            .expect("clap enforces --output-dir without --in-place");
        redactor.redact(&cli.input, output_dir)
    }
}

#[cfg(not(feature = "ocr"))]
fn run(_cli: &Cli, _config: RedactConfig) -> Result<RedactionSummary> {
    eprintln!("Error: text detection requires the 'ocr' feature");
    eprintln!("Rebuild with: cargo build --features ocr");
    process::exit(1)
}

fn output_summary(summary: &RedactionSummary, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(summary));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("failed to serialize summary: {}", e);
                        eprintln!("Error: failed to serialize summary: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
