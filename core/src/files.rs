//! DICOM file discovery and copy-before-mutate helpers

use crate::error::{PhiscrubError, Result};
use log::info;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions treated as DICOM (case-insensitive)
const DICOM_EXTENSIONS: [&str; 2] = ["dcm", "dicom"];

/// Collects all DICOM files under a directory, recursively
///
/// Files are matched by extension; files without an extension are included
/// when they carry the DICM magic. The result is sorted so directory runs
/// process files in a stable order.
pub fn collect_dicom_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match path.extension() {
            Some(ext) => {
                if DICOM_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
                    files.push(path.to_path_buf());
                }
            }
            None => {
                if is_dicom_file(path) {
                    info!("found headerless DICOM file: {}", path.display());
                    files.push(path.to_path_buf());
                }
            }
        }
    }
    files.sort();
    files
}

/// Checks if a file has a DICOM header
///
/// DICOM files typically have:
/// - 128-byte preamble
/// - 4-byte "DICM" magic string at offset 128
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = [0u8; 132];
    match file.read(&mut buffer) {
        Ok(n) if n >= 132 => &buffer[128..132] == b"DICM",
        _ => false,
    }
}

/// Copies a source file or directory tree under `dst_parent`
///
/// All processing happens on the copy. Returns the copy's path.
///
/// # Errors
///
/// A directory copy into an existing destination is a configuration error,
/// raised before anything is written. A missing source is an input error.
pub fn copy_for_processing(src: &Path, dst_parent: &Path) -> Result<PathBuf> {
    let tail = src.file_name().ok_or_else(|| {
        PhiscrubError::Config(format!("cannot determine file name for {}", src.display()))
    })?;
    let dst = dst_parent.join(tail);

    if src.is_dir() {
        if dst.exists() {
            return Err(PhiscrubError::Config(format!(
                "destination {} already exists; clear it or use a different output directory",
                dst.display()
            )));
        }
        copy_tree(src, &dst)?;
    } else if src.is_file() {
        fs::create_dir_all(dst_parent)?;
        fs::copy(src, &dst)?;
    } else {
        return Err(PhiscrubError::InputNotFound(format!(
            "{} does not exist",
            src.display()
        )));
    }

    Ok(dst)
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Validates orchestrator entry paths before any mutation
pub fn validate_paths(input: &Path, output_dir: &Path) -> Result<()> {
    if !input.is_file() && !input.is_dir() {
        return Err(PhiscrubError::InputNotFound(format!(
            "input path {} is neither a file nor a directory",
            input.display()
        )));
    }
    if output_dir.is_file() {
        return Err(PhiscrubError::Config(format!(
            "output path {} must be a directory (it does not need to exist yet)",
            output_dir.display()
        )));
    }
    Ok(())
}
