//! Processing every presentation and wrapped font in a directory.

use crate::extractor::{document_output_dir, FontExtractor};
use pptfont_core::naming::{is_wrapped_font, recovered_file_name};
use pptfont_core::{BatchReport, Error, FileFailure, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs found in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryInputs {
    /// `*.pptx` files, sorted.
    pub presentations: Vec<PathBuf>,
    /// Standalone `*.fntdata` / `*.eot` files, sorted.
    pub fonts: Vec<PathBuf>,
}

/// List the presentations and wrapped fonts directly inside `dir`.
///
/// Subdirectories are not descended into. An unreadable directory is an error.
pub fn scan_directory(dir: &Path) -> Result<DirectoryInputs> {
    let mut inputs = DirectoryInputs::default();

    for entry in fs::read_dir(dir).map_err(|e| Error::io_at(dir, e))? {
        let path = entry.map_err(|e| Error::io_at(dir, e))?.path();
        if !path.is_file() {
            continue;
        }

        if is_presentation(&path) {
            inputs.presentations.push(path);
        } else if is_wrapped_font(&path) {
            inputs.fonts.push(path);
        }
    }

    inputs.presentations.sort();
    inputs.fonts.sort();
    Ok(inputs)
}

fn is_presentation(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pptx"))
        .unwrap_or(false)
}

/// Runs a [`FontExtractor`] over a directory, one input at a time.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    extractor: FontExtractor,
}

impl BatchProcessor {
    /// Create a processor with the default extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor around a configured extractor.
    pub fn with_extractor(extractor: FontExtractor) -> Self {
        Self { extractor }
    }

    /// Process every input in `dir`, writing under `output_dir`.
    ///
    /// Each presentation is extracted and converted into
    /// `<output_dir>/<stem>/` before the next one starts. Standalone fonts
    /// are converted to `<output_dir>/<stem>.ttf`. Only failing to read
    /// `dir` itself is an error; everything else is recorded in the report.
    pub fn process_directory(&self, dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        log::info!("Processing directory: {}", dir.display());
        let inputs = scan_directory(dir)?;
        log::info!(
            "Found {} PPTX file(s) and {} font file(s)",
            inputs.presentations.len(),
            inputs.fonts.len()
        );

        let mut report = BatchReport::default();

        for pptx in &inputs.presentations {
            let doc_dir = document_output_dir(output_dir, pptx);
            match self.extractor.process_package(pptx, &doc_dir) {
                Ok(package) => report.packages.push(package),
                Err(e) => {
                    log::error!("Failed to process {}: {}", pptx.display(), e);
                    report.failures.push(FileFailure::new(pptx, e));
                }
            }
        }

        for font in &inputs.fonts {
            let dest = output_dir.join(recovered_file_name(font));
            match self.extractor.converter().convert_file(font, &dest) {
                Ok(recovered) => report.fonts.push(recovered),
                Err(e) => {
                    log::error!("Failed to convert {}: {}", font.display(), e);
                    report.failures.push(FileFailure::new(font, e));
                }
            }
        }

        Ok(report)
    }
}
