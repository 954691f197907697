//! Domain types for extracted and recovered fonts.

use crate::signature::FontSignature;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A raw font resource written out of a document package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFont {
    /// Where the resource was written.
    pub path: PathBuf,

    /// Entry name inside the package (e.g. `ppt/fonts/font1.fntdata`).
    pub entry_name: String,

    /// Typeface name resolved from the package metadata, if any.
    pub typeface: Option<String>,

    /// Number of bytes written.
    pub size: u64,
}

/// A standard font recovered from a wrapped container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveredFont {
    /// Where the recovered font was written.
    pub path: PathBuf,

    /// The wrapped container it came from.
    pub source: PathBuf,

    /// Offset of the payload within the container.
    pub offset: usize,

    /// Payload length in bytes.
    pub size: usize,

    /// Signature at the start of the payload, `None` if the fallback offset was used.
    pub signature: Option<FontSignature>,

    /// Whether the written payload starts with a recognised font header.
    pub valid_header: bool,
}

impl RecoveredFont {
    /// Whether the payload was located by an actual font signature.
    pub fn has_signature(&self) -> bool {
        self.signature.is_some()
    }
}

/// A file that could not be processed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// The file (or package entry) that failed.
    pub path: PathBuf,

    /// Human-readable error.
    pub error: String,
}

impl FileFailure {
    /// Record a failure for `path`.
    pub fn new(path: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self {
            path: path.into(),
            error: error.to_string(),
        }
    }
}

/// Summary of processing a single document package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageReport {
    /// The input document.
    pub document: PathBuf,

    /// Root output directory for this document.
    pub output_dir: PathBuf,

    /// Raw resources written to `<output_dir>/extracted`.
    pub extracted: Vec<ExtractedFont>,

    /// Fonts written to `<output_dir>/converted`.
    pub recovered: Vec<RecoveredFont>,

    /// Per-file failures; these never abort the package.
    pub failures: Vec<FileFailure>,
}

impl PackageReport {
    /// Create an empty report for `document` writing under `output_dir`.
    pub fn new(document: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Record a per-file failure.
    pub fn add_failure(&mut self, path: impl AsRef<Path>, error: impl ToString) {
        self.failures
            .push(FileFailure::new(path.as_ref().to_path_buf(), error));
    }

    /// Paths of the extracted raw resources.
    pub fn extracted_paths(&self) -> Vec<PathBuf> {
        self.extracted.iter().map(|f| f.path.clone()).collect()
    }

    /// Whether anything failed while processing this package.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Summary of processing a directory of inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// One report per presentation that could be opened.
    pub packages: Vec<PackageReport>,

    /// Standalone wrapped fonts converted directly.
    pub fonts: Vec<RecoveredFont>,

    /// Presentations or standalone fonts that failed as a whole.
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Total number of recovered fonts across packages and standalone files.
    pub fn recovered_count(&self) -> usize {
        self.fonts.len() + self.packages.iter().map(|p| p.recovered.len()).sum::<usize>()
    }
}
