//! Extracting embedded fonts from a PPTX and converting them to TTF.

use crate::archive::{entry_file_name, entry_file_stem, FontPackage};
use crate::relationships::resolve_typeface_names;
use pptfont_core::naming::{escape_typeface, RESOURCE_EXTENSION};
use pptfont_core::{Error, ExtractedFont, FontConverter, PackageReport, RecoveredFont, Result};
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

/// Subdirectory for raw resources.
pub const EXTRACTED_DIR: &str = "extracted";

/// Subdirectory for recovered fonts.
pub const CONVERTED_DIR: &str = "converted";

/// Extracts embedded fonts from presentations and recovers standard fonts from them.
#[derive(Debug, Clone, Default)]
pub struct FontExtractor {
    converter: FontConverter,
}

impl FontExtractor {
    /// Create an extractor with the default converter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a configured converter for the second pass.
    pub fn with_converter(mut self, converter: FontConverter) -> Self {
        self.converter = converter;
        self
    }

    /// The converter used for the second pass.
    pub fn converter(&self) -> &FontConverter {
        &self.converter
    }

    /// Extract the raw font resources of the PPTX at `pptx_path` into `output_dir`.
    ///
    /// Fails only if the package cannot be opened or `output_dir` cannot be
    /// created. Entries that fail to extract are logged and left out.
    pub fn extract_fonts(
        &self,
        pptx_path: &Path,
        output_dir: &Path,
    ) -> Result<Vec<ExtractedFont>> {
        let mut package = FontPackage::open(pptx_path)?;
        let mut report = PackageReport::new(pptx_path, output_dir);
        self.extract_from_package(&mut package, output_dir, &mut report)?;
        Ok(report.extracted)
    }

    /// Extract the font resources of an opened package, recording results in `report`.
    pub fn extract_from_package<R: Read + Seek>(
        &self,
        package: &mut FontPackage<R>,
        output_dir: &Path,
        report: &mut PackageReport,
    ) -> Result<()> {
        fs::create_dir_all(output_dir).map_err(|e| Error::io_at(output_dir, e))?;

        let typefaces = resolve_typeface_names(package);
        let entries = package.font_entries();
        log::debug!(
            "{}: {} font entries, {} typeface names",
            package.name(),
            entries.len(),
            typefaces.len()
        );

        for entry in entries {
            let typeface = typefaces.get(entry_file_name(&entry)).cloned();
            let dest = output_dir.join(resource_file_name(&entry, typeface.as_deref()));

            match package.extract_entry_to(&entry, &dest) {
                Ok(size) => {
                    log::info!(
                        "Extracted font {} -> {}",
                        typeface.as_deref().unwrap_or(&entry),
                        dest.display()
                    );
                    report.extracted.push(ExtractedFont {
                        path: dest,
                        entry_name: entry,
                        typeface,
                        size,
                    });
                }
                Err(e) => {
                    log::error!("Failed to extract {}: {}", entry, e);
                    report.add_failure(&entry, e);
                }
            }
        }

        Ok(())
    }

    /// Recover standard fonts from extracted resources into `output_dir`.
    ///
    /// Returns the fonts written; failures are logged and skipped.
    pub fn convert_fonts<P: AsRef<Path>>(
        &self,
        paths: &[P],
        output_dir: &Path,
    ) -> Vec<RecoveredFont> {
        self.converter.convert_fonts(paths, output_dir).recovered
    }

    /// Extract into `<output_dir>/extracted`, then convert into `<output_dir>/converted`.
    pub fn process_package(&self, pptx_path: &Path, output_dir: &Path) -> Result<PackageReport> {
        log::info!("Extracting fonts from {}", pptx_path.display());
        let mut package = FontPackage::open(pptx_path)?;
        let mut report = PackageReport::new(pptx_path, output_dir);

        let extract_dir = output_dir.join(EXTRACTED_DIR);
        self.extract_from_package(&mut package, &extract_dir, &mut report)?;
        drop(package);

        if report.extracted.is_empty() {
            log::warn!("No fonts extracted from {}", pptx_path.display());
            return Ok(report);
        }
        log::info!(
            "Extracted {} font file(s) from {}",
            report.extracted.len(),
            pptx_path.display()
        );

        let convert_dir = output_dir.join(CONVERTED_DIR);
        let conversion = self
            .converter
            .convert_fonts(&report.extracted_paths(), &convert_dir);
        report.recovered = conversion.recovered;
        report.failures.extend(conversion.failures);

        log::info!("Converted {} font file(s)", report.recovered.len());
        if report.has_failures() {
            log::warn!(
                "{} file(s) from {} failed",
                report.failures.len(),
                pptx_path.display()
            );
        }
        Ok(report)
    }
}

/// File name for an extracted resource.
///
/// The escaped typeface name when known, otherwise the entry's own stem,
/// always with the resource extension.
pub fn resource_file_name(entry_name: &str, typeface: Option<&str>) -> String {
    let stem = typeface
        .filter(|t| !t.trim().is_empty())
        .map(escape_typeface)
        .unwrap_or_else(|| entry_file_stem(entry_name).to_string());
    format!("{}.{}", stem, RESOURCE_EXTENSION)
}

/// `<output_dir>/<document stem>`: where a document's results go in a batch.
pub fn document_output_dir(output_dir: &Path, document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    output_dir.join(stem)
}
