//! CLI tool for extracting and converting fonts embedded in PowerPoint files.

mod upload;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pptfont_core::naming::{is_wrapped_font, recovered_file_name};
use pptfont_core::{
    upload_package, BatchReport, ContainerUnwrapper, FileFailure, FontConverter, PackageReport,
    SignatureScanner, DEFAULT_FALLBACK_OFFSET,
};
use pptfont_pptx::{BatchProcessor, FontExtractor, EXTRACTED_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use upload::GraphqlUploader;

/// Extract embedded fonts from PowerPoint files and convert them to TTF.
#[derive(Parser, Debug)]
#[command(name = "ppt-font")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// PPTX file to extract fonts from
    #[arg(short, long)]
    pptx: Option<PathBuf>,

    /// Single wrapped font file (.fntdata or .eot) to convert
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Directory containing PPTX and/or wrapped font files
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// GraphQL endpoint to upload fonts to (no upload if omitted)
    #[arg(long)]
    upload_endpoint: Option<String>,

    /// Name prefix for uploaded raw (unconverted) font resources
    #[arg(long, default_value = "sensenote_")]
    raw_name_prefix: String,

    /// Upload request timeout in seconds
    #[arg(long, default_value = "30")]
    upload_timeout: u64,

    /// Payload offset used when no font signature is found
    #[arg(long, default_value_t = DEFAULT_FALLBACK_OFFSET)]
    fallback_offset: usize,

    /// Print a JSON report to stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let scanner = SignatureScanner::new().with_fallback_offset(args.fallback_offset);
    let converter = FontConverter::with_unwrapper(ContainerUnwrapper::with_scanner(scanner));
    let extractor = FontExtractor::new().with_converter(converter);

    let uploader = args
        .upload_endpoint
        .as_deref()
        .map(|endpoint| GraphqlUploader::new(endpoint, args.upload_timeout))
        .transpose()?;

    let font = match (&args.pptx, &args.font, &args.dir) {
        (None, None, None) => Some(default_font(&args.output)?),
        _ => args.font.clone(),
    };

    let mut run = BatchReport::default();

    if let Some(dir) = &args.dir {
        if !dir.is_dir() {
            bail!("Directory does not exist: {}", dir.display());
        }
        let batch = BatchProcessor::with_extractor(extractor.clone())
            .process_directory(dir, &args.output)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;
        merge(&mut run, batch);
    }

    if let Some(pptx) = &args.pptx {
        run.packages.push(process_pptx(&extractor, pptx, &args.output)?);
    }

    if let Some(font) = &font {
        if !font.is_file() {
            bail!("Font file does not exist: {}", font.display());
        }
        let dest = args.output.join(recovered_file_name(font));
        match extractor.converter().convert_file(font, &dest) {
            Ok(recovered) => run.fonts.push(recovered),
            Err(e) => {
                log::error!("Failed to convert {}: {}", font.display(), e);
                run.failures.push(FileFailure::new(font, e));
            }
        }
    }

    if let Some(uploader) = &uploader {
        for report in &run.packages {
            let uploaded = upload_package(uploader, report, &args.raw_name_prefix);
            log::info!(
                "Uploaded {} file(s) from {} to {}",
                uploaded,
                report.document.display(),
                uploader.endpoint()
            );
        }
    }

    log::info!(
        "Done: {} package(s), {} font(s) recovered, {} failure(s)",
        run.packages.len(),
        run.recovered_count(),
        run.failures.len() + run.packages.iter().map(|p| p.failures.len()).sum::<usize>()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    }

    Ok(())
}

/// Process the presentation given with `--pptx`.
///
/// It is the run's top-level input, so failing to open it ends the run.
fn process_pptx(extractor: &FontExtractor, pptx: &Path, output: &Path) -> Result<PackageReport> {
    extractor
        .process_package(pptx, output)
        .with_context(|| format!("Failed to process {}", pptx.display()))
}

/// Font converted when no input is given: the first wrapped font (by name)
/// left in `<output>/extracted` by an earlier run.
fn default_font(output: &Path) -> Result<PathBuf> {
    let dir = output.join(EXTRACTED_DIR);
    let entries = fs::read_dir(&dir).with_context(|| {
        format!(
            "No input given and {} cannot be read; use --pptx, --font or --dir",
            dir.display()
        )
    })?;

    let mut fonts: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_wrapped_font(path))
        .collect();
    fonts.sort();

    match fonts.into_iter().next() {
        Some(path) => {
            log::info!("No input given, using {}", path.display());
            Ok(path)
        }
        None => bail!(
            "No input given and no extracted fonts in {}; use --pptx, --font or --dir",
            dir.display()
        ),
    }
}

fn merge(run: &mut BatchReport, batch: BatchReport) {
    run.packages.extend(batch.packages);
    run.fonts.extend(batch.fonts);
    run.failures.extend(batch.failures);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_pptx_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pptx = dir.path().join("missing.pptx");

        let err = process_pptx(&FontExtractor::new(), &pptx, dir.path()).unwrap_err();
        assert!(err.to_string().contains("missing.pptx"));
    }

    #[test]
    fn test_corrupt_pptx_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pptx = dir.path().join("broken.pptx");
        fs::write(&pptx, b"not a zip archive").unwrap();

        let output = dir.path().join("out");
        assert!(process_pptx(&FontExtractor::new(), &pptx, &output).is_err());
        assert!(!output.join(EXTRACTED_DIR).exists());
    }

    #[test]
    fn test_default_font_uses_extracted_resource() {
        let dir = tempfile::tempdir().unwrap();
        let extracted = dir.path().join(EXTRACTED_DIR);
        fs::create_dir_all(&extracted).unwrap();
        fs::write(extracted.join("font1.fntData"), b"data").unwrap();
        fs::write(extracted.join("notes.txt"), b"text").unwrap();

        let font = default_font(dir.path()).unwrap();
        assert_eq!(font, extracted.join("font1.fntData"));
    }

    #[test]
    fn test_default_font_picks_first_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let extracted = dir.path().join(EXTRACTED_DIR);
        fs::create_dir_all(&extracted).unwrap();
        fs::write(extracted.join("Open___Sans.fntData"), b"data").unwrap();
        fs::write(extracted.join("Arial.fntData"), b"data").unwrap();

        let font = default_font(dir.path()).unwrap();
        assert_eq!(font, extracted.join("Arial.fntData"));
    }

    #[test]
    fn test_default_font_requires_extracted_fonts() {
        let dir = tempfile::tempdir().unwrap();
        assert!(default_font(dir.path()).is_err());

        fs::create_dir_all(dir.path().join(EXTRACTED_DIR)).unwrap();
        assert!(default_font(dir.path()).is_err());
    }
}
