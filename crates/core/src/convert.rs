//! Batch conversion of wrapped font files into standard fonts.

use crate::error::Result;
use crate::naming::{is_wrapped_font, recovered_file_name};
use crate::types::{FileFailure, RecoveredFont};
use crate::unwrap::ContainerUnwrapper;
use std::path::{Path, PathBuf};

/// Outcome of converting a list of files.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// Fonts written successfully.
    pub recovered: Vec<RecoveredFont>,

    /// Files that could not be converted.
    pub failures: Vec<FileFailure>,
}

impl Conversion {
    /// Paths of the recovered fonts.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.recovered.iter().map(|f| f.path.clone()).collect()
    }
}

/// Converts wrapped font files (`.fntdata`, `.eot`) into `.ttf` files.
#[derive(Debug, Clone, Default)]
pub struct FontConverter {
    unwrapper: ContainerUnwrapper,
}

impl FontConverter {
    /// Create a converter with the default unwrapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter around a configured unwrapper.
    pub fn with_unwrapper(unwrapper: ContainerUnwrapper) -> Self {
        Self { unwrapper }
    }

    /// Convert one wrapped font file to `dest`.
    pub fn convert_file(&self, src: &Path, dest: &Path) -> Result<RecoveredFont> {
        log::info!("Converting font file: {}", src.display());
        let recovered = self.unwrapper.unwrap_file(src, dest)?;

        if !recovered.has_signature() {
            log::warn!(
                "No font signature in {}, used fallback offset {}",
                src.display(),
                recovered.offset
            );
        }
        if !recovered.valid_header {
            log::warn!("Recovered font {} has no valid header", dest.display());
        }

        log::info!(
            "Converted {} -> {} ({} bytes)",
            src.display(),
            dest.display(),
            recovered.size
        );
        Ok(recovered)
    }

    /// Convert every wrapped font in `paths` into `output_dir`.
    ///
    /// Each output is named after its source stem with a `.ttf` extension.
    /// Files without a wrapped-font extension are skipped. A failing file
    /// is logged and recorded; the rest of the list is still processed.
    pub fn convert_fonts<P: AsRef<Path>>(&self, paths: &[P], output_dir: &Path) -> Conversion {
        let mut conversion = Conversion::default();

        for src in paths {
            let src = src.as_ref();
            if !is_wrapped_font(src) {
                log::debug!("Skipping {}: not a wrapped font", src.display());
                continue;
            }

            let dest = output_dir.join(recovered_file_name(src));
            match self.convert_file(src, &dest) {
                Ok(recovered) => conversion.recovered.push(recovered),
                Err(e) => {
                    log::error!("Failed to convert {}: {}", src.display(), e);
                    conversion.failures.push(FileFailure::new(src, e));
                }
            }
        }

        log::info!(
            "Converted {} of {} font file(s)",
            conversion.recovered.len(),
            paths.len()
        );
        conversion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn wrapped(padding: usize, magic: &[u8], payload: usize) -> Vec<u8> {
        let mut data = vec![0u8; padding];
        data.extend_from_slice(magic);
        data.extend(std::iter::repeat(0x42).take(payload));
        data
    }

    #[test]
    fn test_convert_fonts_names_outputs_after_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("Open___Sans.fntData");
        fs::write(&src, wrapped(30, b"OTTO", 10)).unwrap();

        let out = dir.path().join("converted");
        let conversion = FontConverter::new().convert_fonts(&[&src], &out);

        assert!(conversion.failures.is_empty());
        assert_eq!(conversion.paths(), vec![out.join("Open___Sans.ttf")]);
        assert_eq!(fs::read(out.join("Open___Sans.ttf")).unwrap().len(), 14);
    }

    #[test]
    fn test_convert_fonts_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.fntdata");
        fs::write(&empty, b"").unwrap();
        let good = dir.path().join("good.eot");
        fs::write(&good, wrapped(5, &[0, 1, 0, 0], 3)).unwrap();
        let other = dir.path().join("notes.txt");
        fs::write(&other, b"hello").unwrap();

        let out = dir.path().join("converted");
        let conversion = FontConverter::new().convert_fonts(&[empty.clone(), good, other], &out);

        assert_eq!(conversion.recovered.len(), 1);
        assert_eq!(conversion.recovered[0].path, out.join("good.ttf"));
        assert_eq!(conversion.failures.len(), 1);
        assert_eq!(conversion.failures[0].path, empty);
        assert!(!out.join("notes.ttf").exists());
    }

    #[test]
    fn test_convert_fonts_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let conversion = FontConverter::new().convert_fonts::<PathBuf>(&[], dir.path());
        assert!(conversion.recovered.is_empty());
        assert!(conversion.failures.is_empty());
    }
}
