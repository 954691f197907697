//! Read access to a PPTX package as a ZIP archive.

use pptfont_core::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Entries under this prefix are embedded font resources.
pub const FONT_STORAGE_PREFIX: &str = "ppt/fonts/";

/// An opened document package.
pub struct FontPackage<R: Read + Seek = BufReader<File>> {
    archive: ZipArchive<R>,
    name: String,
}

impl FontPackage<BufReader<File>> {
    /// Open the package at `path`.
    ///
    /// A missing file or a corrupt ZIP is reported as [`Error::InvalidArchive`].
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::InvalidArchive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        Self::from_reader(BufReader::new(file), name).map_err(|e| match e {
            Error::InvalidArchive { reason, .. } => Error::InvalidArchive {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }
}

impl<R: Read + Seek> FontPackage<R> {
    /// Open a package from any seekable reader.
    pub fn from_reader(reader: R, name: &str) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(|e| Error::InvalidArchive {
            path: PathBuf::from(name),
            reason: format!("Failed to open ZIP: {}", e),
        })?;

        Ok(Self {
            archive,
            name: name.to_string(),
        })
    }

    /// Name of the package (the file name it was opened from).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all file entries starting with `prefix`, sorted.
    pub fn list_entries(&self, prefix: &str) -> Vec<String> {
        let mut entries: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| name.starts_with(prefix) && !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        entries.sort();
        entries
    }

    /// Names of the embedded font resources.
    pub fn font_entries(&self) -> Vec<String> {
        self.list_entries(FONT_STORAGE_PREFIX)
    }

    /// Read an entry's bytes.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", name, e)))?;

        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)
            .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", name, e)))?;

        Ok(data)
    }

    /// Read an entry as UTF-8 text, or `None` if the package has no such entry.
    pub fn read_text(&mut self, name: &str) -> Result<Option<String>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(Error::Zip(format!("Failed to open '{}': {}", name, e))),
        };

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", name, e)))?;

        Ok(Some(content))
    }

    /// Write an entry's bytes, unchanged, to `dest`, overwriting any existing file.
    ///
    /// Returns the number of bytes written.
    pub fn extract_entry_to(&mut self, name: &str, dest: &Path) -> Result<u64> {
        let data = self.read_entry(name)?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
        }
        fs::write(dest, &data).map_err(|e| Error::io_at(dest, e))?;

        Ok(data.len() as u64)
    }

    /// Write an entry into `dest_dir` under its own file name.
    pub fn extract_entry(&mut self, name: &str, dest_dir: &Path) -> Result<PathBuf> {
        let dest = dest_dir.join(entry_file_name(name));
        self.extract_entry_to(name, &dest)?;
        Ok(dest)
    }
}

/// The last path component of an entry name (`ppt/fonts/font1.fntdata` -> `font1.fntdata`).
pub fn entry_file_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// An entry's file name without its extension (`ppt/fonts/font1.fntdata` -> `font1`).
pub fn entry_file_stem(name: &str) -> &str {
    let file_name = entry_file_name(name);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn package(entries: &[(&str, &[u8])]) -> FontPackage<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, FileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, FileOptions::default()).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        let cursor = writer.finish().unwrap();
        FontPackage::from_reader(Cursor::new(cursor.into_inner()), "test.pptx").unwrap()
    }

    #[test]
    fn test_entry_file_name_and_stem() {
        assert_eq!(entry_file_name("ppt/fonts/font1.fntdata"), "font1.fntdata");
        assert_eq!(entry_file_name("font1.fntdata"), "font1.fntdata");
        assert_eq!(entry_file_stem("ppt/fonts/font1.fntdata"), "font1");
        assert_eq!(entry_file_stem("ppt/fonts/noext"), "noext");
        assert_eq!(entry_file_stem("ppt/fonts/.hidden"), ".hidden");
    }

    #[test]
    fn test_font_entries_skip_directories_and_other_parts() {
        let pkg = package(&[
            ("ppt/fonts/", b""),
            ("ppt/fonts/font2.fntdata", b"b"),
            ("ppt/fonts/font1.fntdata", b"a"),
            ("ppt/slides/slide1.xml", b"<p:sld/>"),
        ]);
        assert_eq!(
            pkg.font_entries(),
            vec!["ppt/fonts/font1.fntdata", "ppt/fonts/font2.fntdata"]
        );
        assert_eq!(pkg.name(), "test.pptx");
    }

    #[test]
    fn test_read_text_missing_entry_is_none() {
        let mut pkg = package(&[("ppt/presentation.xml", b"<p:presentation/>")]);
        assert_eq!(
            pkg.read_text("ppt/presentation.xml").unwrap().as_deref(),
            Some("<p:presentation/>")
        );
        assert_eq!(pkg.read_text("ppt/_rels/presentation.xml.rels").unwrap(), None);
    }

    #[test]
    fn test_extract_entry_preserves_bytes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut pkg = package(&[("ppt/fonts/font1.fntdata", &[0, 1, 2, 3, 255])]);

        std::fs::write(dir.path().join("font1.fntdata"), b"stale contents").unwrap();
        let path = pkg.extract_entry("ppt/fonts/font1.fntdata", dir.path()).unwrap();

        assert_eq!(path, dir.path().join("font1.fntdata"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![0, 1, 2, 3, 255]);
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pptx");
        std::fs::write(&path, b"definitely not a zip file").unwrap();

        match FontPackage::open(&path) {
            Err(Error::InvalidArchive { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected InvalidArchive, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FontPackage::open(&dir.path().join("missing.pptx")),
            Err(Error::InvalidArchive { .. })
        ));
    }
}
