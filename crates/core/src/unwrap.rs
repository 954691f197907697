//! Slicing the standard font payload out of a wrapped container.

use crate::error::{Error, Result};
use crate::signature::{has_valid_header, FontSignature, SignatureScanner};
use crate::types::RecoveredFont;
use std::fs;
use std::path::Path;

/// Result of unwrapping a container: the payload and where it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unwrapped<'a> {
    /// Font bytes, borrowed from the container.
    pub payload: &'a [u8],
    /// Offset of the payload within the container.
    pub offset: usize,
    /// Signature found at `offset`, or `None` if the fallback offset was used.
    pub signature: Option<FontSignature>,
}

/// Recovers standard font binaries from vendor-wrapped containers.
#[derive(Debug, Clone, Default)]
pub struct ContainerUnwrapper {
    scanner: SignatureScanner,
}

impl ContainerUnwrapper {
    /// Create an unwrapper with the default scanner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unwrapper around a configured scanner.
    pub fn with_scanner(scanner: SignatureScanner) -> Self {
        Self { scanner }
    }

    /// The scanner used to locate payloads.
    pub fn scanner(&self) -> &SignatureScanner {
        &self.scanner
    }

    /// Return the tail of `container` starting at the font signature.
    ///
    /// Fails only when the container is empty or the resulting slice would
    /// be zero-length.
    pub fn unwrap<'a>(&self, container: &'a [u8]) -> Result<&'a [u8]> {
        self.unwrap_detailed(container).map(|u| u.payload)
    }

    /// Like [`unwrap`](Self::unwrap), also reporting offset and signature.
    pub fn unwrap_detailed<'a>(&self, container: &'a [u8]) -> Result<Unwrapped<'a>> {
        if container.is_empty() {
            return Err(Error::NoSignatureFound { len: 0 });
        }

        let (offset, signature) = self.scanner.scan(container);

        match container.get(offset..) {
            Some(payload) if !payload.is_empty() => Ok(Unwrapped {
                payload,
                offset,
                signature,
            }),
            _ => Err(Error::NoSignatureFound {
                len: container.len(),
            }),
        }
    }

    /// Read `src`, unwrap it and write the payload to `dest`.
    ///
    /// Parent directories of `dest` are created as needed.
    pub fn unwrap_file(&self, src: &Path, dest: &Path) -> Result<RecoveredFont> {
        let container = fs::read(src).map_err(|e| Error::io_at(src, e))?;
        let unwrapped = self.unwrap_detailed(&container)?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
        }
        fs::write(dest, unwrapped.payload).map_err(|e| Error::io_at(dest, e))?;

        log::debug!(
            "Unwrapped {} -> {} ({} bytes from offset {})",
            src.display(),
            dest.display(),
            unwrapped.payload.len(),
            unwrapped.offset
        );

        Ok(RecoveredFont {
            path: dest.to_path_buf(),
            source: src.to_path_buf(),
            offset: unwrapped.offset,
            size: unwrapped.payload.len(),
            signature: unwrapped.signature,
            valid_header: has_valid_header(unwrapped.payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::DEFAULT_FALLBACK_OFFSET;

    #[test]
    fn test_unwrap_slices_from_signature() {
        let mut data = vec![0u8; 100];
        data.extend_from_slice(b"OTTO");
        data.extend_from_slice(&[7u8; 50]);

        let payload = ContainerUnwrapper::new().unwrap(&data).unwrap();
        assert_eq!(payload.len(), 54);
        assert!(payload.starts_with(b"OTTO"));
        assert!(has_valid_header(payload));
    }

    #[test]
    fn test_unwrap_empty_buffer_fails() {
        let err = ContainerUnwrapper::new().unwrap(&[]).unwrap_err();
        assert!(matches!(err, Error::NoSignatureFound { len: 0 }));
    }

    #[test]
    fn test_unwrap_signature_in_last_bytes_fails() {
        let mut data = vec![0u8; 20];
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x00]);

        let err = ContainerUnwrapper::new().unwrap(&data).unwrap_err();
        assert!(matches!(err, Error::NoSignatureFound { len: 24 }));
    }

    #[test]
    fn test_unwrap_fallback_without_signature() {
        let data = vec![0xEE; DEFAULT_FALLBACK_OFFSET + 32];
        let unwrapped = ContainerUnwrapper::new().unwrap_detailed(&data).unwrap();
        assert_eq!(unwrapped.offset, DEFAULT_FALLBACK_OFFSET);
        assert_eq!(unwrapped.signature, None);
        assert_eq!(unwrapped.payload.len(), 32);
        assert!(!has_valid_header(unwrapped.payload));
    }

    #[test]
    fn test_unwrap_fallback_lands_on_trailing_signature() {
        let mut data = vec![0xEE; DEFAULT_FALLBACK_OFFSET];
        data.extend_from_slice(b"OTTO");

        let unwrapped = ContainerUnwrapper::new().unwrap_detailed(&data).unwrap();
        assert_eq!(unwrapped.offset, DEFAULT_FALLBACK_OFFSET);
        assert_eq!(unwrapped.signature, None);
        assert_eq!(unwrapped.payload, b"OTTO");
        assert!(has_valid_header(unwrapped.payload));
    }

    #[test]
    fn test_unwrap_fallback_short_buffer_fails() {
        let data = vec![0xEE; DEFAULT_FALLBACK_OFFSET];
        assert!(ContainerUnwrapper::new().unwrap(&data).is_err());
    }

    #[test]
    fn test_unwrap_custom_fallback() {
        let scanner = SignatureScanner::new().with_fallback_offset(4);
        let unwrapper = ContainerUnwrapper::with_scanner(scanner);
        let payload = unwrapper.unwrap(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(payload, &[5, 6]);
    }

    #[test]
    fn test_unwrap_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("font1.fntdata");
        let mut data = vec![0x11; 8];
        data.extend_from_slice(b"typ1");
        data.extend_from_slice(b"payload");
        std::fs::write(&src, &data).unwrap();

        let dest = dir.path().join("nested/out/font1.ttf");
        let recovered = ContainerUnwrapper::new().unwrap_file(&src, &dest).unwrap();
        assert_eq!(recovered.offset, 8);
        assert_eq!(recovered.size, 11);
        assert_eq!(recovered.signature, Some(FontSignature::Type1));
        assert_eq!(recovered.path, dest);
        assert!(recovered.valid_header);
        assert_eq!(std::fs::read(&dest).unwrap(), b"typ1payload");
    }

    #[test]
    fn test_unwrap_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = ContainerUnwrapper::new()
            .unwrap_file(&dir.path().join("missing.eot"), &dir.path().join("out.ttf"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
