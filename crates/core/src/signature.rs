//! Font signature scanning.
//!
//! Wrapped fonts carry a vendor header of variable length in front of the
//! real font binary. Rather than parsing that header, we look for the first
//! sfnt/Type 1 magic number and treat everything from there on as the font.

use serde::{Deserialize, Serialize};

/// Offset used when no signature is found: the usual size of a wrapper header.
pub const DEFAULT_FALLBACK_OFFSET: usize = 512;

/// Length of every recognised magic number.
pub const SIGNATURE_LEN: usize = 4;

/// A recognised font-format magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSignature {
    /// TrueType outlines (`00 01 00 00`).
    TrueType,
    /// OpenType with CFF outlines (`OTTO`).
    OpenType,
    /// Apple TrueType (`true`).
    AppleTrueType,
    /// PostScript Type 1 wrapped in sfnt (`typ1`).
    Type1,
}

impl FontSignature {
    /// All signatures, in the order they are tested.
    pub const ALL: [FontSignature; 4] = [
        FontSignature::TrueType,
        FontSignature::OpenType,
        FontSignature::AppleTrueType,
        FontSignature::Type1,
    ];

    /// The four magic bytes for this signature.
    pub const fn magic(self) -> [u8; SIGNATURE_LEN] {
        match self {
            FontSignature::TrueType => [0x00, 0x01, 0x00, 0x00],
            FontSignature::OpenType => *b"OTTO",
            FontSignature::AppleTrueType => *b"true",
            FontSignature::Type1 => *b"typ1",
        }
    }

    /// Identify the signature at the start of `bytes`, if any.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        let head = bytes.get(..SIGNATURE_LEN)?;
        Self::ALL.into_iter().find(|sig| sig.magic() == head)
    }
}

/// Scanner locating the start of the embedded font inside a wrapped container.
#[derive(Debug, Clone)]
pub struct SignatureScanner {
    fallback_offset: usize,
}

impl Default for SignatureScanner {
    fn default() -> Self {
        Self {
            fallback_offset: DEFAULT_FALLBACK_OFFSET,
        }
    }
}

impl SignatureScanner {
    /// Create a scanner with the default fallback offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different fallback offset when no signature is present.
    pub fn with_fallback_offset(mut self, offset: usize) -> Self {
        self.fallback_offset = offset;
        self
    }

    /// The configured fallback offset.
    pub fn fallback_offset(&self) -> usize {
        self.fallback_offset
    }

    /// Find the first signature in `buffer`, with its offset.
    ///
    /// Any byte position may match; wrapper padding has no alignment. A
    /// signature must be followed by at least one byte, so a magic number
    /// sitting in the final four bytes is not reported.
    pub fn find(&self, buffer: &[u8]) -> Option<(usize, FontSignature)> {
        buffer
            .windows(SIGNATURE_LEN)
            .enumerate()
            .take(buffer.len().saturating_sub(SIGNATURE_LEN))
            .find_map(|(offset, window)| FontSignature::from_magic(window).map(|sig| (offset, sig)))
    }

    /// Payload offset and the signature found there.
    ///
    /// Without a signature the fallback offset is returned with `None`.
    pub fn scan(&self, buffer: &[u8]) -> (usize, Option<FontSignature>) {
        match self.find(buffer) {
            Some((offset, sig)) => (offset, Some(sig)),
            None => {
                log::debug!(
                    "No font signature in {} bytes, falling back to offset {}",
                    buffer.len(),
                    self.fallback_offset
                );
                (self.fallback_offset, None)
            }
        }
    }

    /// Offset of the first signature, or the fallback offset when there is none.
    pub fn locate(&self, buffer: &[u8]) -> usize {
        self.scan(buffer).0
    }
}

/// Whether `buffer` starts with a recognised font signature.
pub fn has_valid_header(buffer: &[u8]) -> bool {
    FontSignature::from_magic(buffer).is_some()
}
