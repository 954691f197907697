//! Error types for PowerPoint font extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting and converting embedded fonts.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file, or to create a directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be opened as a ZIP archive.
    #[error("Invalid archive {}: {}", .path.display(), .reason)]
    InvalidArchive { path: PathBuf, reason: String },

    /// The presentation descriptor or its relationship index is absent or unreadable.
    #[error("Missing or unreadable descriptor '{0}'")]
    MissingDescriptor(String),

    /// No font payload could be sliced out of a wrapped container.
    #[error("No font payload found in {len}-byte container")]
    NoSignatureFound { len: usize },

    /// ZIP entry error (for PPTX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    Xml(String),
}

impl Error {
    /// Attach a path to an I/O failure so per-file log lines say which file broke.
    pub fn io_at(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        Error::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    }
}
