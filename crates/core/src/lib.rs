//! Core types, font signature scanning, and wrapped-font unwrapping
//! for extracting fonts embedded in PowerPoint files.

pub mod convert;
pub mod error;
pub mod naming;
pub mod signature;
pub mod sink;
pub mod types;
pub mod unwrap;

pub use convert::{Conversion, FontConverter};
pub use error::{Error, Result};
pub use signature::{has_valid_header, FontSignature, SignatureScanner, DEFAULT_FALLBACK_OFFSET};
pub use sink::{upload_package, ArtifactSink};
pub use types::{BatchReport, ExtractedFont, FileFailure, PackageReport, RecoveredFont};
pub use unwrap::{ContainerUnwrapper, Unwrapped};
