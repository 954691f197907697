//! PPTX (Office Open XML) backend for extracting embedded fonts.
//!
//! A .pptx file is a ZIP archive; embedded fonts live under `ppt/fonts/`
//! and are named through the presentation's relationship graph.

pub mod archive;
pub mod batch;
pub mod extractor;
pub mod relationships;

pub use archive::{FontPackage, FONT_STORAGE_PREFIX};
pub use batch::{scan_directory, BatchProcessor, DirectoryInputs};
pub use extractor::{FontExtractor, CONVERTED_DIR, EXTRACTED_DIR};
pub use relationships::{resolve_typeface_names, RelationshipGraph};
