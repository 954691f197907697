//! Output filenames and upload names for extracted fonts.
//!
//! Typeface names travel through the filesystem: a space is written as
//! [`SEPARATOR_TOKEN`] when the file is created and turned back into a space
//! when the file is handed to an upload sink.

use std::path::Path;

/// Stands in for a space in output filenames.
pub const SEPARATOR_TOKEN: &str = "___";

/// Extension for raw resources extracted from a package.
pub const RESOURCE_EXTENSION: &str = "fntData";

/// Extension for recovered standard fonts.
pub const FONT_EXTENSION: &str = "ttf";

/// Extensions (lowercase) of wrapped font containers we know how to unwrap.
pub const WRAPPED_FONT_EXTENSIONS: &[&str] = &["fntdata", "eot"];

/// Escape a typeface name for use as a file stem.
///
/// Every space becomes [`SEPARATOR_TOKEN`], leading and trailing ones
/// included, so [`unescape_typeface`] gives the name back. Path separators and other characters
/// that cannot appear in a filename are replaced with `_`; that part is not
/// reversible.
pub fn escape_typeface(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c => c,
        })
        .collect::<String>()
        .replace(' ', SEPARATOR_TOKEN)
}

/// Reverse [`escape_typeface`]'s space substitution.
pub fn unescape_typeface(stem: &str) -> String {
    stem.replace(SEPARATOR_TOKEN, " ")
}

/// Whether `path` has one of the wrapped font extensions.
pub fn is_wrapped_font(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_lowercase();
            WRAPPED_FONT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// File name for a recovered font: the source stem with the font extension.
pub fn recovered_file_name(src: &Path) -> String {
    let stem = src.file_stem().and_then(|s| s.to_str()).unwrap_or("font");
    format!("{}.{}", stem, FONT_EXTENSION)
}

/// Logical name handed to an upload sink for a file on disk.
///
/// The stem is unescaped and prefixed with `prefix` (which may be empty).
pub fn upload_name(path: &Path, prefix: &str) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    format!("{}{}", prefix, unescape_typeface(stem))
}
