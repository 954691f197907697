//! Handing finished font files to an upload destination.

use crate::naming::upload_name;
use crate::types::PackageReport;
use std::path::Path;

/// Destination for finished font files.
pub trait ArtifactSink {
    /// Error returned by a failed upload.
    type Error: std::fmt::Display;

    /// Upload the file at `path` under `name`.
    fn upload(&self, path: &Path, name: &str) -> Result<(), Self::Error>;
}

/// Upload a single file, logging the outcome. Returns whether it succeeded.
pub fn upload_file<S: ArtifactSink>(sink: &S, path: &Path, prefix: &str) -> bool {
    let name = upload_name(path, prefix);
    match std::fs::metadata(path) {
        Ok(meta) => log::info!("Uploading {} ({} bytes) as '{}'", path.display(), meta.len(), name),
        Err(e) => {
            log::error!("Cannot upload {}: {}", path.display(), e);
            return false;
        }
    }

    match sink.upload(path, &name) {
        Ok(()) => {
            log::info!("Uploaded '{}'", name);
            true
        }
        Err(e) => {
            log::error!("Upload of '{}' failed: {}", name, e);
            false
        }
    }
}

/// Upload everything a package produced.
///
/// Raw resources are named with `raw_prefix`; recovered fonts are named
/// after their typeface alone. Failures are logged and do not stop the
/// remaining uploads. Returns the number of successful uploads.
pub fn upload_package<S: ArtifactSink>(
    sink: &S,
    report: &PackageReport,
    raw_prefix: &str,
) -> usize {
    let raw = report
        .extracted
        .iter()
        .filter(|f| upload_file(sink, &f.path, raw_prefix))
        .count();
    let recovered = report
        .recovered
        .iter()
        .filter(|f| upload_file(sink, &f.path, ""))
        .count();
    raw + recovered
}
