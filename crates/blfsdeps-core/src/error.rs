use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures with a meaning of their own.
///
/// Operations return `anyhow::Result`; callers that need to tell these apart
/// recover them with `downcast_ref::<DepsError>()`.
#[derive(Debug, Error)]
pub enum DepsError {
    #[error("no package named '{0}' in the package database")]
    UnknownPackage(String),

    #[error("package '{package}' declares no hashes; refusing to download unverifiable source {url}")]
    MissingIntegrityData { package: String, url: String },

    #[error("checksum mismatch for {} (expected {expected}, got {actual})", .path.display())]
    HashMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("unsupported archive format: {}", .0.display())]
    UnsupportedArchiveFormat(PathBuf),

    #[error("failed to create staging directory {}", .path.display())]
    DirectoryCreationFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("package database not found: {}", .0.display())]
    MissingDatabase(PathBuf),
}
