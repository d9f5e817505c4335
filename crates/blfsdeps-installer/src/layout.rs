use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use blfsdeps_core::{source_file_name, DepsError};
use tracing::{debug, info};

pub const DEFAULT_STAGING_DIR: &str = "/blfs_sources";

/// The staging directory: download cache and root of every build tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    root: PathBuf,
}

impl StagingLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the source behind `url` lives once fetched.
    pub fn source_path(&self, url: &str) -> Result<PathBuf> {
        Ok(self.root.join(source_file_name(url)?))
    }

    pub fn partial_path(&self, url: &str) -> Result<PathBuf> {
        Ok(self.root.join(format!("{}.part", source_file_name(url)?)))
    }

    pub fn ensure_exists(&self) -> Result<()> {
        if self.root.is_dir() {
            debug!(path = %self.root.display(), "using existing staging directory");
            return Ok(());
        }

        info!(path = %self.root.display(), "creating staging directory");
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder
            .create(&self.root)
            .map_err(|source| DepsError::DirectoryCreationFailure {
                path: self.root.clone(),
                source,
            })?;
        Ok(())
    }
}
