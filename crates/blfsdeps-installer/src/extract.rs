use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use blfsdeps_core::DepsError;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceArchive {
    /// Any archive the system `tar` can list. `top_level` is the first path
    /// component of the first listed entry, or `None` when that entry is the
    /// archive root itself (`./`).
    Tar { top_level: Option<String> },
    Zip,
}

impl SourceArchive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tar { .. } => "tar",
            Self::Zip => "zip",
        }
    }
}

pub fn inspect_archive(archive_path: &Path) -> Result<SourceArchive> {
    let file = File::open(archive_path)
        .with_context(|| format!("failed to open archive {}", archive_path.display()))?;
    if zip::ZipArchive::new(file).is_ok() {
        return Ok(SourceArchive::Zip);
    }

    let listing = Command::new("tar")
        .arg("-tf")
        .arg(archive_path)
        .output()
        .context("failed to run tar: command failed to start")?;
    if listing.status.success() {
        let stdout = String::from_utf8_lossy(&listing.stdout);
        if let Some(first_entry) = stdout.lines().map(str::trim).find(|line| !line.is_empty()) {
            return Ok(SourceArchive::Tar {
                top_level: first_normal_component(first_entry),
            });
        }
    }

    Err(DepsError::UnsupportedArchiveFormat(archive_path.to_path_buf()).into())
}

fn first_normal_component(entry: &str) -> Option<String> {
    Path::new(entry)
        .components()
        .find_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
}

/// Unpacks `archive_path` under `destination` and returns the directory the
/// build continues in: the archive's first entry for tarballs (`destination`
/// itself for flat `./` tarballs), or a directory named after the archive
/// stem for zips.
pub fn extract_source_archive(archive_path: &Path, destination: &Path) -> Result<PathBuf> {
    let archive = inspect_archive(archive_path)?;
    info!(
        archive = %archive_path.display(),
        format = archive.as_str(),
        "extracting source archive"
    );

    let working_dir = match archive {
        SourceArchive::Tar { top_level } => {
            extract_tar(archive_path, destination)?;
            match top_level {
                Some(top_level) => destination.join(top_level),
                None => destination.to_path_buf(),
            }
        }
        SourceArchive::Zip => {
            let stem = archive_path
                .file_stem()
                .filter(|stem| !stem.is_empty())
                .ok_or_else(|| {
                    anyhow!(
                        "failed to derive a directory name from {}",
                        archive_path.display()
                    )
                })?;
            let target = destination.join(stem);
            extract_zip(archive_path, &target)?;
            target
        }
    };

    debug!(path = %working_dir.display(), "build directory");
    Ok(working_dir)
}

fn extract_tar(archive_path: &Path, destination: &Path) -> Result<()> {
    run_command(
        Command::new("tar")
            .arg("-xf")
            .arg(archive_path)
            .arg("-C")
            .arg(destination),
        "failed to extract tar archive",
    )
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination)
        .with_context(|| format!("failed to create {}", destination.display()))?;
    let file = File::open(archive_path)
        .with_context(|| format!("failed to open archive {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("invalid zip archive {}", archive_path.display()))?;
    archive
        .extract(destination)
        .with_context(|| format!("failed to extract zip archive {}", archive_path.display()))
}

fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(anyhow!(
        "{context_message}: status={} stderr='{}'",
        output.status,
        stderr.trim()
    ))
}
