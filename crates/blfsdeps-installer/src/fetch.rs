use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blfsdeps_core::{has_recognized_extension, DepsError, PackageDatabase, PackageRecord};
use blfsdeps_security::{verify_checksum_file, ChecksumVerdict};
use tracing::{debug, info, warn};

use crate::fs_utils::remove_file_if_exists;
use crate::layout::StagingLayout;

/// Network seam for source downloads.
pub trait SourceDownloader {
    /// Writes the body behind `url` to `destination`, replacing any existing file.
    fn download(&self, url: &str, destination: &Path) -> Result<()>;
}

impl<T: SourceDownloader + ?Sized> SourceDownloader for &T {
    fn download(&self, url: &str, destination: &Path) -> Result<()> {
        (**self).download(url, destination)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub downloaded: Vec<PathBuf>,
    pub cached: Vec<PathBuf>,
    pub ignored_urls: Vec<String>,
    pub unknown_packages: Vec<String>,
}

impl FetchReport {
    pub fn merge(&mut self, other: FetchReport) {
        self.downloaded.extend(other.downloaded);
        self.cached.extend(other.cached);
        self.ignored_urls.extend(other.ignored_urls);
        self.unknown_packages.extend(other.unknown_packages);
    }
}

/// Stages the sources of `packages` in the staging directory.
///
/// Unknown package names are reported and skipped. A package without any
/// declared hash, a checksum mismatch, or a failed download aborts the fetch.
pub fn fetch_sources<I, S, E, D>(
    db: &PackageDatabase,
    layout: &StagingLayout,
    packages: I,
    extensions: &[E],
    downloader: &D,
) -> Result<FetchReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    E: AsRef<str>,
    D: SourceDownloader + ?Sized,
{
    layout.ensure_exists()?;

    let mut report = FetchReport::default();
    for package in packages {
        let package = package.as_ref();
        let Some(record) = db.get(package) else {
            warn!(package, "no such package in the package database; skipping");
            report.unknown_packages.push(package.to_string());
            continue;
        };
        let package_report = fetch_package(package, record, layout, extensions, downloader)?;
        report.merge(package_report);
    }
    Ok(report)
}

fn fetch_package<E, D>(
    package: &str,
    record: &PackageRecord,
    layout: &StagingLayout,
    extensions: &[E],
    downloader: &D,
) -> Result<FetchReport>
where
    E: AsRef<str>,
    D: SourceDownloader + ?Sized,
{
    let mut report = FetchReport::default();
    for (index, url) in record.source_urls.iter().enumerate() {
        if !has_recognized_extension(url, extensions) {
            debug!(package, url = %url, "ignoring source without a recognized extension");
            report.ignored_urls.push(url.clone());
            continue;
        }
        if !record.has_integrity_data() {
            return Err(DepsError::MissingIntegrityData {
                package: package.to_string(),
                url: url.clone(),
            }
            .into());
        }

        let destination = layout.source_path(url)?;
        if destination.exists() {
            debug!(package, path = %destination.display(), "source already downloaded");
            report.cached.push(destination);
            continue;
        }

        info!(package, url = %url, "downloading");
        download_to(downloader, layout, url, &destination)?;

        match record.hash_for(index) {
            Some(expected) => verify_download(&destination, expected)?,
            None => debug!(package, url = %url, "no checksum declared for this source"),
        }
        report.downloaded.push(destination);
    }
    Ok(report)
}

fn download_to<D>(
    downloader: &D,
    layout: &StagingLayout,
    url: &str,
    destination: &Path,
) -> Result<()>
where
    D: SourceDownloader + ?Sized,
{
    let part_path = layout.partial_path(url)?;
    if let Err(err) = downloader.download(url, &part_path) {
        let _ = remove_file_if_exists(&part_path);
        return Err(err).with_context(|| format!("failed to download {url}"));
    }
    fs::rename(&part_path, destination).with_context(|| {
        format!(
            "failed to move downloaded source into place: {}",
            destination.display()
        )
    })
}

fn verify_download(path: &Path, expected: &str) -> Result<()> {
    match verify_checksum_file(path, expected)? {
        ChecksumVerdict::Match => {
            debug!(path = %path.display(), "checksum verified");
            Ok(())
        }
        ChecksumVerdict::Mismatch { actual } => {
            remove_file_if_exists(path)
                .with_context(|| format!("failed to remove corrupt download {}", path.display()))?;
            Err(DepsError::HashMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            }
            .into())
        }
    }
}
