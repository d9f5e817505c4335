use std::path::PathBuf;

use anyhow::Result;
use blfsdeps_core::{DependencyTier, PackageDatabase, DEFAULT_SOURCE_EXTENSIONS};
use blfsdeps_resolver::resolve_dependencies;
use tracing::{debug, info, warn};

use crate::execute::{track_directory, CommandRunner};
use crate::extract::extract_source_archive;
use crate::fetch::{fetch_sources, FetchReport, SourceDownloader};
use crate::layout::StagingLayout;
use crate::prompt::InstallPrompt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub package: String,
    /// Tracked directory after the last command.
    pub working_dir: PathBuf,
    pub executed: Vec<String>,
    pub declined: Vec<String>,
    /// Commands that ran but exited unsuccessfully.
    pub failed: Vec<String>,
}

/// Fetches, unpacks and builds packages from a read-only database.
///
/// The build directory is tracked explicitly and handed to the command
/// runner; the process working directory is left alone.
pub struct Installer<'db, D, R, P> {
    database: &'db PackageDatabase,
    layout: StagingLayout,
    extensions: Vec<String>,
    downloader: D,
    runner: R,
    prompt: P,
}

impl<'db, D, R, P> Installer<'db, D, R, P>
where
    D: SourceDownloader,
    R: CommandRunner,
    P: InstallPrompt,
{
    pub fn new(
        database: &'db PackageDatabase,
        layout: StagingLayout,
        downloader: D,
        runner: R,
        prompt: P,
    ) -> Self {
        Self {
            database,
            layout,
            extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|extension| extension.to_string())
                .collect(),
            downloader,
            runner,
            prompt,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    #[cfg(test)]
    pub(crate) fn downloader(&self) -> &D {
        &self.downloader
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    #[cfg(test)]
    pub(crate) fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn fetch<I, S>(&self, packages: I) -> Result<FetchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        fetch_sources(
            self.database,
            &self.layout,
            packages,
            &self.extensions,
            &self.downloader,
        )
    }

    /// Fetches, extracts and builds one package, asking before every command.
    pub fn install_package(&mut self, name: &str) -> Result<InstallReport> {
        let database = self.database;
        let record = database.require(name)?;
        self.fetch([name])?;

        let mut working_dir = match record.primary_source() {
            Some(url) => {
                let archive_path = self.layout.source_path(url)?;
                extract_source_archive(&archive_path, self.layout.root())?
            }
            None => {
                debug!(
                    package = name,
                    "no source archive declared; building in staging directory"
                );
                self.layout.root().to_path_buf()
            }
        };

        let notes = record.kernel_config_notes();
        if !notes.is_empty() {
            self.prompt.show_kernel_config_notes(name, notes);
        }

        let mut report = InstallReport {
            package: name.to_string(),
            working_dir: working_dir.clone(),
            executed: Vec::new(),
            declined: Vec::new(),
            failed: Vec::new(),
        };

        for command in &record.install_commands {
            if !self.prompt.confirm_command(name, command)? {
                info!(package = name, command = %command, "skipping declined command");
                report.declined.push(command.clone());
                continue;
            }

            info!(
                package = name,
                command = %command,
                dir = %working_dir.display(),
                "running"
            );
            let outcome = self.runner.run(command, &working_dir)?;
            if outcome.success() {
                report.executed.push(command.clone());
            } else {
                warn!(
                    package = name,
                    command = %command,
                    exit_code = ?outcome.exit_code,
                    "command exited unsuccessfully; continuing"
                );
                report.failed.push(command.clone());
            }

            let next_dir = track_directory(&working_dir, command);
            if next_dir != working_dir {
                debug!(
                    from = %working_dir.display(),
                    to = %next_dir.display(),
                    "changing build directory"
                );
                working_dir = next_dir;
            }
        }

        report.working_dir = working_dir;
        Ok(report)
    }

    /// Installs `root` and everything it needs at `tier`, leaves first.
    ///
    /// Dependencies missing from the database are skipped with a warning; any
    /// other failure stops the run.
    pub fn install_with_dependencies(
        &mut self,
        root: &str,
        tier: DependencyTier,
    ) -> Result<Vec<InstallReport>> {
        let resolved = resolve_dependencies(self.database, root, tier)?;
        let mut reports = Vec::with_capacity(resolved.discovery_order.len());
        for package in resolved.install_order() {
            if resolved.dangling.contains(&package) {
                warn!(package = %package, "not in the package database; skipping install");
                continue;
            }
            reports.push(self.install_package(&package)?);
        }
        Ok(reports)
    }
}
