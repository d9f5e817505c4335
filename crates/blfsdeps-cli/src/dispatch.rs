use std::io;

use anyhow::Result;
use blfsdeps_core::{DependencyTier, PackageDatabase};
use blfsdeps_installer::{fetch_sources, Installer, ShellCommandRunner, StagingLayout};
use blfsdeps_resolver::resolve_dependencies;
use tracing::{debug, info, warn};

use crate::completion::write_completions_script;
use crate::config::Config;
use crate::download::HttpDownloader;
use crate::prompt::TerminalPrompt;
use crate::render::{
    current_output_style, format_command_listing, format_fetch_report_lines,
    format_install_order_lines, format_install_report_lines, print_lines, render_section_header,
    OutputStyle,
};
use crate::{Cli, Commands};

struct Session {
    config: Config,
    database: PackageDatabase,
    style: OutputStyle,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?
            .with_overrides(cli.database.clone(), cli.staging_dir.clone());
        debug!(
            database = %config.database.display(),
            staging_dir = %config.staging_dir.display(),
            "configuration resolved"
        );
        let database = PackageDatabase::load(&config.database)?;
        if database.is_empty() {
            warn!(path = %config.database.display(), "package database is empty");
        }
        info!(packages = database.len(), "package database loaded");
        Ok(Self {
            config,
            database,
            style: current_output_style(),
        })
    }

    fn layout(&self) -> StagingLayout {
        StagingLayout::new(self.config.staging_dir.clone())
    }

    fn installer(
        &self,
        assume_yes: bool,
    ) -> Result<Installer<'_, HttpDownloader, ShellCommandRunner, TerminalPrompt>> {
        Ok(Installer::new(
            &self.database,
            self.layout(),
            HttpDownloader::new(self.style)?,
            ShellCommandRunner::default(),
            TerminalPrompt::new(assume_yes, self.style),
        )
        .with_extensions(self.config.extensions.clone()))
    }
}

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        return write_completions_script(*shell, &mut io::stdout());
    }

    let session = Session::open(&cli)?;
    match cli.command {
        Commands::List { package, tiers } => list(&session, &package, tiers.tier()),
        Commands::ListCommands { package } => list_commands(&session, &package),
        Commands::Download { package, tiers } => download(&session, &package, tiers.tier()),
        Commands::DownloadAll => download_all(&session),
        Commands::Build { package, yes } => build(&session, &package, yes),
        Commands::Everything {
            package,
            tiers,
            yes,
        } => everything(&session, &package, tiers.tier(), yes),
        Commands::Completions { .. } => Ok(()),
    }
}

fn list(session: &Session, package: &str, tier: DependencyTier) -> Result<()> {
    let resolved = resolve_dependencies(&session.database, package, tier)?;
    println!(
        "{}",
        render_section_header(
            session.style,
            &format!("{package} ({} dependencies, install order)", tier.as_str())
        )
    );
    print_lines(&format_install_order_lines(&resolved, session.style));
    Ok(())
}

fn list_commands(session: &Session, package: &str) -> Result<()> {
    let record = session.database.require(package)?;
    print_lines(&format_command_listing(package, record, session.style));
    Ok(())
}

fn download(session: &Session, package: &str, tier: DependencyTier) -> Result<()> {
    let resolved = resolve_dependencies(&session.database, package, tier)?;
    let downloader = HttpDownloader::new(session.style)?;
    let report = fetch_sources(
        &session.database,
        &session.layout(),
        &resolved.discovery_order,
        &session.config.extensions,
        &downloader,
    )?;
    print_lines(&format_fetch_report_lines(&report, session.style));
    Ok(())
}

fn download_all(session: &Session) -> Result<()> {
    let downloader = HttpDownloader::new(session.style)?;
    let report = fetch_sources(
        &session.database,
        &session.layout(),
        session.database.names(),
        &session.config.extensions,
        &downloader,
    )?;
    print_lines(&format_fetch_report_lines(&report, session.style));
    Ok(())
}

fn build(session: &Session, package: &str, assume_yes: bool) -> Result<()> {
    let mut installer = session.installer(assume_yes)?;
    let report = installer.install_package(package)?;
    print_lines(&format_install_report_lines(&report, session.style));
    Ok(())
}

fn everything(
    session: &Session,
    package: &str,
    tier: DependencyTier,
    assume_yes: bool,
) -> Result<()> {
    let mut installer = session.installer(assume_yes)?;
    let reports = installer.install_with_dependencies(package, tier)?;
    for report in &reports {
        print_lines(&format_install_report_lines(report, session.style));
    }
    Ok(())
}
