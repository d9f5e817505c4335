use std::path::PathBuf;

use anyhow::Result;
use blfsdeps_core::DependencyTier;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod completion;
mod config;
mod dispatch;
mod download;
mod prompt;
mod render;

/// List, download, and build BLFS packages along with their dependencies.
/// Package names are case sensitive.
#[derive(Parser, Debug)]
#[command(name = "blfsdeps")]
#[command(version, long_about = None)]
struct Cli {
    /// Package database (BLFS dependencies.json)
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,
    /// Download cache and build root
    #[arg(long, global = true, value_name = "DIR")]
    staging_dir: Option<PathBuf>,
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TierArgs {
    /// Also include recommended dependencies
    #[arg(short, long)]
    recommended: bool,
    /// Also include optional dependencies (implies --recommended)
    #[arg(short, long)]
    optional: bool,
}

impl TierArgs {
    fn tier(self) -> DependencyTier {
        DependencyTier::from_flags(self.recommended, self.optional)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List a package's dependencies in installation order
    List {
        package: String,
        #[command(flatten)]
        tiers: TierArgs,
    },
    /// Show a package's install commands without running them
    #[command(name = "commands")]
    ListCommands { package: String },
    /// Download a package along with its dependencies
    Download {
        package: String,
        #[command(flatten)]
        tiers: TierArgs,
    },
    /// Download the sources of every package in the database
    DownloadAll,
    /// Download, unpack, and build a single package
    Build {
        package: String,
        /// Run every install command without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Build a package after all of its dependencies, leaves first
    Everything {
        package: String,
        #[command(flatten)]
        tiers: TierArgs,
        /// Run every install command without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Print a shell completion script
    Completions { shell: Shell },
}

fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = log_filter(verbose, quiet);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    dispatch::run_cli(cli)
}
