mod execute;
mod extract;
mod fetch;
mod fs_utils;
mod install;
mod layout;
mod prompt;

pub use execute::{
    cd_target, track_directory, CommandOutcome, CommandRunner, ShellCommandRunner,
};
pub use extract::{extract_source_archive, inspect_archive, SourceArchive};
pub use fetch::{fetch_sources, FetchReport, SourceDownloader};
pub use install::{InstallReport, Installer};
pub use layout::{StagingLayout, DEFAULT_STAGING_DIR};
pub use prompt::InstallPrompt;
