use std::path::{Component, Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    pub fn success(self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs one install command. Implementations must not change the process
/// working directory; `working_dir` is where the command runs.
pub trait CommandRunner {
    fn run(&mut self, command: &str, working_dir: &Path) -> Result<CommandOutcome>;
}

/// Hands commands verbatim to `/bin/sh -c`, inheriting stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommandRunner {
    shell: PathBuf,
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self::new("/bin/sh")
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&mut self, command: &str, working_dir: &Path) -> Result<CommandOutcome> {
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(working_dir)
            .status()
            .with_context(|| {
                format!(
                    "failed to start '{}' in {}",
                    command,
                    working_dir.display()
                )
            })?;
        Ok(CommandOutcome {
            exit_code: status.code(),
        })
    }
}

/// Operand of the first `cd` token in `command`, if any.
pub fn cd_target(command: &str) -> Option<&str> {
    let mut tokens = command.split_whitespace();
    tokens.by_ref().find(|token| *token == "cd")?;
    tokens.next()
}

/// Directory a command leaves the build in, given the one it ran in.
///
/// Only the first `cd` is honoured. Relative targets resolve against
/// `current`, and `..` is folded lexically like the shell's logical `cd`.
pub fn track_directory(current: &Path, command: &str) -> PathBuf {
    match cd_target(command) {
        Some(target) => normalize_lexically(&current.join(target)),
        None => current.to_path_buf(),
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
