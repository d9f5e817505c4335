use anyhow::{Context, Result};
use blfsdeps_installer::InstallPrompt;
use dialoguer::Confirm;

use crate::render::{print_lines, render_section_header, OutputStyle};

/// Asks on the controlling terminal before each install command.
pub(crate) struct TerminalPrompt {
    assume_yes: bool,
    style: OutputStyle,
}

impl TerminalPrompt {
    pub(crate) fn new(assume_yes: bool, style: OutputStyle) -> Self {
        Self { assume_yes, style }
    }
}

impl InstallPrompt for TerminalPrompt {
    fn show_kernel_config_notes(&mut self, package: &str, notes: &[String]) {
        println!(
            "{}",
            render_section_header(self.style, &format!("kernel configuration for {package}"))
        );
        print_lines(notes);
    }

    fn confirm_command(&mut self, package: &str, command: &str) -> Result<bool> {
        if self.assume_yes {
            println!("{command}");
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(format!("Should I run \"{command}\"?"))
            .default(false)
            .interact()
            .with_context(|| format!("failed to read confirmation for {package}"))
    }
}
