use anyhow::Result;

/// Operator interaction during an install.
pub trait InstallPrompt {
    /// Kernel configuration hints, shown before any command runs.
    fn show_kernel_config_notes(&mut self, package: &str, notes: &[String]);

    /// Yes/no gate in front of every install command.
    fn confirm_command(&mut self, package: &str, command: &str) -> Result<bool>;
}
