//! Extension manager backed by the `gnome-extensions` executable

use crate::domain::repository::{CommandOutput, ExtensionCommand, ExtensionManager};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct GnomeExtensionsCli {
    executable: PathBuf,
}

impl GnomeExtensionsCli {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

#[async_trait]
impl ExtensionManager for GnomeExtensionsCli {
    async fn run(&self, command: &ExtensionCommand) -> Result<CommandOutput> {
        let args = command.args();
        tracing::debug!(executable = %self.executable.display(), ?args, "spawning extension manager");

        let output = tokio::process::Command::new(&self.executable)
            .args(&args)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.executable.display()))?;

        Ok(CommandOutput {
            // Killed by a signal
            rc: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
