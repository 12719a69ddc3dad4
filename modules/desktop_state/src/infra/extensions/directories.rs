//! Installed extensions discovered from the shell's extension directories

use crate::domain::repository::ExtensionInventory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// System-wide and per-user install locations
pub const DEFAULT_EXTENSION_DIRS: &[&str] = &[
    "/usr/share/gnome-shell/extensions/",
    "~/.local/share/gnome-shell/extensions/",
];

/// Each subdirectory of a configured directory is one installed extension,
/// named by its uuid.
pub struct ExtensionDirectories {
    dirs: Vec<PathBuf>,
}

impl ExtensionDirectories {
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            dirs: dirs.into_iter().map(|d| expand_home(d.as_ref())).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    async fn scan(dir: &Path, found: &mut Vec<String>) -> Result<()> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "extension directory does not exist");
                return Ok(());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", dir.display()));
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("cannot read {}", dir.display()))?
        {
            // Follows symlinks; dangling links are skipped
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if is_dir {
                found.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(())
    }
}

impl Default for ExtensionDirectories {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION_DIRS)
    }
}

/// Expand a leading `~/` to the current user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    }
}

#[async_trait]
impl ExtensionInventory for ExtensionDirectories {
    async fn installed(&self) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for dir in &self.dirs {
            Self::scan(dir, &mut found).await?;
        }
        tracing::trace!(count = found.len(), "installed extensions");
        Ok(found)
    }
}
