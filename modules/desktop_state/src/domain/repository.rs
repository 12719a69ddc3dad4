//! Collaborator traits for the live desktop
//!
//! These traits define the interface to the settings store, the extension
//! manager and the extension install locations.
//! Implementations are in infra/.

use super::variant::TypedVariant;
use crate::contract::SettingsKeyRef;
use anyhow::Result;
use async_trait::async_trait;

/// Desktop settings store (GSettings)
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// List the keys of a schema, `None` if the schema is not installed
    async fn list_keys(&self, schema: &str, path: Option<&str>) -> Result<Option<Vec<String>>>;

    /// Read the current value together with its type signature
    async fn read(&self, key: &SettingsKeyRef) -> Result<TypedVariant>;

    /// Check whether the key may be written
    async fn is_writable(&self, key: &SettingsKeyRef) -> Result<bool>;

    /// Write a new value, returning false if the store did not take it
    async fn write(&self, key: &SettingsKeyRef, variant: &TypedVariant) -> Result<bool>;

    /// Flush pending writes to the backend
    async fn sync(&self) -> Result<()>;
}

/// Extension-manager invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionCommand {
    Install { src: String, force: bool },
    Uninstall { uuid: String },
}

impl ExtensionCommand {
    /// Operation name reported to the caller
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Install { .. } => "install",
            Self::Uninstall { .. } => "uninstall",
        }
    }

    /// Command-line arguments following the executable
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Install { src, force } => {
                let mut args = vec!["install".to_string(), src.clone()];
                if *force {
                    args.push("--force".to_string());
                }
                args
            }
            Self::Uninstall { uuid } => vec!["uninstall".to_string(), uuid.clone()],
        }
    }
}

/// Captured result of an extension-manager run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Extension manager executable (gnome-extensions)
#[async_trait]
pub trait ExtensionManager: Send + Sync {
    /// Run the command to completion
    async fn run(&self, command: &ExtensionCommand) -> Result<CommandOutput>;
}

/// Installed extensions on disk
#[async_trait]
pub trait ExtensionInventory: Send + Sync {
    /// Uuids of every installed extension, system-wide and per-user
    async fn installed(&self) -> Result<Vec<String>>;
}
