//! Extension reconciliation
//!
//! Installation goes through the extension manager executable; the enabled
//! state lives in two string lists of the shell schema, written through the
//! key reconciliation service.

use super::repository::{ExtensionCommand, ExtensionInventory, ExtensionManager};
use super::service::Service;
use super::validation::validate_extension_uuid;
use crate::contract::{
    DesktopError, ExtensionFailure, ExtensionReport, ExtensionRequest, ExtensionState, KeyOutcome,
    Operation, Presence, SettingsKeyRef, Value, ValueKind,
};
use std::sync::Arc;

/// Stderr of an install that found the extension already in place
pub const ALREADY_INSTALLED_MARKER: &str = "exists and --force was not specified";

/// Shell keys holding the enabled and disabled extension lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellListKeys {
    pub schema: String,
    pub enabled_key: String,
    pub disabled_key: String,
}

impl Default for ShellListKeys {
    fn default() -> Self {
        Self {
            schema: "org.gnome.shell".to_string(),
            enabled_key: "enabled-extensions".to_string(),
            disabled_key: "disabled-extensions".to_string(),
        }
    }
}

impl ShellListKeys {
    fn enabled(&self) -> SettingsKeyRef {
        SettingsKeyRef::new(self.schema.clone(), None, self.enabled_key.clone())
    }

    fn disabled(&self) -> SettingsKeyRef {
        SettingsKeyRef::new(self.schema.clone(), None, self.disabled_key.clone())
    }
}

/// Domain service for shell extensions
pub struct ExtensionService {
    settings: Arc<Service>,
    manager: Arc<dyn ExtensionManager>,
    inventory: Arc<dyn ExtensionInventory>,
    lists: ShellListKeys,
}

impl ExtensionService {
    pub fn new(
        settings: Arc<Service>,
        manager: Arc<dyn ExtensionManager>,
        inventory: Arc<dyn ExtensionInventory>,
        lists: ShellListKeys,
    ) -> Self {
        Self {
            settings,
            manager,
            inventory,
            lists,
        }
    }

    /// Observe the installed and enabled state of an extension
    pub async fn current_state(&self, uuid: &str) -> Result<ExtensionState, DesktopError> {
        let installed = self
            .inventory
            .installed()
            .await
            .map_err(|e| DesktopError::store("scan extension directories", e))?
            .iter()
            .any(|u| u == uuid);

        let enabled_list = self.read_list(&self.lists.enabled()).await?;
        let disabled_list = self.read_list(&self.lists.disabled()).await?;

        // The disabled list wins when an extension sits in both
        let enabled = if disabled_list.iter().any(|u| u == uuid) {
            Some(false)
        } else if enabled_list.iter().any(|u| u == uuid) {
            Some(true)
        } else {
            None
        };

        Ok(ExtensionState { installed, enabled })
    }

    /// Bring an extension to the requested state
    ///
    /// On failure the returned error carries every operation performed so far.
    pub async fn reconcile(
        &self,
        request: ExtensionRequest,
    ) -> Result<ExtensionReport, ExtensionFailure> {
        validate_extension_uuid(&request.uuid)?;

        let uuid = request.uuid.as_str();
        let desired = ExtensionState {
            installed: request.state == Presence::Present,
            enabled: request.enabled,
        };
        let mut current = self.current_state(uuid).await?;
        let mut report = ExtensionReport::default();

        tracing::debug!(uuid, ?current, ?desired, "extension state");

        if current == desired {
            return Ok(report);
        }

        if current.installed != desired.installed {
            let command = if desired.installed {
                let src = request
                    .src
                    .clone()
                    .ok_or_else(|| ExtensionFailure::new(DesktopError::MissingBundleSource, report.clone()))?;
                ExtensionCommand::Install {
                    src,
                    force: request.force,
                }
            } else {
                ExtensionCommand::Uninstall {
                    uuid: uuid.to_string(),
                }
            };

            if request.check_mode {
                report
                    .operations
                    .insert(command.verb().to_string(), Operation::Planned);
                report.changed = true;
                current.installed = desired.installed;
            } else {
                self.run_command(&command, &mut report).await?;
                current = self
                    .current_state(uuid)
                    .await
                    .map_err(|e| ExtensionFailure::new(e, report.clone()))?;
                if current.installed == desired.installed {
                    report.changed = true;
                }
            }
        }

        let Some(wanted) = desired.enabled else {
            return Ok(report);
        };
        // An uninstalled extension is only flushed from both lists
        let wanted = if current.installed { Some(wanted) } else { None };

        if current.enabled != wanted {
            let operation = enabled_operation_name(wanted);
            if request.check_mode {
                report
                    .operations
                    .insert(operation.to_string(), Operation::Planned);
                report.changed = true;
            } else {
                self.apply_enabled(uuid, wanted, &mut report).await?;

                current = self
                    .current_state(uuid)
                    .await
                    .map_err(|e| ExtensionFailure::new(e, report.clone()))?;
                if current.enabled == wanted {
                    report.changed = true;
                }
            }
        }

        Ok(report)
    }

    async fn run_command(
        &self,
        command: &ExtensionCommand,
        report: &mut ExtensionReport,
    ) -> Result<(), ExtensionFailure> {
        tracing::info!(args = ?command.args(), "running extension manager");

        let output = self.manager.run(command).await.map_err(|e| {
            ExtensionFailure::new(DesktopError::store("run extension manager", e), report.clone())
        })?;

        let has_output = !output.stdout.is_empty() || !output.stderr.is_empty();
        report.operations.insert(
            command.verb().to_string(),
            Operation::Command {
                rc: output.rc,
                stdout: has_output.then(|| output.stdout.clone()),
                stderr: has_output.then(|| output.stderr.clone()),
            },
        );

        if output.rc != 0 {
            if output.stderr.contains(ALREADY_INSTALLED_MARKER) {
                tracing::warn!(rc = output.rc, "extension already installed");
            } else {
                return Err(ExtensionFailure::new(
                    DesktopError::ExtensionExecutableError {
                        stderr: output.stderr,
                    },
                    report.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Rewrite both lists so that `uuid` appears only where `wanted` says
    ///
    /// The operation is recorded as soon as one list write lands, so a failure
    /// on the second list still reports the first.
    async fn apply_enabled(
        &self,
        uuid: &str,
        wanted: Option<bool>,
        report: &mut ExtensionReport,
    ) -> Result<(), ExtensionFailure> {
        let operation = enabled_operation_name(wanted);
        let enabled_key = self.lists.enabled();
        let disabled_key = self.lists.disabled();
        let (mut enabled, mut disabled) = match self.read_lists(&enabled_key, &disabled_key).await {
            Ok(lists) => lists,
            Err(e) => return Err(ExtensionFailure::new(e, report.clone())),
        };

        match wanted {
            Some(true) if !enabled.iter().any(|u| u == uuid) => enabled.push(uuid.to_string()),
            Some(false) if !disabled.iter().any(|u| u == uuid) => disabled.push(uuid.to_string()),
            _ => {}
        }
        if wanted != Some(true) {
            enabled.retain(|u| u != uuid);
        }
        if wanted != Some(false) {
            disabled.retain(|u| u != uuid);
        }

        for (key, items) in [(enabled_key, enabled), (disabled_key, disabled)] {
            let outcome = self
                .write_list(&key, items)
                .await
                .map_err(|e| ExtensionFailure::new(e, report.clone()))?;
            if outcome.changed {
                report
                    .operations
                    .insert(operation.to_string(), Operation::Success);
                report.changed = true;
            }
        }

        report
            .operations
            .insert(operation.to_string(), Operation::Success);
        Ok(())
    }

    async fn read_lists(
        &self,
        enabled_key: &SettingsKeyRef,
        disabled_key: &SettingsKeyRef,
    ) -> Result<(Vec<String>, Vec<String>), DesktopError> {
        Ok((
            self.read_list(enabled_key).await?,
            self.read_list(disabled_key).await?,
        ))
    }

    async fn read_list(&self, key: &SettingsKeyRef) -> Result<Vec<String>, DesktopError> {
        let variant = self.settings.get_value(key).await?;
        let items = variant
            .value()
            .as_array()
            .ok_or(DesktopError::ValueTypeMismatch {
                provided: variant.value().kind(),
                expected: ValueKind::Array,
            })?;

        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(DesktopError::ValueTypeMismatch {
                        provided: item.kind(),
                        expected: ValueKind::String,
                    })
            })
            .collect()
    }

    async fn write_list(
        &self,
        key: &SettingsKeyRef,
        items: Vec<String>,
    ) -> Result<KeyOutcome, DesktopError> {
        let value = Value::Array(items.into_iter().map(Value::Str).collect());
        self.settings.reconcile(key, value, false).await
    }
}

fn enabled_operation_name(wanted: Option<bool>) -> &'static str {
    match wanted {
        Some(true) => "enable",
        Some(false) => "disable",
        None => "flush from enabled/disabled",
    }
}
