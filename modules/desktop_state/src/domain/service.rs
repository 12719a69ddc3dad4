//! Domain service - key reconciliation orchestration

use super::coercion::coerce;
use super::repository::SettingsStore;
use super::validation::validate_schema_path;
use super::variant::TypedVariant;
use crate::contract::{DesktopError, KeyOutcome, SetValueRequest, SettingsKeyRef, Value};
use std::sync::Arc;

/// Domain service for settings keys
///
/// Holds no state between calls: every operation resolves the key and reads
/// the stored value afresh, since other agents may change the store between
/// runs.
pub struct Service {
    store: Arc<dyn SettingsStore>,
}

impl Service {
    /// Create a new service instance
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Validate path syntax, schema existence and key existence
    pub async fn resolve_key(&self, key: &SettingsKeyRef) -> Result<(), DesktopError> {
        if let Some(path) = &key.path {
            validate_schema_path(path)?;
        }

        let keys = self
            .store
            .list_keys(&key.schema, key.path.as_deref())
            .await
            .map_err(|e| DesktopError::store("list keys", e))?
            .ok_or_else(|| DesktopError::SchemaNotFound {
                schema: key.schema.clone(),
            })?;

        if !keys.iter().any(|k| k == &key.key) {
            return Err(DesktopError::KeyNotFound {
                schema: key.schema.clone(),
                key: key.key.clone(),
            });
        }

        Ok(())
    }

    /// Read the current value of a key
    pub async fn get_value(&self, key: &SettingsKeyRef) -> Result<TypedVariant, DesktopError> {
        self.resolve_key(key).await?;
        self.read(key).await
    }

    /// Bring a key to the requested value
    pub async fn set_value(&self, request: SetValueRequest) -> Result<KeyOutcome, DesktopError> {
        let SetValueRequest {
            key,
            value,
            check_mode,
        } = request;

        self.reconcile(&key, coerce(value), check_mode).await
    }

    /// Bring a key to an already-native value, skipping coercion
    pub async fn reconcile(
        &self,
        key: &SettingsKeyRef,
        value: Value,
        check_mode: bool,
    ) -> Result<KeyOutcome, DesktopError> {
        let current = self.get_value(key).await?;
        let target = TypedVariant::build(value, current.signature())?;

        if target.value() == current.value() {
            tracing::debug!(key = %key, "value already up to date");
            return Ok(KeyOutcome {
                changed: false,
                previous: current.value().clone(),
                value: current.into_value(),
            });
        }

        if check_mode {
            tracing::info!(key = %key, "check mode: value would change");
            return Ok(KeyOutcome {
                changed: true,
                previous: current.into_value(),
                value: target.into_value(),
            });
        }

        let writable = self
            .store
            .is_writable(key)
            .await
            .map_err(|e| DesktopError::store("check writability", e))?;
        if !writable {
            return Err(DesktopError::NotWritable {
                key: key.to_string(),
            });
        }

        let written = self
            .store
            .write(key, &target)
            .await
            .map_err(|e| DesktopError::store("write value", e))?;
        if !written {
            return Err(DesktopError::WriteRejected {
                key: key.to_string(),
                value: target.value().to_string(),
            });
        }

        self.store
            .sync()
            .await
            .map_err(|e| DesktopError::store("sync settings", e))?;

        tracing::info!(key = %key, signature = %target.signature(), "value written");

        Ok(KeyOutcome {
            changed: true,
            previous: current.into_value(),
            value: target.into_value(),
        })
    }

    async fn read(&self, key: &SettingsKeyRef) -> Result<TypedVariant, DesktopError> {
        self.store
            .read(key)
            .await
            .map_err(|e| DesktopError::store("read value", e))
    }
}
