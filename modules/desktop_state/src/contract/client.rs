//! Native client trait for inter-module communication
//!
//! This trait defines the API that callers use to reconcile desktop state.
//! NO transport - direct function calls.

use super::{
    error::{DesktopError, ExtensionFailure},
    model::{ExtensionReport, ExtensionRequest, KeyOutcome, SetValueRequest, SettingsKeyRef, Value},
};
use async_trait::async_trait;

/// Desktop state API
#[async_trait]
pub trait DesktopStateApi: Send + Sync {
    // ===== Settings Operations =====

    /// Read the current value of a settings key
    async fn get_value(&self, key: &SettingsKeyRef) -> Result<Value, DesktopError>;

    /// Reconcile a settings key with the desired value
    async fn set_value(&self, request: SetValueRequest) -> Result<KeyOutcome, DesktopError>;

    // ===== Extension Operations =====

    /// Reconcile the installed/enabled state of a shell extension
    async fn reconcile_extension(
        &self,
        request: ExtensionRequest,
    ) -> Result<ExtensionReport, ExtensionFailure>;
}
