//! Native client implementation - wraps domain services for in-process calls

use crate::contract::{
    DesktopError, DesktopStateApi, ExtensionFailure, ExtensionReport, ExtensionRequest,
    KeyOutcome, SetValueRequest, SettingsKeyRef, Value,
};
use crate::domain::{ExtensionService, Service};
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain services
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
    extensions: Arc<ExtensionService>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>, extensions: Arc<ExtensionService>) -> Self {
        Self {
            service,
            extensions,
        }
    }
}

#[async_trait]
impl DesktopStateApi for NativeClient {
    async fn get_value(&self, key: &SettingsKeyRef) -> Result<Value, DesktopError> {
        self.service
            .get_value(key)
            .await
            .map(|variant| variant.into_value())
    }

    async fn set_value(&self, request: SetValueRequest) -> Result<KeyOutcome, DesktopError> {
        self.service.set_value(request).await
    }

    async fn reconcile_extension(
        &self,
        request: ExtensionRequest,
    ) -> Result<ExtensionReport, ExtensionFailure> {
        self.extensions.reconcile(request).await
    }
}
