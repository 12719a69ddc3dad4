//! Module wiring: builds the services from configuration

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::DesktopStateApi;
use crate::domain::repository::{ExtensionInventory, ExtensionManager, SettingsStore};
use crate::domain::{ExtensionService, Service, ShellListKeys};
use crate::infra::extensions::{ExtensionDirectories, GnomeExtensionsCli};
use crate::infra::gsettings::GsettingsCli;
use std::sync::Arc;

/// Desktop state module
pub struct DesktopStateModule {
    config: Config,
    service: Arc<Service>,
    extensions: Arc<ExtensionService>,
}

impl DesktopStateModule {
    /// Wire the production collaborators named by the configuration
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn SettingsStore> =
            Arc::new(GsettingsCli::new(config.gsettings_executable.clone()));
        let manager: Arc<dyn ExtensionManager> =
            Arc::new(GnomeExtensionsCli::new(config.extension_executable.clone()));
        let inventory: Arc<dyn ExtensionInventory> =
            Arc::new(ExtensionDirectories::new(&config.extension_dirs));

        Self::with_collaborators(config, store, manager, inventory)
    }

    /// Wire arbitrary collaborators, e.g. in-memory doubles
    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn SettingsStore>,
        manager: Arc<dyn ExtensionManager>,
        inventory: Arc<dyn ExtensionInventory>,
    ) -> Self {
        let lists = ShellListKeys {
            schema: config.shell_schema.clone(),
            enabled_key: config.enabled_extensions_key.clone(),
            disabled_key: config.disabled_extensions_key.clone(),
        };

        let service = Arc::new(Service::new(store));
        let extensions = Arc::new(ExtensionService::new(
            service.clone(),
            manager,
            inventory,
            lists,
        ));

        tracing::debug!(?config, "desktop state module initialized");

        Self {
            config,
            service,
            extensions,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn extensions(&self) -> Arc<ExtensionService> {
        self.extensions.clone()
    }

    /// In-process client over both services
    pub fn client(&self) -> Arc<dyn DesktopStateApi> {
        Arc::new(NativeClient::new(
            self.service.clone(),
            self.extensions.clone(),
        ))
    }
}
