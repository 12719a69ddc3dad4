//! Domain layer - business logic and services

pub mod coercion;
pub mod extension;
pub mod repository;
pub mod service;
pub mod signature;
pub mod validation;
pub mod variant;

pub use coercion::coerce;
pub use extension::{ExtensionService, ShellListKeys};
pub use repository::{CommandOutput, ExtensionCommand, ExtensionInventory, ExtensionManager, SettingsStore};
pub use service::Service;
pub use signature::{ScalarKind, Signature};
pub use variant::TypedVariant;
