//! Desktop State Module
//!
//! Declarative reconciliation of GNOME desktop state: typed GSettings keys
//! and GNOME Shell extensions. Callers state the desired value; the module
//! reads the live state, coerces and type-checks the request against the
//! key's stored signature, and writes only when something differs.

// Public exports
pub mod contract;
pub use contract::{
    DesktopError, DesktopStateApi, ExtensionFailure, ExtensionReport, ExtensionRequest,
    KeyOutcome, Operation, Presence, SetValueRequest, SettingsKeyRef, Value, ValueKind,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::DesktopStateModule;

// Internal layers, public for integration tests
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
