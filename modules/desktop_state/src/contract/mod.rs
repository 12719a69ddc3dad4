//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::DesktopStateApi;
pub use error::{DesktopError, ExtensionFailure};
pub use model::{
    ExtensionReport, ExtensionRequest, ExtensionState, KeyOutcome, Operation, Presence,
    SetValueRequest, SettingsKeyRef, Value, ValueKind,
};
