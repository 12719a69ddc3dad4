//! Contract error types for desktop state reconciliation
//!
//! These errors are transport-agnostic and used for inter-module communication.

use super::model::{ExtensionReport, ValueKind};

/// Desktop state domain errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesktopError {
    /// Schema is not installed
    #[error("Schema '{schema}' does not exist")]
    SchemaNotFound { schema: String },

    /// Key is not declared by the schema
    #[error("Key '{key}' does not exist in schema '{schema}'")]
    KeyNotFound { schema: String, key: String },

    /// Relocatable schema path is malformed
    #[error("Schema path '{path}' is incorrect: a path begins and ends with '/' and has no empty segments")]
    InvalidPath { path: String },

    /// Value shape disagrees with the stored type signature
    #[error("Value type mismatch: provided {provided}, expected {expected}")]
    ValueTypeMismatch {
        provided: ValueKind,
        expected: ValueKind,
    },

    /// Type signature outside the supported vocabulary
    #[error("Unsupported type signature '{signature}'")]
    UnsupportedSignature { signature: String },

    /// Key is locked down in the settings backend
    #[error("Value of '{key}' cannot be changed because it is not writable")]
    NotWritable { key: String },

    /// Store did not take a value that differs from the current one
    #[error("Cannot change value of '{key}' to {value}: check possible values or value type")]
    WriteRejected { key: String, value: String },

    /// Extension manager exited with a non-zero status
    #[error("Gnome Extension Executable Error: {stderr}")]
    ExtensionExecutableError { stderr: String },

    /// Install requested without a bundle path or URL
    #[error("Extension bundle path ('src' parameter) is missing! Cannot install extension without bundle path.")]
    MissingBundleSource,

    /// Caller arguments cannot be interpreted
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Collaborator (store, executable, filesystem) failure
    #[error("{operation} failed: {message}")]
    Store { operation: String, message: String },
}

impl DesktopError {
    /// Wrap a collaborator error raised at the `anyhow` seam
    ///
    /// Domain errors raised inside a collaborator pass through unchanged.
    pub fn store(operation: impl Into<String>, error: anyhow::Error) -> Self {
        match error.downcast::<DesktopError>() {
            Ok(domain) => domain,
            Err(error) => Self::Store {
                operation: operation.into(),
                message: format!("{:#}", error),
            },
        }
    }
}

/// Extension reconciliation failure with the operations performed before it
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct ExtensionFailure {
    pub error: DesktopError,
    /// Partial progress, never rolled back
    pub report: ExtensionReport,
}

impl ExtensionFailure {
    pub fn new(error: DesktopError, report: ExtensionReport) -> Self {
        Self { error, report }
    }
}

impl From<DesktopError> for ExtensionFailure {
    fn from(error: DesktopError) -> Self {
        Self::new(error, ExtensionReport::default())
    }
}
