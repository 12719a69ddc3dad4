//! Module DTOs with serde derives for the JSON invocation surface

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ===== gsettings =====

/// Arguments of the `gsettings` module
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GsettingsArgs {
    /// Schema identifier
    pub schema: String,

    /// Path for relocatable schemas
    #[serde(default)]
    pub path: Option<String>,

    /// Key name
    pub key: String,

    /// Desired value, coerced to the key's type
    pub value: serde_json::Value,
}

/// Result of the `gsettings` module
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GsettingsResult {
    pub changed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

// ===== gnome_extension =====

/// Arguments of the `gnome_extension` module
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionArgs {
    /// Extension uuid
    pub name: String,

    #[serde(default)]
    pub state: StateDto,

    /// Leave both lists untouched when absent
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Bundle path or URL
    #[serde(default)]
    pub src: Option<String>,

    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateDto {
    #[default]
    Present,
    Absent,
}

/// Per-operation outcome: `"success"`, `"planned"` or a command result
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OperationDto {
    Status(String),
    Command {
        #[serde(skip_serializing_if = "Option::is_none")]
        stdout: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
        rc: i32,
    },
}

/// Result of the `gnome_extension` module
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct ExtensionResult {
    pub changed: bool,
    pub operations: BTreeMap<String, OperationDto>,
}

// ===== Responses =====

/// Failed invocation: the message plus whatever partial result exists
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Failure<T> {
    pub failed: bool,
    pub msg: String,
    #[serde(flatten)]
    pub result: T,
}

/// What a module invocation prints
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ModuleResponse<T> {
    Ok(T),
    Failed(Failure<T>),
}

impl<T> ModuleResponse<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
