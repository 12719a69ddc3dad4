//! Contract models for desktop state reconciliation
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use std::collections::BTreeMap;
use std::fmt;

/// Native value understood by the reconciliation engine
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Double(f64),
    Str(String),
    /// Homogeneous sequence
    Array(Vec<Value>),
    /// Fixed-size heterogeneous sequence
    Tuple(Vec<Value>),
}

impl Value {
    /// Runtime kind of this value, used for signature validation
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Boolean,
            Self::Int(_) => ValueKind::Int32,
            Self::Double(_) => ValueKind::Double,
            Self::Str(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Tuple(items) => ValueKind::Tuple(items.len()),
        }
    }

    /// Borrow the elements of an array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the content of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Double(d) => write!(f, "{:?}", d),
            Self::Str(s) => write!(f, "'{}'", s),
            Self::Array(items) => {
                f.write_str("[")?;
                join(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                join(f, items)?;
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Kind of a native value, named in type mismatch errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Int32,
    Double,
    String,
    Array,
    /// Tuple with its arity
    Tuple(usize),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
            Self::Int32 => f.write_str("int32"),
            Self::Double => f.write_str("double"),
            Self::String => f.write_str("string"),
            Self::Array => f.write_str("array"),
            Self::Tuple(arity) => write!(f, "tuple of {}", arity),
        }
    }
}

/// Reference to one configuration entry in the settings store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsKeyRef {
    /// Schema identifier (e.g., "org.gnome.desktop.interface")
    pub schema: String,
    /// Path for relocatable schemas (e.g., "/org/gnome/terminal/profiles/default/")
    pub path: Option<String>,
    /// Key name within the schema
    pub key: String,
}

impl SettingsKeyRef {
    pub fn new(schema: impl Into<String>, path: Option<String>, key: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            path,
            key: key.into(),
        }
    }

    /// Schema with optional path in `schema[:path]` notation
    pub fn schema_with_path(&self) -> String {
        match &self.path {
            Some(path) => format!("{}:{}", self.schema, path),
            None => self.schema.clone(),
        }
    }
}

impl fmt::Display for SettingsKeyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.schema_with_path(), self.key)
    }
}

/// Desired value for a settings key
#[derive(Debug, Clone, PartialEq)]
pub struct SetValueRequest {
    pub key: SettingsKeyRef,
    /// Raw value as supplied by the caller, coerced before use
    pub value: Value,
    /// Compute the outcome without writing
    pub check_mode: bool,
}

/// Result of reconciling a settings key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutcome {
    pub changed: bool,
    /// Value stored before reconciliation
    pub previous: Value,
    /// Value stored after reconciliation (or that would be, in check mode)
    pub value: Value,
}

/// Desired installation state of an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Present,
    Absent,
}

/// Desired state of a GNOME Shell extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRequest {
    /// Extension uuid (e.g., "user-theme@gnome-shell-extensions.gcampax.github.com")
    pub uuid: String,
    pub state: Presence,
    /// `None` leaves the enabled/disabled lists untouched
    pub enabled: Option<bool>,
    /// Bundle path or URL, required only to install
    pub src: Option<String>,
    pub force: bool,
    pub check_mode: bool,
}

impl ExtensionRequest {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            state: Presence::default(),
            enabled: None,
            src: None,
            force: false,
            check_mode: false,
        }
    }
}

/// Observed (or desired) state of an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionState {
    pub installed: bool,
    /// `Some(true)` in the enabled list, `Some(false)` in the disabled list, `None` in neither
    pub enabled: Option<bool>,
}

/// Outcome of one operation performed during extension reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Success,
    /// Would run outside check mode
    Planned,
    /// Extension-manager invocation result
    Command {
        rc: i32,
        stdout: Option<String>,
        stderr: Option<String>,
    },
}

/// Result of reconciling an extension, also carried by failures
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionReport {
    pub changed: bool,
    /// Operation name (install, uninstall, enable, ...) to its outcome
    pub operations: BTreeMap<String, Operation>,
}
