//! Conversions between module DTOs and contract models

use super::dto::*;
use crate::contract::{
    self, DesktopError, ExtensionRequest, Presence, SetValueRequest, SettingsKeyRef, Value,
};

/// Prefix of arguments injected by the automation runner
const RUNNER_FIELD_PREFIX: &str = "_ansible_";
const CHECK_MODE_FIELD: &str = "_ansible_check_mode";

/// Separate runner-injected fields from module arguments
///
/// Returns the remaining arguments and the check-mode flag.
pub fn split_runner_fields(
    args: serde_json::Value,
) -> Result<(serde_json::Value, bool), DesktopError> {
    let serde_json::Value::Object(mut fields) = args else {
        return Err(DesktopError::InvalidArgument {
            message: "module arguments must be a JSON object".to_string(),
        });
    };

    let check_mode = match fields.get(CHECK_MODE_FIELD) {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(DesktopError::InvalidArgument {
                message: format!("{} must be a boolean, got {}", CHECK_MODE_FIELD, other),
            })
        }
    };
    fields.retain(|name, _| !name.starts_with(RUNNER_FIELD_PREFIX));

    Ok((serde_json::Value::Object(fields), check_mode))
}

/// Map a raw JSON value to a native value
pub fn value_from_json(json: &serde_json::Value) -> Result<Value, DesktopError> {
    match json {
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
        serde_json::Value::Number(n) => {
            let int = n.as_i64().and_then(|i| i32::try_from(i).ok());
            match (int, n.as_f64()) {
                (Some(i), _) => Ok(Value::Int(i)),
                (None, Some(d)) => Ok(Value::Double(d)),
                (None, None) => Err(DesktopError::InvalidArgument {
                    message: format!("number {} is not representable", n),
                }),
            }
        }
        serde_json::Value::Array(items) => items
            .iter()
            .map(value_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_json::Value::Null => Err(DesktopError::InvalidArgument {
            message: "value must not be null".to_string(),
        }),
        serde_json::Value::Object(_) => Err(DesktopError::InvalidArgument {
            message: "dictionary values are not supported".to_string(),
        }),
    }
}

/// Map a native value to JSON; tuples become arrays
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        // Non-finite doubles have no JSON spelling and become null
        Value::Double(d) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) | Value::Tuple(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
    }
}

impl GsettingsArgs {
    pub fn into_request(self, check_mode: bool) -> Result<SetValueRequest, DesktopError> {
        Ok(SetValueRequest {
            key: SettingsKeyRef::new(self.schema, self.path, self.key),
            value: value_from_json(&self.value)?,
            check_mode,
        })
    }
}

impl ExtensionArgs {
    pub fn into_request(self, check_mode: bool) -> ExtensionRequest {
        ExtensionRequest {
            uuid: self.name,
            state: self.state.into(),
            enabled: self.enabled,
            src: self.src,
            force: self.force,
            check_mode,
        }
    }
}

impl From<StateDto> for Presence {
    fn from(state: StateDto) -> Self {
        match state {
            StateDto::Present => Presence::Present,
            StateDto::Absent => Presence::Absent,
        }
    }
}

impl From<contract::KeyOutcome> for GsettingsResult {
    fn from(outcome: contract::KeyOutcome) -> Self {
        Self {
            changed: outcome.changed,
            previous: Some(value_to_json(&outcome.previous)),
            value: Some(value_to_json(&outcome.value)),
        }
    }
}

impl From<contract::Operation> for OperationDto {
    fn from(operation: contract::Operation) -> Self {
        match operation {
            contract::Operation::Success => Self::Status("success".to_string()),
            contract::Operation::Planned => Self::Status("planned".to_string()),
            contract::Operation::Command { rc, stdout, stderr } => {
                Self::Command { stdout, stderr, rc }
            }
        }
    }
}

impl From<contract::ExtensionReport> for ExtensionResult {
    fn from(report: contract::ExtensionReport) -> Self {
        Self {
            changed: report.changed,
            operations: report
                .operations
                .into_iter()
                .map(|(name, op)| (name, op.into()))
                .collect(),
        }
    }
}
