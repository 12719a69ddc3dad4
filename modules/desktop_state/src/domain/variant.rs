//! Typed variants and the builder that validates values against signatures

use super::signature::Signature;
use crate::contract::{DesktopError, Value, ValueKind};

/// A native value paired with the signature it was validated against
#[derive(Debug, Clone, PartialEq)]
pub struct TypedVariant {
    signature: Signature,
    value: Value,
}

impl TypedVariant {
    /// Validate `value` against `signature` and build the variant
    ///
    /// The signature should always come from the currently stored value, so
    /// that the result is something the store accepts.
    pub fn build(value: Value, signature: &Signature) -> Result<Self, DesktopError> {
        let value = build_value(value, signature)?;
        Ok(Self {
            signature: signature.clone(),
            value,
        })
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

fn build_value(value: Value, signature: &Signature) -> Result<Value, DesktopError> {
    match signature {
        Signature::Scalar(kind) => {
            let expected = kind.value_kind();
            let provided = value.kind();
            if provided != expected {
                return Err(DesktopError::ValueTypeMismatch { provided, expected });
            }
            Ok(value)
        }
        Signature::Array(child) => match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| build_value(item, child))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(mismatch(&other, signature)),
        },
        Signature::Tuple(children) => match value {
            // Lists are accepted for tuple slots since YAML cannot spell tuples
            Value::Tuple(items) | Value::Array(items) => {
                if items.len() != children.len() {
                    return Err(DesktopError::ValueTypeMismatch {
                        provided: ValueKind::Tuple(items.len()),
                        expected: signature.expected_kind(),
                    });
                }
                items
                    .into_iter()
                    .zip(children)
                    .map(|(item, child)| build_value(item, child))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Tuple)
            }
            other => Err(mismatch(&other, signature)),
        },
    }
}

fn mismatch(value: &Value, signature: &Signature) -> DesktopError {
    DesktopError::ValueTypeMismatch {
        provided: value.kind(),
        expected: signature.expected_kind(),
    }
}
