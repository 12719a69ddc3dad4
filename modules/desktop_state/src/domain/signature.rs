//! Type signatures
//!
//! Signatures are parsed once into a tree so that the builder can recurse on
//! structure instead of slicing strings at every level.
//!
//! Grammar (a subset of GVariant type strings):
//!
//! ```text
//! signature := 'b' | 'i' | 's' | 'd'
//!            | 'a' signature
//!            | '(' signature* ')'
//! ```

use crate::contract::{DesktopError, ValueKind};
use std::fmt;

/// Primitive signature codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Boolean,
    Int32,
    String,
    Double,
}

impl ScalarKind {
    /// Fixed code table: `b`, `i`, `s`, `d`
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'b' => Some(Self::Boolean),
            'i' => Some(Self::Int32),
            's' => Some(Self::String),
            'd' => Some(Self::Double),
            _ => None,
        }
    }

    pub const fn code(self) -> char {
        match self {
            Self::Boolean => 'b',
            Self::Int32 => 'i',
            Self::String => 's',
            Self::Double => 'd',
        }
    }

    /// Native value kind a scalar of this signature must have
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Boolean => ValueKind::Boolean,
            Self::Int32 => ValueKind::Int32,
            Self::String => ValueKind::String,
            Self::Double => ValueKind::Double,
        }
    }
}

/// Parsed type signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    Scalar(ScalarKind),
    /// Array of the child signature
    Array(Box<Signature>),
    /// Tuple of positional child signatures
    Tuple(Vec<Signature>),
}

impl Signature {
    /// Parse a complete signature string
    pub fn parse(text: &str) -> Result<Self, DesktopError> {
        let unsupported = || DesktopError::UnsupportedSignature {
            signature: text.to_string(),
        };

        let mut chars = text.chars().peekable();
        let signature = parse_one(&mut chars).ok_or_else(unsupported)?;
        if chars.next().is_some() {
            return Err(unsupported());
        }
        Ok(signature)
    }

    /// Array signature with the given element signature
    pub fn array_of(element: Signature) -> Self {
        Self::Array(Box::new(element))
    }

    /// Kind a value must have at the top level of this signature
    pub fn expected_kind(&self) -> ValueKind {
        match self {
            Self::Scalar(kind) => kind.value_kind(),
            Self::Array(_) => ValueKind::Array,
            Self::Tuple(children) => ValueKind::Tuple(children.len()),
        }
    }
}

fn parse_one<I>(chars: &mut std::iter::Peekable<I>) -> Option<Signature>
where
    I: Iterator<Item = char>,
{
    match chars.next()? {
        'a' => parse_one(chars).map(Signature::array_of),
        '(' => {
            let mut children = Vec::new();
            loop {
                if *chars.peek()? == ')' {
                    chars.next();
                    return Some(Signature::Tuple(children));
                }
                children.push(parse_one(chars)?);
            }
        }
        code => ScalarKind::from_code(code).map(Signature::Scalar),
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind.code()),
            Self::Array(child) => write!(f, "a{}", child),
            Self::Tuple(children) => {
                f.write_str("(")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl std::str::FromStr for Signature {
    type Err = DesktopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
