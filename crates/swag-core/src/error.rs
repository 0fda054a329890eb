use std::fmt;

use thiserror::Error;

use crate::descriptor::TypeDescriptor;
use crate::value::MappedValue;

/// A value did not have the shape its descriptor requires.
///
/// This is the only failure the transformer produces. It is deterministic:
/// the same value checked against the same descriptor fails the same way.
#[derive(Debug, Clone, Error)]
#[error("invalid value {} for type {expected}", DisplaySlot(.value.as_ref()))]
pub struct ShapeMismatch {
    /// The offending value, or `None` when the value was absent.
    pub value: Option<MappedValue>,
    /// The descriptor (or union / enumeration) the value was checked against.
    pub expected: TypeDescriptor,
}

impl ShapeMismatch {
    pub fn new(value: Option<&MappedValue>, expected: &TypeDescriptor) -> Self {
        Self {
            value: value.cloned(),
            expected: expected.clone(),
        }
    }
}

struct DisplaySlot<'a>(Option<&'a MappedValue>);

impl fmt::Display for DisplaySlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value.to_json()),
            None => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate type name: {0}")]
    DuplicateName(String),

    #[error("reference to unknown type `{target}` in `{owner}`")]
    DanglingReference { owner: String, target: String },

    #[error("duplicate {kind} field name `{field}` in `{owner}`")]
    DuplicateField {
        owner: String,
        field: String,
        kind: &'static str,
    },

    #[error("reference cycle with no concrete type: {0}")]
    ReferenceCycle(String),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unsupported reference format: {0}")]
    UnsupportedRef(String),

    #[error("invalid definition `{name}`: {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml_ng::Error,
    },
}
