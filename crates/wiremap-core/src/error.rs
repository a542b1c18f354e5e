//! Located mapping errors
//!
//! Errors are data, not exceptions. Each [`Error`] pairs a structural
//! [`Path`] with an [`ErrorKind`] naming the reason and its parameters.
//! Message rendering is an external concern; consumers read [`Error::name`]
//! and [`Error::params`] to look up localized texts.

use std::collections::BTreeMap;
use std::fmt;

use wiremap_value::{Path, Segment, Value};

/// The reason behind a failed mapping step
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("object has no getter for '{attr}'")]
    MissingGetter { attr: String },

    #[error("object has no setter for '{attr}'")]
    MissingSetter { attr: String },

    #[error("key '{key}' is missing")]
    MissingKey { key: String },

    #[error("value is not an object")]
    NotAnObject,

    #[error("expected {expected}, found {actual}")]
    UnexpectedType { expected: String, actual: String },

    #[error("'{input}' is not an ISO 8601 date")]
    DateIso8601Incompatible { input: String },

    #[error("link '{href}' does not match template '{template}'")]
    InvalidLink { template: String, href: String },

    #[error("value does not match pattern '{pattern}'")]
    NoRegexpMatch { pattern: String },

    #[error("string length must be between {min} and {max}")]
    StringLengthOutOfRange { min: usize, max: usize },

    /// Caller-defined validation error
    #[error("validation '{name}' failed")]
    Validation {
        name: String,
        params: BTreeMap<String, Value>,
    },
}

impl ErrorKind {
    /// Build an unexpected-type error from the expected shape and the
    /// offending value
    pub fn unexpected_type(expected: impl Into<String>, actual: &Value) -> Self {
        ErrorKind::UnexpectedType {
            expected: expected.into(),
            actual: actual.kind().to_string(),
        }
    }

    /// Build a caller-defined validation error
    pub fn validation<K, V, I>(name: impl Into<String>, params: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        ErrorKind::Validation {
            name: name.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A reason for a failure, located within the mapped structure
///
/// Equality is structural, so errors can be compared in tests and
/// deduplicated by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    path: Path,
    kind: ErrorKind,
}

impl Error {
    /// Create an error at the root path
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            path: Path::root(),
            kind,
        }
    }

    /// Create an error at a path
    pub fn at(path: Path, kind: ErrorKind) -> Self {
        Error { path, kind }
    }

    /// The location of the error within the whole structure
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The reason for the error
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return a new error with `prefix` concatenated before the path
    pub fn sink(mut self, prefix: &Path) -> Self {
        self.path = self.path.sunk_under(prefix);
        self
    }

    /// Stable symbolic identifier for message lookup
    pub fn name(&self) -> &str {
        match &self.kind {
            ErrorKind::MissingGetter { .. } => "missing_getter",
            ErrorKind::MissingSetter { .. } => "missing_setter",
            ErrorKind::MissingKey { .. } => "missing_key",
            ErrorKind::NotAnObject => "not_an_object",
            ErrorKind::UnexpectedType { .. } => "unexpected_type",
            ErrorKind::DateIso8601Incompatible { .. } => "date_iso8601_incompatible",
            ErrorKind::InvalidLink { .. } => "invalid_link",
            ErrorKind::NoRegexpMatch { .. } => "no_regexp_match",
            ErrorKind::StringLengthOutOfRange { .. } => "string_length_out_of_range",
            ErrorKind::Validation { name, .. } => name,
        }
    }

    /// Parameters describing the error cause, for message interpolation
    pub fn params(&self) -> BTreeMap<String, Value> {
        let pair = |k: &str, v: Value| (k.to_string(), v);

        match &self.kind {
            ErrorKind::MissingGetter { attr } | ErrorKind::MissingSetter { attr } => {
                BTreeMap::from_iter([pair("attr", Value::from(attr.as_str()))])
            }
            ErrorKind::MissingKey { key } => {
                BTreeMap::from_iter([pair("key", Value::from(key.as_str()))])
            }
            ErrorKind::NotAnObject => BTreeMap::new(),
            ErrorKind::UnexpectedType { expected, actual } => BTreeMap::from_iter([
                pair("expected", Value::from(expected.as_str())),
                pair("actual", Value::from(actual.as_str())),
            ]),
            ErrorKind::DateIso8601Incompatible { input } => {
                BTreeMap::from_iter([pair("input", Value::from(input.as_str()))])
            }
            ErrorKind::InvalidLink { template, href } => BTreeMap::from_iter([
                pair("template", Value::from(template.as_str())),
                pair("href", Value::from(href.as_str())),
            ]),
            ErrorKind::NoRegexpMatch { pattern } => {
                BTreeMap::from_iter([pair("pattern", Value::from(pattern.as_str()))])
            }
            ErrorKind::StringLengthOutOfRange { min, max } => BTreeMap::from_iter([
                pair("min", Value::Integer(*min as i64)),
                pair("max", Value::Integer(*max as i64)),
            ]),
            ErrorKind::Validation { params, .. } => params.clone(),
        }
    }

    /// Render the error as a wire value for reporting back to clients
    pub fn to_value(&self) -> Value {
        let path = self
            .path
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Key(key) => Value::from(key.as_str()),
                Segment::Index(index) => Value::Integer(*index as i64),
            })
            .collect::<Vec<_>>();

        Value::object([
            ("path", Value::Array(path)),
            ("name", Value::from(self.name())),
            ("params", Value::Object(self.params())),
        ])
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for Error {}
