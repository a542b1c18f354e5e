//! Per-call options and context
//!
//! Two immutable maps are threaded through every mapping call. `Options`
//! carries mapping-specific settings and may be narrowed or replaced by a
//! wrapping combinator before being forwarded. `Context` carries
//! call-environment data (such as the requesting principal) and must always
//! be forwarded unmodified. Neither is ever mutated in place; a wrapper
//! builds a new map when it needs to change one.

use std::collections::BTreeMap;

use wiremap_value::Value;

/// Mapping-specific settings for a single push/pull call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options(BTreeMap<String, Value>);

impl Options {
    /// Create empty options
    pub fn new() -> Self {
        Options::default()
    }

    /// Return new options with an additional entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up an option
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether any options are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for Options {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Options(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Options(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Call-environment data forwarded unmodified through every combinator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context(BTreeMap<String, Value>);

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Context::default()
    }

    /// Return a new context with an additional entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a context entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<BTreeMap<String, Value>> for Context {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Context(map)
    }
}
