//! HAL links
//!
//! A link is a wire object of the form `{"href": "/people/5"}` living under
//! a relation name in the `_links` container. The link mapper converts
//! between template parameters and such link objects; the rel accessors
//! address a relation inside the `_links` or `_embedded` container.

use std::collections::BTreeMap;

use wiremap_core::accessor::{Accessor, KeyAccessor};
use wiremap_core::mapper::Mapper;
use wiremap_core::{Context, ErrorKind, Failure, Options, Outcome};
use wiremap_value::{Path, Value};

use crate::template::UriTemplate;

/// Parameter values of a URI template, keyed by variable name
pub type LinkParams = BTreeMap<String, Value>;

/// Converts between template parameters and a HAL link object
#[derive(Debug, Clone)]
pub struct LinkMapper {
    template: UriTemplate,
}

impl LinkMapper {
    /// Create a mapper for links following `template`
    pub fn new(template: UriTemplate) -> Self {
        LinkMapper { template }
    }

    /// The template hrefs are matched against
    pub fn template(&self) -> &UriTemplate {
        &self.template
    }
}

impl Mapper<LinkParams, Value> for LinkMapper {
    fn read(&self, value: &Value, _options: &Options, _context: &Context) -> Outcome<LinkParams> {
        let link = value
            .as_object()
            .ok_or_else(|| Failure::from(ErrorKind::NotAnObject))?;
        let href = link.get("href").ok_or_else(|| {
            Failure::from(ErrorKind::MissingKey {
                key: "href".to_string(),
            })
        })?;
        let href = href
            .as_str()
            .ok_or_else(|| Failure::from(ErrorKind::unexpected_type("string", href)))?;

        self.template.extract(href).ok_or_else(|| {
            Failure::from(ErrorKind::InvalidLink {
                template: self.template.raw().to_string(),
                href: href.to_string(),
            })
        })
    }

    fn write(&self, params: &LinkParams, _options: &Options, _context: &Context) -> Outcome<Value> {
        Ok(Value::object([("href", self.template.expand(params))]))
    }
}

fn container_get(
    object: &Value,
    container: &'static str,
    rel: &str,
    options: &Options,
    context: &Context,
) -> Outcome<Value> {
    let map = object
        .as_object()
        .ok_or_else(|| Failure::from(ErrorKind::NotAnObject))?;

    let entry = match map.get(container) {
        Some(entry) => entry.clone(),
        None => Value::empty_object(),
    };

    KeyAccessor::new(rel)
        .get(&entry, options, context)
        .map_err(|failure| failure.sink(&Path::of([container])))
}

fn container_set(
    object: &mut Value,
    container: &'static str,
    rel: &str,
    value: Value,
    options: &Options,
    context: &Context,
) -> Outcome<()> {
    let map = object
        .as_object_mut()
        .ok_or_else(|| Failure::from(ErrorKind::NotAnObject))?;

    let entry = map
        .entry(container.to_string())
        .or_insert_with(Value::empty_object);

    KeyAccessor::new(rel)
        .set(entry, value, options, context)
        .map_err(|failure| failure.sink(&Path::of([container])))
}

/// Accesses the link of one relation inside the `_links` container
///
/// Getting an absent relation fails with its error sunk under `_links`;
/// setting creates the container on demand.
#[derive(Debug, Clone)]
pub struct LinkAccessor {
    rel: String,
}

impl LinkAccessor {
    /// Create an accessor for the relation `rel`
    pub fn new(rel: impl Into<String>) -> Self {
        LinkAccessor { rel: rel.into() }
    }
}

impl Accessor<Value, Value> for LinkAccessor {
    fn get(&self, object: &Value, options: &Options, context: &Context) -> Outcome<Value> {
        container_get(object, "_links", &self.rel, options, context)
    }

    fn set(&self, object: &mut Value, value: Value, options: &Options, context: &Context) -> Outcome<()> {
        container_set(object, "_links", &self.rel, value, options, context)
    }
}

/// Accesses the resources of one relation inside the `_embedded` container
#[derive(Debug, Clone)]
pub struct EmbeddedAccessor {
    rel: String,
}

impl EmbeddedAccessor {
    /// Create an accessor for the relation `rel`
    pub fn new(rel: impl Into<String>) -> Self {
        EmbeddedAccessor { rel: rel.into() }
    }
}

impl Accessor<Value, Value> for EmbeddedAccessor {
    fn get(&self, object: &Value, options: &Options, context: &Context) -> Outcome<Value> {
        container_get(object, "_embedded", &self.rel, options, context)
    }

    fn set(&self, object: &mut Value, value: Value, options: &Options, context: &Context) -> Outcome<()> {
        container_set(object, "_embedded", &self.rel, value, options, context)
    }
}
