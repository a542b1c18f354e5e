//! HAL resources
//!
//! A HAL syncer wraps an object syncer with resource identity: it writes the
//! self link on push and resolves the self link back into a domain object
//! when one is present on the wire. Linked and embedded resources become
//! additional child pipes of the underlying object syncer.

use std::sync::Arc;

use tracing::debug;

use wiremap_core::accessor::{Accessor, Attributes, BoxAccessor};
use wiremap_core::builder::{ArrayProperty, ObjectSyncerBuilder, Property};
use wiremap_core::factory::{Factory, SharedFactory};
use wiremap_core::mapper::{
    ArrayMapper, BoxMapper, ComposedMapper, Mapper, SeqMapper, SinkingMapper,
};
use wiremap_core::syncer::{BoxSyncer, CompositeSyncer, ObjectSyncer, PushOnlySyncer, Syncer};
use wiremap_core::{Context, Failure, Options, Outcome};
use wiremap_value::{Path, Value};

use crate::link::{EmbeddedAccessor, LinkAccessor, LinkMapper, LinkParams};
use crate::self_link::{SelfLinkMapper, TemplateParamsAccessor, TemplateParamsMapper};
use crate::template::UriTemplate;

/// Synchronizes a domain object with a HAL resource
pub struct HalSyncer<S> {
    base: ObjectSyncer<S>,
    self_link: Option<Arc<SelfLinkMapper<S>>>,
    self_accessor: LinkAccessor,
    factory: SharedFactory<S>,
}

impl<S> HalSyncer<S> {
    /// The configured self link mapper, if any
    ///
    /// Other resources use this to link to or embed resources of this kind.
    pub fn self_link_mapper(&self) -> Option<Arc<SelfLinkMapper<S>>> {
        self.self_link.clone()
    }

    /// Instantiate the domain object a wire resource talks about
    ///
    /// When a self link is configured and present on the wire, the object is
    /// reconstructed from the href, so an href of the wrong shape fails
    /// instead of silently producing a fresh object. Otherwise the factory
    /// provides one.
    pub fn instantiate(&self, wire: &Value, options: &Options, context: &Context) -> Outcome<S> {
        if let Some(mapper) = &self.self_link {
            let link = wire.get("_links").and_then(|links| links.get("self"));
            if let Some(link) = link {
                debug!("instantiating from self link");
                return mapper.read(link, options, context);
            }
        }

        Ok(self.factory.create())
    }
}

impl<S> Syncer<S, Value> for HalSyncer<S> {
    // The self link behaves like one more child pipe: its errors merge with
    // the property failures instead of cutting the push short.
    fn push(
        &self,
        source: &S,
        target: &mut Value,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        let mut failure = Failure::empty();

        if let Err(errors) = self.base.push(source, target, options, context) {
            failure.merge(errors);
        }

        if let Some(mapper) = &self.self_link {
            let written = mapper
                .write(source, options, context)
                .and_then(|link| self.self_accessor.set(target, link, options, context));
            if let Err(errors) = written {
                failure.merge(errors);
            }
        }

        failure.into_outcome(())
    }

    // The self link is deliberately not read back: clients do not get to
    // reassign a resource's identity through the payload.
    fn pull(
        &self,
        source: &mut S,
        target: &Value,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        self.base.pull(source, target, options, context)
    }
}

/// Adapts a [`HalSyncer`] into a mapper over whole resources
///
/// Reading instantiates the identified object and pulls the wire data into
/// it; writing pushes into a fresh wire object. This is the mapper embedded
/// resources are mapped with.
pub struct HalMapper<S> {
    syncer: Arc<HalSyncer<S>>,
}

impl<S> HalMapper<S> {
    /// Create a mapper around a syncer
    pub fn new(syncer: HalSyncer<S>) -> Self {
        HalMapper {
            syncer: Arc::new(syncer),
        }
    }

    /// The underlying syncer
    pub fn syncer(&self) -> &Arc<HalSyncer<S>> {
        &self.syncer
    }
}

impl<S> Clone for HalMapper<S> {
    fn clone(&self) -> Self {
        HalMapper {
            syncer: Arc::clone(&self.syncer),
        }
    }
}

impl<S> Mapper<S, Value> for HalMapper<S> {
    fn read(&self, value: &Value, options: &Options, context: &Context) -> Outcome<S> {
        let mut object = self.syncer.instantiate(value, options, context)?;
        self.syncer.pull(&mut object, value, options, context)?;

        Ok(object)
    }

    fn write(&self, value: &S, options: &Options, context: &Context) -> Outcome<Value> {
        let mut wire = Value::empty_object();
        self.syncer.push(value, &mut wire, options, context)?;

        Ok(wire)
    }
}

/// Gates a child syncer on a per-call option
///
/// The relation only syncs when the caller opts in by setting the relation
/// name in the options. An object value narrows the options forwarded to the
/// child to that object's entries; any other truthy value forwards empty
/// options. The context always passes through untouched.
pub struct EmbeddedFilter<Y> {
    rel: String,
    inner: Y,
}

impl<Y> EmbeddedFilter<Y> {
    /// Gate `inner` on the option named `rel`
    pub fn new(rel: impl Into<String>, inner: Y) -> Self {
        EmbeddedFilter {
            rel: rel.into(),
            inner,
        }
    }

    fn scope(&self, options: &Options) -> Option<Options> {
        match options.get(&self.rel) {
            None | Some(Value::Bool(false)) | Some(Value::Null) => None,
            Some(Value::Object(entries)) => Some(Options::from(entries.clone())),
            Some(_) => Some(Options::new()),
        }
    }
}

impl<S, Y: Syncer<S, Value>> Syncer<S, Value> for EmbeddedFilter<Y> {
    fn push(
        &self,
        source: &S,
        target: &mut Value,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        match self.scope(options) {
            Some(scoped) => self.inner.push(source, target, &scoped, context),
            None => Ok(()),
        }
    }

    fn pull(
        &self,
        source: &mut S,
        target: &Value,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        match self.scope(options) {
            Some(scoped) => self.inner.pull(source, target, &scoped, context),
            None => Ok(()),
        }
    }
}

/// Description of a single embedded resource
///
/// Embedded resources are pushed only, unless pulling is explicitly enabled
/// with [`Embedded::with_pull`].
pub struct Embedded<S, S2> {
    accessor: BoxAccessor<S, S2>,
    mapper: BoxMapper<S2, Value>,
    pull: bool,
}

impl<S: 'static, S2: 'static> Embedded<S, S2> {
    /// Embed the resource behind `accessor`, mapped with `mapper`
    pub fn new(
        accessor: impl Accessor<S, S2> + Send + Sync + 'static,
        mapper: impl Mapper<S2, Value> + Send + Sync + 'static,
    ) -> Self {
        Embedded {
            accessor: Box::new(accessor),
            mapper: Box::new(mapper),
            pull: false,
        }
    }

    /// Also pull the embedded resource back into the domain object
    pub fn with_pull(mut self) -> Self {
        self.pull = true;
        self
    }

    fn into_syncer(self, rel: &str) -> BoxSyncer<S, Value> {
        let mapper = SinkingMapper::new(self.mapper, Path::of(["_embedded", rel]));
        let pipe = CompositeSyncer::new(self.accessor, mapper, EmbeddedAccessor::new(rel));

        let syncer: BoxSyncer<S, Value> = if self.pull {
            Box::new(pipe)
        } else {
            Box::new(PushOnlySyncer::new(pipe))
        };

        Box::new(EmbeddedFilter::new(rel, syncer))
    }
}

/// Description of an embedded resource collection
pub struct Embeddeds<S, S2> {
    accessor: BoxAccessor<S, Vec<S2>>,
    mapper: BoxMapper<S2, Value>,
    pull: bool,
}

impl<S: 'static, S2: 'static> Embeddeds<S, S2> {
    /// Embed the resources behind `accessor`, each mapped with `mapper`
    pub fn new(
        accessor: impl Accessor<S, Vec<S2>> + Send + Sync + 'static,
        mapper: impl Mapper<S2, Value> + Send + Sync + 'static,
    ) -> Self {
        Embeddeds {
            accessor: Box::new(accessor),
            mapper: Box::new(mapper),
            pull: false,
        }
    }

    /// Also pull the embedded resources back into the domain object
    pub fn with_pull(mut self) -> Self {
        self.pull = true;
        self
    }

    fn into_syncer(self, rel: &str) -> BoxSyncer<S, Value> {
        let bridged = ComposedMapper::new(ArrayMapper::new(self.mapper), SeqMapper);
        let mapper = SinkingMapper::new(bridged, Path::of(["_embedded", rel]));
        let pipe = CompositeSyncer::new(self.accessor, mapper, EmbeddedAccessor::new(rel));

        let syncer: BoxSyncer<S, Value> = if self.pull {
            Box::new(pipe)
        } else {
            Box::new(PushOnlySyncer::new(pipe))
        };

        Box::new(EmbeddedFilter::new(rel, syncer))
    }
}

/// Builds a [`HalSyncer`] from property, link and embed descriptions
pub struct HalSyncerBuilder<S> {
    base: ObjectSyncerBuilder<S>,
    self_link: Option<Arc<SelfLinkMapper<S>>>,
    factory: SharedFactory<S>,
}

impl<S: 'static> HalSyncerBuilder<S> {
    /// Create a builder instantiating fallback objects via `factory`
    pub fn new(factory: impl Factory<S> + Send + Sync + 'static) -> Self {
        HalSyncerBuilder {
            base: ObjectSyncerBuilder::new(),
            self_link: None,
            factory: Arc::new(factory),
        }
    }

    /// Create a builder for a defaultable domain type
    pub fn with_default() -> Self
    where
        S: Default,
    {
        HalSyncerBuilder::new(S::default)
    }

    /// Add an arbitrary child syncer
    pub fn syncer(mut self, syncer: impl Syncer<S, Value> + Send + Sync + 'static) -> Self {
        self.base = self.base.syncer(syncer);
        self
    }

    /// Map an attribute one-to-one onto a wire key of the same name
    pub fn property(mut self, name: impl Into<String>) -> Self
    where
        S: Attributes,
    {
        self.base = self.base.property(name);
        self
    }

    /// Map an attribute onto a wire key with a customized pipe
    pub fn property_with(mut self, name: impl Into<String>, property: Property<S>) -> Self
    where
        S: Attributes,
    {
        self.base = self.base.property_with(name, property);
        self
    }

    /// Map an array-valued attribute, converting and validating per element
    pub fn array(mut self, name: impl Into<String>, property: ArrayProperty<S>) -> Self
    where
        S: Attributes,
    {
        self.base = self.base.array(name, property);
        self
    }

    /// Map a computed value onto a wire key during push only
    pub fn push_only_property<G>(mut self, name: impl Into<String>, get: G) -> Self
    where
        G: Fn(&S) -> Outcome<Value> + Send + Sync + 'static,
    {
        self.base = self.base.push_only_property(name, get);
        self
    }

    /// Declare the resource's self link with a custom params mapper
    pub fn self_link(
        mut self,
        template: UriTemplate,
        params: impl Mapper<S, LinkParams> + Send + Sync + 'static,
    ) -> Self {
        self.self_link = Some(Arc::new(SelfLinkMapper::new(
            params,
            LinkMapper::new(template),
        )));
        self
    }

    /// Declare the resource's self link, deriving params from same-named
    /// attributes
    pub fn self_link_template(self, template: UriTemplate) -> Self
    where
        S: Attributes,
    {
        let params = TemplateParamsMapper::new(template.variables().to_vec(), self.factory.clone());

        self.self_link(template, params)
    }

    /// Link to another resource through its self link mapper
    pub fn link<S2: 'static>(
        mut self,
        rel: impl Into<String>,
        accessor: impl Accessor<S, S2> + Send + Sync + 'static,
        mapper: Arc<SelfLinkMapper<S2>>,
    ) -> Self {
        let rel = rel.into();
        let sunk = SinkingMapper::new(mapper, Path::of(["_links", rel.as_str()]));
        let pipe = CompositeSyncer::new(accessor, sunk, LinkAccessor::new(rel)).optional(true);

        self.base = self.base.syncer(pipe);
        self
    }

    /// Add a link whose params are same-named attributes of this resource
    pub fn link_template(mut self, rel: impl Into<String>, template: UriTemplate) -> Self
    where
        S: Attributes,
    {
        let rel = rel.into();
        let source = TemplateParamsAccessor::new(template.variables().to_vec());
        let sunk = SinkingMapper::new(
            LinkMapper::new(template),
            Path::of(["_links", rel.as_str()]),
        );
        let pipe = CompositeSyncer::new(source, sunk, LinkAccessor::new(rel)).optional(true);

        self.base = self.base.syncer(pipe);
        self
    }

    /// Link to a collection of resources through their self link mapper
    pub fn links<S2: 'static>(
        mut self,
        rel: impl Into<String>,
        accessor: impl Accessor<S, Vec<S2>> + Send + Sync + 'static,
        mapper: Arc<SelfLinkMapper<S2>>,
    ) -> Self {
        let rel = rel.into();
        let bridged = ComposedMapper::new(ArrayMapper::new(mapper), SeqMapper);
        let sunk = SinkingMapper::new(bridged, Path::of(["_links", rel.as_str()]));
        let pipe = CompositeSyncer::new(accessor, sunk, LinkAccessor::new(rel)).optional(true);

        self.base = self.base.syncer(pipe);
        self
    }

    /// Embed a single related resource
    pub fn embedded<S2: 'static>(
        mut self,
        rel: impl Into<String>,
        embedded: Embedded<S, S2>,
    ) -> Self {
        let rel = rel.into();
        self.base = self.base.syncer(embedded.into_syncer(&rel));
        self
    }

    /// Embed a collection of related resources
    pub fn embeddeds<S2: 'static>(
        mut self,
        rel: impl Into<String>,
        embeddeds: Embeddeds<S, S2>,
    ) -> Self {
        let rel = rel.into();
        self.base = self.base.syncer(embeddeds.into_syncer(&rel));
        self
    }

    /// Finish building
    pub fn build(self) -> HalSyncer<S> {
        HalSyncer {
            base: self.base.build(),
            self_link: self.self_link,
            self_accessor: LinkAccessor::new("self"),
            factory: self.factory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremap_core::builder::Property;
    use wiremap_core::mapper::FnMapper;
    use wiremap_core::validator::Predicate;
    use wiremap_core::{Error, ErrorKind, Failure};

    #[derive(Default, Debug, PartialEq)]
    struct Person {
        name: String,
        age: i64,
    }

    impl Attributes for Person {
        fn get_attr(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name.clone())),
                "age" => Some(Value::Integer(self.age)),
                _ => None,
            }
        }

        fn set_attr(&mut self, name: &str, value: Value) -> bool {
            match name {
                "name" => {
                    self.name = value.as_str().unwrap_or_default().to_string();
                    true
                }
                "age" => {
                    self.age = value.as_i64().unwrap_or_default();
                    true
                }
                _ => false,
            }
        }
    }

    fn call() -> (Options, Context) {
        (Options::default(), Context::default())
    }

    fn person_syncer() -> HalSyncer<Person> {
        HalSyncerBuilder::<Person>::with_default()
            .self_link_template(UriTemplate::parse("/people/{name}").unwrap())
            .property("age")
            .build()
    }

    #[test]
    fn test_push_writes_self_link() {
        let (options, context) = call();
        let person = Person {
            name: "marten-lienen".to_string(),
            age: 21,
        };

        let mut wire = Value::empty_object();
        person_syncer()
            .push(&person, &mut wire, &options, &context)
            .unwrap();

        assert_eq!(
            wire,
            Value::object([
                (
                    "_links",
                    Value::object([(
                        "self",
                        Value::object([("href", "/people/marten-lienen")])
                    )])
                ),
                ("age", Value::Integer(21)),
            ])
        );
    }

    #[test]
    fn test_instantiate_reads_self_link() {
        let (options, context) = call();
        let wire = Value::object([(
            "_links",
            Value::object([("self", Value::object([("href", "/people/marten-lienen")]))]),
        )]);

        let person = person_syncer()
            .instantiate(&wire, &options, &context)
            .unwrap();

        assert_eq!(person.name, "marten-lienen");
    }

    #[test]
    fn test_instantiate_falls_back_to_factory() {
        let (options, context) = call();

        let person = person_syncer()
            .instantiate(&Value::empty_object(), &options, &context)
            .unwrap();

        assert_eq!(person, Person::default());
    }

    #[test]
    fn test_instantiate_rejects_foreign_self_link() {
        let (options, context) = call();
        let wire = Value::object([(
            "_links",
            Value::object([("self", Value::object([("href", "/pets/5")]))]),
        )]);

        let result = person_syncer().instantiate(&wire, &options, &context);

        assert_eq!(
            result,
            Err(Failure::from(ErrorKind::InvalidLink {
                template: "/people/{name}".to_string(),
                href: "/pets/5".to_string(),
            }))
        );
    }

    #[test]
    fn test_pull_ignores_self_link() {
        let (options, context) = call();
        let wire = Value::object([
            (
                "_links",
                Value::object([("self", Value::object([("href", "/people/somebody-else")]))]),
            ),
            ("age", Value::Integer(30)),
        ]);

        let mut person = Person {
            name: "marten-lienen".to_string(),
            age: 21,
        };
        person_syncer()
            .pull(&mut person, &wire, &options, &context)
            .unwrap();

        assert_eq!(person.name, "marten-lienen");
        assert_eq!(person.age, 30);
    }

    fn too_young() -> Error {
        Error::new(ErrorKind::validation("too_young", [("min", 18)]))
    }

    fn age_validator() -> Predicate<impl Fn(&Value) -> bool> {
        Predicate::new(too_young(), |v: &Value| v.as_i64().is_some_and(|n| n >= 18))
    }

    #[test]
    fn test_push_writes_self_link_despite_property_failure() {
        let (options, context) = call();
        let syncer = HalSyncerBuilder::<Person>::with_default()
            .self_link_template(UriTemplate::parse("/people/{name}").unwrap())
            .property_with("age", Property::new().validator(age_validator()))
            .build();
        let person = Person {
            name: "marten-lienen".to_string(),
            age: 3,
        };

        let mut wire = Value::empty_object();
        let result = syncer.push(&person, &mut wire, &options, &context);

        assert_eq!(
            result,
            Err(Failure::new(too_young().sink(&Path::of(["age"]))))
        );
        // The identity still reached the target alongside the failure.
        assert_eq!(
            wire.get("_links").and_then(|links| links.get("self")),
            Some(&Value::object([("href", "/people/marten-lienen")]))
        );
    }

    #[test]
    fn test_push_merges_self_link_failure_with_property_failures() {
        let (options, context) = call();
        let params = FnMapper::new(
            |_: &LinkParams| Ok(Person::default()),
            |_: &Person| -> Outcome<LinkParams> {
                Err(Failure::from(ErrorKind::MissingGetter {
                    attr: "slug".to_string(),
                }))
            },
        );
        let syncer = HalSyncerBuilder::<Person>::with_default()
            .self_link(UriTemplate::parse("/people/{slug}").unwrap(), params)
            .property_with("age", Property::new().validator(age_validator()))
            .build();
        let person = Person {
            name: "marten-lienen".to_string(),
            age: 3,
        };

        let mut wire = Value::empty_object();
        let result = syncer.push(&person, &mut wire, &options, &context);

        let expected = Failure::of(vec![
            too_young().sink(&Path::of(["age"])),
            Error::new(ErrorKind::MissingGetter {
                attr: "slug".to_string(),
            }),
        ]);
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn test_embedded_filter_gates_on_option() {
        let (options, context) = call();
        let mapper = HalMapper::new(person_syncer());
        let syncer = HalSyncerBuilder::<Person>::with_default()
            .embedded(
                "friend",
                Embedded::new(
                    wiremap_core::accessor::getter(|person: &Person| {
                        Ok(Person {
                            name: format!("friend-of-{}", person.name),
                            age: 0,
                        })
                    }),
                    mapper,
                ),
            )
            .build();
        let person = Person {
            name: "marten".to_string(),
            age: 21,
        };

        // Disabled by default.
        let mut wire = Value::empty_object();
        syncer.push(&person, &mut wire, &options, &context).unwrap();
        assert_eq!(wire, Value::empty_object());

        let mut wire = Value::empty_object();
        let enabled = Options::new().with("friend", true);
        syncer.push(&person, &mut wire, &enabled, &context).unwrap();
        let friend = wire
            .get("_embedded")
            .and_then(|embedded| embedded.get("friend"))
            .unwrap();
        assert_eq!(
            friend.get("_links"),
            Some(&Value::object([(
                "self",
                Value::object([("href", "/people/friend-of-marten")])
            )]))
        );
    }

    #[test]
    fn test_embedded_filter_narrows_options() {
        let (_, context) = call();
        let probe = EmbeddedFilter::new(
            "friend",
            CompositeSyncer::new(
                wiremap_core::accessor::getter(|_: &Person| Ok(Value::Null)),
                wiremap_core::mapper::IdentityMapper,
                wiremap_core::accessor::NilAccessor,
            ),
        );

        // An object value becomes the child's options.
        let options = Options::new().with("friend", Value::object([("pets", true)]));
        assert_eq!(
            probe.scope(&options),
            Some(Options::new().with("pets", true))
        );

        // Other truthy values enable with empty options.
        let options = Options::new().with("friend", true);
        assert_eq!(probe.scope(&options), Some(Options::new()));

        // False and null stay disabled.
        assert_eq!(probe.scope(&Options::new().with("friend", false)), None);
        assert_eq!(probe.scope(&Options::new().with("friend", Value::Null)), None);

        let mut person = Person::default();
        let result = probe.pull(&mut person, &Value::empty_object(), &Options::new(), &context);
        assert_eq!(result, Ok(()));
    }
}
