//! Builder for object syncers
//!
//! The builder assembles the property pipes of an [`ObjectSyncer`] from
//! declarative descriptions. Each property becomes a composite pipe from an
//! accessor on the domain object through a sinking, optionally validated
//! mapper into a key of the wire object.

use wiremap_value::{Path, Value};

use crate::accessor::{self, Accessor, AttrAccessor, Attributes, BoxAccessor, KeyAccessor, MappedAccessor};
use crate::mapper::{
    ArrayMapper, BoxMapper, ComposedMapper, IdentityMapper, Mapper, SeqMapper, SinkingMapper,
    ValidatedMapper,
};
use crate::options::{Context, Options};
use crate::result::Outcome;
use crate::syncer::{
    BoxSyncer, CompositeSyncer, ConditionalPullSyncer, ConditionalPushSyncer, ObjectSyncer,
    PullOnlySyncer, PushOnlySyncer, Syncer,
};
use crate::validator::{BoxValidator, IdentityValidator, Validator};

type PushCondition<S> = Box<dyn Fn(&S, &Options, &Context) -> bool + Send + Sync>;
type PullCondition = Box<dyn Fn(&Value, &Options, &Context) -> bool + Send + Sync>;

/// Builds an [`ObjectSyncer`] from property descriptions
pub struct ObjectSyncerBuilder<S> {
    syncers: Vec<BoxSyncer<S, Value>>,
}

impl<S: 'static> ObjectSyncerBuilder<S> {
    /// Create a builder with no properties
    pub fn new() -> Self {
        ObjectSyncerBuilder {
            syncers: Vec::new(),
        }
    }

    /// Add an arbitrary child syncer
    pub fn syncer(mut self, syncer: impl Syncer<S, Value> + Send + Sync + 'static) -> Self {
        self.syncers.push(Box::new(syncer));
        self
    }

    /// Map an attribute one-to-one onto a wire key of the same name
    pub fn property(self, name: impl Into<String>) -> Self
    where
        S: Attributes,
    {
        self.property_with(name, Property::new())
    }

    /// Map an attribute onto a wire key with a customized pipe
    pub fn property_with(mut self, name: impl Into<String>, property: Property<S>) -> Self
    where
        S: Attributes,
    {
        self.syncers.push(property.into_syncer(&name.into()));
        self
    }

    /// Map an array-valued attribute, converting and validating per element
    pub fn array(mut self, name: impl Into<String>, property: ArrayProperty<S>) -> Self
    where
        S: Attributes,
    {
        self.syncers.push(property.into_syncer(&name.into()));
        self
    }

    /// Map a computed value onto a wire key during push only
    pub fn push_only_property<G>(mut self, name: impl Into<String>, get: G) -> Self
    where
        G: Fn(&S) -> Outcome<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let pipe = CompositeSyncer::new(
            accessor::getter(get),
            SinkingMapper::new(IdentityMapper, Path::of([name.as_str()])),
            KeyAccessor::new(name),
        );

        self.syncers.push(Box::new(PushOnlySyncer::new(pipe)));
        self
    }

    /// Finish building
    pub fn build(self) -> ObjectSyncer<S> {
        ObjectSyncer::new(self.syncers)
    }
}

impl<S: 'static> Default for ObjectSyncerBuilder<S> {
    fn default() -> Self {
        ObjectSyncerBuilder::new()
    }
}

/// Description of a single property pipe
pub struct Property<S> {
    accessor: Option<BoxAccessor<S, Value>>,
    mapper: BoxMapper<Value, Value>,
    validator: Option<BoxValidator<Value>>,
    optional: bool,
    push_only: bool,
    pull_only: bool,
    push_if: Option<PushCondition<S>>,
    pull_if: Option<PullCondition>,
}

impl<S: 'static> Property<S> {
    /// Start from the default pipe: attribute access, identity mapping
    pub fn new() -> Self {
        Property {
            accessor: None,
            mapper: Box::new(IdentityMapper),
            validator: None,
            optional: false,
            push_only: false,
            pull_only: false,
            push_if: None,
            pull_if: None,
        }
    }

    /// Replace the attribute accessor with a custom one
    pub fn accessor(mut self, accessor: impl Accessor<S, Value> + Send + Sync + 'static) -> Self {
        self.accessor = Some(Box::new(accessor));
        self
    }

    /// Convert the value with a mapper
    pub fn mapper(mut self, mapper: impl Mapper<Value, Value> + Send + Sync + 'static) -> Self {
        self.mapper = Box::new(mapper);
        self
    }

    /// Validate the wire value
    pub fn validator(mut self, validator: impl Validator<Value> + Send + Sync + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Tolerate absence of the wire key during pull
    ///
    /// An absent key also bypasses the validator, since there is no value to
    /// check.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Only push this property
    pub fn push_only(mut self) -> Self {
        self.push_only = true;
        self
    }

    /// Only pull this property
    pub fn pull_only(mut self) -> Self {
        self.pull_only = true;
        self
    }

    /// Push only when the condition on the domain object holds
    pub fn push_if(
        mut self,
        condition: impl Fn(&S, &Options, &Context) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.push_if = Some(Box::new(condition));
        self
    }

    /// Pull only when the condition on the wire object holds
    pub fn pull_if(
        mut self,
        condition: impl Fn(&Value, &Options, &Context) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.pull_if = Some(Box::new(condition));
        self
    }

    fn into_syncer(self, name: &str) -> BoxSyncer<S, Value>
    where
        S: Attributes,
    {
        let source = self
            .accessor
            .unwrap_or_else(|| Box::new(AttrAccessor::new(name)));

        let mapper: BoxMapper<Value, Value> = match self.validator {
            Some(validator) => Box::new(ValidatedMapper::new(
                self.mapper,
                IdentityValidator,
                validator,
            )),
            None => self.mapper,
        };
        let mapper = SinkingMapper::new(mapper, Path::of([name]));

        let pipe =
            CompositeSyncer::new(source, mapper, KeyAccessor::new(name)).optional(self.optional);
        let mut syncer: BoxSyncer<S, Value> = Box::new(pipe);

        if self.push_only {
            syncer = Box::new(PushOnlySyncer::new(syncer));
        }
        if self.pull_only {
            syncer = Box::new(PullOnlySyncer::new(syncer));
        }
        if let Some(condition) = self.push_if {
            syncer = Box::new(ConditionalPushSyncer::new(syncer, condition));
        }
        if let Some(condition) = self.pull_if {
            syncer = Box::new(ConditionalPullSyncer::new(syncer, condition));
        }

        syncer
    }
}

impl<S: 'static> Default for Property<S> {
    fn default() -> Self {
        Property::new()
    }
}

/// Description of an array-valued property pipe
///
/// The attribute is expected to hold an array value; each element passes
/// through the element mapper and validator with failures sunk under the
/// element's index.
pub struct ArrayProperty<S> {
    accessor: Option<BoxAccessor<S, Value>>,
    element_mapper: BoxMapper<Value, Value>,
    element_validator: Option<BoxValidator<Value>>,
    validator: Option<BoxValidator<Value>>,
    optional: bool,
    push_only: bool,
    pull_only: bool,
}

impl<S: 'static> ArrayProperty<S> {
    /// Start from the default pipe: attribute access, identity elements
    pub fn new() -> Self {
        ArrayProperty {
            accessor: None,
            element_mapper: Box::new(IdentityMapper),
            element_validator: None,
            validator: None,
            optional: false,
            push_only: false,
            pull_only: false,
        }
    }

    /// Replace the attribute accessor with a custom one
    pub fn accessor(mut self, accessor: impl Accessor<S, Value> + Send + Sync + 'static) -> Self {
        self.accessor = Some(Box::new(accessor));
        self
    }

    /// Convert each element with a mapper
    pub fn element_mapper(
        mut self,
        mapper: impl Mapper<Value, Value> + Send + Sync + 'static,
    ) -> Self {
        self.element_mapper = Box::new(mapper);
        self
    }

    /// Validate each element's wire value
    pub fn element_validator(
        mut self,
        validator: impl Validator<Value> + Send + Sync + 'static,
    ) -> Self {
        self.element_validator = Some(Box::new(validator));
        self
    }

    /// Validate the whole array's wire value
    pub fn validator(mut self, validator: impl Validator<Value> + Send + Sync + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Tolerate absence of the wire key during pull
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Only push this property
    pub fn push_only(mut self) -> Self {
        self.push_only = true;
        self
    }

    /// Only pull this property
    pub fn pull_only(mut self) -> Self {
        self.pull_only = true;
        self
    }

    fn into_syncer(self, name: &str) -> BoxSyncer<S, Value>
    where
        S: Attributes,
    {
        let raw = self
            .accessor
            .unwrap_or_else(|| Box::new(AttrAccessor::new(name)));
        let source = MappedAccessor::new(SeqMapper, raw);

        let element: BoxMapper<Value, Value> = match self.element_validator {
            Some(validator) => Box::new(ValidatedMapper::new(
                self.element_mapper,
                IdentityValidator,
                validator,
            )),
            None => self.element_mapper,
        };

        let bridged: BoxMapper<Vec<Value>, Value> = {
            let composed = ComposedMapper::new(ArrayMapper::new(element), SeqMapper);
            match self.validator {
                Some(validator) => Box::new(ValidatedMapper::new(
                    composed,
                    IdentityValidator,
                    validator,
                )),
                None => Box::new(composed),
            }
        };
        let mapper = SinkingMapper::new(bridged, Path::of([name]));

        let pipe =
            CompositeSyncer::new(source, mapper, KeyAccessor::new(name)).optional(self.optional);
        let mut syncer: BoxSyncer<S, Value> = Box::new(pipe);

        if self.push_only {
            syncer = Box::new(PushOnlySyncer::new(syncer));
        }
        if self.pull_only {
            syncer = Box::new(PullOnlySyncer::new(syncer));
        }

        syncer
    }
}

impl<S: 'static> Default for ArrayProperty<S> {
    fn default() -> Self {
        ArrayProperty::new()
    }
}
