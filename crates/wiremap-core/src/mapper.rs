//! Mappers: bidirectional value conversion
//!
//! A mapper converts between a domain-side and a wire-side representation.
//! `read` goes wire-to-domain, `write` goes domain-to-wire. Mappers compose
//! into larger mappers; failures short-circuit and carry located errors.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::NaiveDate;

use wiremap_value::{Path, Value};

use crate::error::ErrorKind;
use crate::factory::BoxFactory;
use crate::options::{Context, Options};
use crate::result::{self, Failure, Outcome};
use crate::syncer::BoxSyncer;
use crate::validator::Validator;

/// Capability to convert between two representations of a value
pub trait Mapper<L, R> {
    /// Convert a wire-side value to its domain-side representation
    fn read(&self, value: &R, options: &Options, context: &Context) -> Outcome<L>;

    /// Convert a domain-side value to its wire-side representation
    fn write(&self, value: &L, options: &Options, context: &Context) -> Outcome<R>;
}

/// Boxed mapper, shareable across threads
pub type BoxMapper<L, R> = Box<dyn Mapper<L, R> + Send + Sync>;

impl<L, R, M: Mapper<L, R> + ?Sized> Mapper<L, R> for Box<M> {
    fn read(&self, value: &R, options: &Options, context: &Context) -> Outcome<L> {
        self.as_ref().read(value, options, context)
    }

    fn write(&self, value: &L, options: &Options, context: &Context) -> Outcome<R> {
        self.as_ref().write(value, options, context)
    }
}

impl<L, R, M: Mapper<L, R> + ?Sized> Mapper<L, R> for Arc<M> {
    fn read(&self, value: &R, options: &Options, context: &Context) -> Outcome<L> {
        self.as_ref().read(value, options, context)
    }

    fn write(&self, value: &L, options: &Options, context: &Context) -> Outcome<R> {
        self.as_ref().write(value, options, context)
    }
}

/// Passes values through unchanged
///
/// The default in positions where a mapper is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl<T: Clone> Mapper<T, T> for IdentityMapper {
    fn read(&self, value: &T, _options: &Options, _context: &Context) -> Outcome<T> {
        Ok(value.clone())
    }

    fn write(&self, value: &T, _options: &Options, _context: &Context) -> Outcome<T> {
        Ok(value.clone())
    }
}

/// Instantiates fresh objects, ignoring the input value
///
/// Useful as the seed step of a chain that fills in an object afterwards.
pub struct InstanceMapper<L, R> {
    left: BoxFactory<L>,
    right: BoxFactory<R>,
}

impl<L, R> InstanceMapper<L, R> {
    /// Create a mapper instantiating via the two factories
    pub fn new(left: BoxFactory<L>, right: BoxFactory<R>) -> Self {
        InstanceMapper { left, right }
    }
}

impl<L, R> Mapper<L, R> for InstanceMapper<L, R> {
    fn read(&self, _value: &R, _options: &Options, _context: &Context) -> Outcome<L> {
        Ok(self.left.create())
    }

    fn write(&self, _value: &L, _options: &Options, _context: &Context) -> Outcome<R> {
        Ok(self.right.create())
    }
}

/// Applies an element mapper to every element of an array
///
/// Element failures are sunk under the element's index and merged, so a
/// single pass reports every failing element with its exact location. No
/// partially converted array survives a failure.
#[derive(Debug, Clone)]
pub struct ArrayMapper<M> {
    inner: M,
}

impl<M> ArrayMapper<M> {
    /// Create an array mapper from an element mapper
    pub fn new(inner: M) -> Self {
        ArrayMapper { inner }
    }
}

impl<L, R, M: Mapper<L, R>> Mapper<Vec<L>, Vec<R>> for ArrayMapper<M> {
    fn read(&self, values: &Vec<R>, options: &Options, context: &Context) -> Outcome<Vec<L>> {
        result::reduce(
            values
                .iter()
                .map(|value| self.inner.read(value, options, context)),
        )
    }

    fn write(&self, values: &Vec<L>, options: &Options, context: &Context) -> Outcome<Vec<R>> {
        result::reduce(
            values
                .iter()
                .map(|value| self.inner.write(value, options, context)),
        )
    }
}

/// Bridges between a `Vec` of values and an array wire value
#[derive(Debug, Clone, Copy, Default)]
pub struct SeqMapper;

impl Mapper<Vec<Value>, Value> for SeqMapper {
    fn read(&self, value: &Value, _options: &Options, _context: &Context) -> Outcome<Vec<Value>> {
        match value {
            Value::Array(items) => Ok(items.clone()),
            other => Err(Failure::from(ErrorKind::unexpected_type("array", other))),
        }
    }

    fn write(&self, values: &Vec<Value>, _options: &Options, _context: &Context) -> Outcome<Value> {
        Ok(Value::Array(values.clone()))
    }
}

/// Applies a sequence of same-typed mappers
///
/// `write` applies the mappers front to back; `read` inverts the chain by
/// applying them back to front.
pub struct MapperChain<T> {
    mappers: Vec<BoxMapper<T, T>>,
}

impl<T> MapperChain<T> {
    /// Create an empty chain
    pub fn new() -> Self {
        MapperChain {
            mappers: Vec::new(),
        }
    }

    /// Append a mapper to the chain
    pub fn with(mut self, mapper: impl Mapper<T, T> + Send + Sync + 'static) -> Self
    where
        T: 'static,
    {
        self.mappers.push(Box::new(mapper));
        self
    }
}

impl<T> Default for MapperChain<T> {
    fn default() -> Self {
        MapperChain::new()
    }
}

impl<T: Clone> Mapper<T, T> for MapperChain<T> {
    fn read(&self, value: &T, options: &Options, context: &Context) -> Outcome<T> {
        let mut current = value.clone();
        for mapper in self.mappers.iter().rev() {
            current = mapper.read(&current, options, context)?;
        }
        Ok(current)
    }

    fn write(&self, value: &T, options: &Options, context: &Context) -> Outcome<T> {
        let mut current = value.clone();
        for mapper in &self.mappers {
            current = mapper.write(&current, options, context)?;
        }
        Ok(current)
    }
}

/// Composes two mappers across an intermediate representation
///
/// `write` runs the first mapper and feeds its output into the second;
/// `read` inverts the composition.
pub struct ComposedMapper<A, B, M0> {
    first: A,
    second: B,
    _mid: PhantomData<fn() -> M0>,
}

impl<A, B, M0> ComposedMapper<A, B, M0> {
    /// Compose `first` with `second`
    pub fn new(first: A, second: B) -> Self {
        ComposedMapper {
            first,
            second,
            _mid: PhantomData,
        }
    }
}

impl<L, M0, R, A, B> Mapper<L, R> for ComposedMapper<A, B, M0>
where
    A: Mapper<L, M0>,
    B: Mapper<M0, R>,
{
    fn read(&self, value: &R, options: &Options, context: &Context) -> Outcome<L> {
        let mid = self.second.read(value, options, context)?;

        self.first.read(&mid, options, context)
    }

    fn write(&self, value: &L, options: &Options, context: &Context) -> Outcome<R> {
        let mid = self.first.write(value, options, context)?;

        self.second.write(&mid, options, context)
    }
}

/// Guards a mapper with validators on both sides
///
/// Reading validates the wire value before and the domain value after the
/// inner mapper runs; writing mirrors that. Either validator is usually the
/// identity validator.
pub struct ValidatedMapper<M, VL, VR> {
    inner: M,
    left: VL,
    right: VR,
}

impl<M, VL, VR> ValidatedMapper<M, VL, VR> {
    /// Guard `inner` with a domain-side and a wire-side validator
    pub fn new(inner: M, left: VL, right: VR) -> Self {
        ValidatedMapper { inner, left, right }
    }
}

impl<L, R, M, VL, VR> Mapper<L, R> for ValidatedMapper<M, VL, VR>
where
    M: Mapper<L, R>,
    VL: Validator<L>,
    VR: Validator<R>,
{
    fn read(&self, value: &R, options: &Options, context: &Context) -> Outcome<L> {
        self.right.validate(value, options, context)?;
        let converted = self.inner.read(value, options, context)?;
        self.left.validate(&converted, options, context)?;

        Ok(converted)
    }

    fn write(&self, value: &L, options: &Options, context: &Context) -> Outcome<R> {
        self.left.validate(value, options, context)?;
        let converted = self.inner.write(value, options, context)?;
        self.right.validate(&converted, options, context)?;

        Ok(converted)
    }
}

/// Prefixes the paths of a mapper's errors
///
/// Wrapping a property's mapper sinks its failures under the property name,
/// so errors locate themselves within the enclosing structure.
pub struct SinkingMapper<M> {
    inner: M,
    prefix: Path,
}

impl<M> SinkingMapper<M> {
    /// Sink the failures of `inner` under `prefix`
    pub fn new(inner: M, prefix: Path) -> Self {
        SinkingMapper { inner, prefix }
    }
}

impl<L, R, M: Mapper<L, R>> Mapper<L, R> for SinkingMapper<M> {
    fn read(&self, value: &R, options: &Options, context: &Context) -> Outcome<L> {
        self.inner
            .read(value, options, context)
            .map_err(|failure| failure.sink(&self.prefix))
    }

    fn write(&self, value: &L, options: &Options, context: &Context) -> Outcome<R> {
        self.inner
            .write(value, options, context)
            .map_err(|failure| failure.sink(&self.prefix))
    }
}

/// Applies a mapper only to non-null values
///
/// Null passes through untouched in both directions, so inner mappers can
/// assume a present value.
#[derive(Debug, Clone)]
pub struct WhenValue<M> {
    inner: M,
}

impl<M> WhenValue<M> {
    /// Skip `inner` for null values
    pub fn new(inner: M) -> Self {
        WhenValue { inner }
    }
}

impl<M: Mapper<Value, Value>> Mapper<Value, Value> for WhenValue<M> {
    fn read(&self, value: &Value, options: &Options, context: &Context) -> Outcome<Value> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            self.inner.read(value, options, context)
        }
    }

    fn write(&self, value: &Value, options: &Options, context: &Context) -> Outcome<Value> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            self.inner.write(value, options, context)
        }
    }
}

/// Converts between dates and their ISO 8601 wire representation
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso8601DateMapper;

impl Mapper<NaiveDate, Value> for Iso8601DateMapper {
    fn read(&self, value: &Value, _options: &Options, _context: &Context) -> Outcome<NaiveDate> {
        let string = value
            .as_str()
            .ok_or_else(|| Failure::from(ErrorKind::unexpected_type("string", value)))?;

        string.parse::<NaiveDate>().map_err(|_| {
            Failure::from(ErrorKind::DateIso8601Incompatible {
                input: string.to_string(),
            })
        })
    }

    fn write(&self, value: &NaiveDate, _options: &Options, _context: &Context) -> Outcome<Value> {
        Ok(Value::from(value.format("%Y-%m-%d").to_string()))
    }
}

/// Closure-backed mapper for ad-hoc conversions
///
/// The closures receive only the value; per-call options and context do not
/// usually matter for inline mappers.
pub struct FnMapper<Rd, Wr> {
    read: Rd,
    write: Wr,
}

impl<Rd, Wr> FnMapper<Rd, Wr> {
    /// Create a mapper from a read and a write closure
    pub fn new(read: Rd, write: Wr) -> Self {
        FnMapper { read, write }
    }
}

impl<L, R, Rd, Wr> Mapper<L, R> for FnMapper<Rd, Wr>
where
    Rd: Fn(&R) -> Outcome<L>,
    Wr: Fn(&L) -> Outcome<R>,
{
    fn read(&self, value: &R, _options: &Options, _context: &Context) -> Outcome<L> {
        (self.read)(value)
    }

    fn write(&self, value: &L, _options: &Options, _context: &Context) -> Outcome<R> {
        (self.write)(value)
    }
}

/// Adapts a syncer into a mapper
///
/// Reading instantiates a fresh domain object and pulls into it; writing
/// instantiates a fresh wire object and pushes into it. This is how a nested
/// object mapping slots into a property pipe.
pub struct SyncerMapper<S, T> {
    syncer: BoxSyncer<S, T>,
    left: BoxFactory<S>,
    right: BoxFactory<T>,
}

impl<S, T> SyncerMapper<S, T> {
    /// Create a mapper around `syncer` with factories for both sides
    pub fn new(syncer: BoxSyncer<S, T>, left: BoxFactory<S>, right: BoxFactory<T>) -> Self {
        SyncerMapper {
            syncer,
            left,
            right,
        }
    }
}

impl<S, T> Mapper<S, T> for SyncerMapper<S, T> {
    fn read(&self, value: &T, options: &Options, context: &Context) -> Outcome<S> {
        let mut object = self.left.create();
        self.syncer.pull(&mut object, value, options, context)?;

        Ok(object)
    }

    fn write(&self, value: &S, options: &Options, context: &Context) -> Outcome<T> {
        let mut object = self.right.create();
        self.syncer.push(value, &mut object, options, context)?;

        Ok(object)
    }
}
