//! Accessors: reading and writing one aspect of an object
//!
//! An accessor is a capability to get and set a single aspect of an object,
//! such as an attribute, a map key or a link. Failing accessors return
//! located errors; they never mutate their input on failure.

use wiremap_value::Value;

use crate::error::{Error, ErrorKind};
use crate::mapper::Mapper;
use crate::options::{Context, Options};
use crate::result::{Failure, Outcome};

/// Capability to read and write one aspect of an object
pub trait Accessor<O, V> {
    /// Read the aspect from `object`
    fn get(&self, object: &O, options: &Options, context: &Context) -> Outcome<V>;

    /// Write `value` into `object`
    ///
    /// Implementations must leave `object` untouched unless they succeed.
    fn set(&self, object: &mut O, value: V, options: &Options, context: &Context) -> Outcome<()>;
}

/// Boxed accessor, shareable across threads
pub type BoxAccessor<O, V> = Box<dyn Accessor<O, V> + Send + Sync>;

impl<O, V, A: Accessor<O, V> + ?Sized> Accessor<O, V> for Box<A> {
    fn get(&self, object: &O, options: &Options, context: &Context) -> Outcome<V> {
        self.as_ref().get(object, options, context)
    }

    fn set(&self, object: &mut O, value: V, options: &Options, context: &Context) -> Outcome<()> {
        self.as_ref().set(object, value, options, context)
    }
}

/// Named-attribute capability for domain objects
///
/// Domain types implement this once; [`AttrAccessor`] then reads and writes
/// any of their attributes by name. Returning `None`/`false` means the
/// attribute does not exist, which surfaces as a typed failure rather than a
/// crash.
pub trait Attributes {
    /// Read an attribute by name
    fn get_attr(&self, name: &str) -> Option<Value>;

    /// Write an attribute by name, returning false if it does not exist
    fn set_attr(&mut self, name: &str, value: Value) -> bool;
}

/// Always reads null and ignores writes
///
/// The default placeholder in positions where an accessor is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NilAccessor;

impl<O> Accessor<O, Value> for NilAccessor {
    fn get(&self, _object: &O, _options: &Options, _context: &Context) -> Outcome<Value> {
        Ok(Value::Null)
    }

    fn set(
        &self,
        _object: &mut O,
        _value: Value,
        _options: &Options,
        _context: &Context,
    ) -> Outcome<()> {
        Ok(())
    }
}

/// Accesses a named attribute through the [`Attributes`] capability
#[derive(Debug, Clone)]
pub struct AttrAccessor {
    name: String,
}

impl AttrAccessor {
    /// Create an accessor for the attribute `name`
    pub fn new(name: impl Into<String>) -> Self {
        AttrAccessor { name: name.into() }
    }
}

impl<O: Attributes> Accessor<O, Value> for AttrAccessor {
    fn get(&self, object: &O, _options: &Options, _context: &Context) -> Outcome<Value> {
        object.get_attr(&self.name).ok_or_else(|| {
            Failure::new(Error::new(ErrorKind::MissingGetter {
                attr: self.name.clone(),
            }))
        })
    }

    fn set(&self, object: &mut O, value: Value, _options: &Options, _context: &Context) -> Outcome<()> {
        if object.set_attr(&self.name, value) {
            Ok(())
        } else {
            Err(Failure::new(Error::new(ErrorKind::MissingSetter {
                attr: self.name.clone(),
            })))
        }
    }
}

/// Accesses an object value under a fixed key
///
/// The strict form fails with `missing_key` when the key is absent; the
/// `with_default` form substitutes a default value on get instead.
#[derive(Debug, Clone)]
pub struct KeyAccessor {
    key: String,
    default: Option<Value>,
}

impl KeyAccessor {
    /// Create a strict key accessor
    pub fn new(key: impl Into<String>) -> Self {
        KeyAccessor {
            key: key.into(),
            default: None,
        }
    }

    /// Create a key accessor substituting `default` for absent keys
    pub fn with_default(key: impl Into<String>, default: Value) -> Self {
        KeyAccessor {
            key: key.into(),
            default: Some(default),
        }
    }
}

impl Accessor<Value, Value> for KeyAccessor {
    fn get(&self, object: &Value, _options: &Options, _context: &Context) -> Outcome<Value> {
        let map = object
            .as_object()
            .ok_or_else(|| Failure::from(ErrorKind::NotAnObject))?;

        match map.get(&self.key) {
            Some(value) => Ok(value.clone()),
            None => match &self.default {
                Some(default) => Ok(default.clone()),
                None => Err(Failure::new(Error::new(ErrorKind::MissingKey {
                    key: self.key.clone(),
                }))),
            },
        }
    }

    fn set(&self, object: &mut Value, value: Value, _options: &Options, _context: &Context) -> Outcome<()> {
        let map = object
            .as_object_mut()
            .ok_or_else(|| Failure::from(ErrorKind::NotAnObject))?;

        map.insert(self.key.clone(), value);
        Ok(())
    }
}

/// Slots a mapper in front of an accessor
///
/// Values pass through the mapper after getting and before setting, so the
/// composed accessor exposes the mapper's domain-side representation.
#[derive(Debug, Clone)]
pub struct MappedAccessor<M, A, W = Value> {
    mapper: M,
    accessor: A,
    _wire: std::marker::PhantomData<fn() -> W>,
}

impl<M, A, W> MappedAccessor<M, A, W> {
    /// Compose `mapper` in front of `accessor`
    pub fn new(mapper: M, accessor: A) -> Self {
        MappedAccessor {
            mapper,
            accessor,
            _wire: std::marker::PhantomData,
        }
    }
}

impl<O, V, W, M, A> Accessor<O, V> for MappedAccessor<M, A, W>
where
    M: Mapper<V, W>,
    A: Accessor<O, W>,
{
    fn get(&self, object: &O, options: &Options, context: &Context) -> Outcome<V> {
        let raw = self.accessor.get(object, options, context)?;

        self.mapper.read(&raw, options, context)
    }

    fn set(&self, object: &mut O, value: V, options: &Options, context: &Context) -> Outcome<()> {
        let raw = self.mapper.write(&value, options, context)?;

        self.accessor.set(object, raw, options, context)
    }
}

/// Closure-backed accessor for ad-hoc aspects
///
/// The closures receive only the object; per-call options and context do not
/// usually matter for inline accessors.
pub struct FnAccessor<G, S> {
    get: G,
    set: S,
}

impl<G, S> FnAccessor<G, S> {
    /// Create an accessor from a getter and a setter closure
    pub fn new(get: G, set: S) -> Self {
        FnAccessor { get, set }
    }
}

/// Create a getter-only accessor
///
/// Invoking `set` on the result is a programmer error and panics; wrap the
/// composed syncer in a push-only modifier so the setter is never reached.
pub fn getter<O, V, G>(get: G) -> impl Accessor<O, V> + Send + Sync + 'static
where
    O: 'static,
    V: 'static,
    G: Fn(&O) -> Outcome<V> + Send + Sync + 'static,
{
    FnAccessor {
        get,
        set: |_: &mut O, _: V| unimplemented!("set invoked on a getter-only accessor"),
    }
}

/// Create a setter-only accessor
///
/// Invoking `get` on the result is a programmer error and panics; wrap the
/// composed syncer in a pull-only modifier so the getter is never reached.
pub fn setter<O, V, S>(set: S) -> impl Accessor<O, V> + Send + Sync + 'static
where
    O: 'static,
    V: 'static,
    S: Fn(&mut O, V) -> Outcome<()> + Send + Sync + 'static,
{
    FnAccessor {
        get: |_: &O| unimplemented!("get invoked on a setter-only accessor"),
        set,
    }
}

impl<O, V, G, S> Accessor<O, V> for FnAccessor<G, S>
where
    G: Fn(&O) -> Outcome<V>,
    S: Fn(&mut O, V) -> Outcome<()>,
{
    fn get(&self, object: &O, _options: &Options, _context: &Context) -> Outcome<V> {
        (self.get)(object)
    }

    fn set(&self, object: &mut O, value: V, _options: &Options, _context: &Context) -> Outcome<()> {
        (self.set)(object, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::FnMapper;

    struct Pet {
        name: String,
    }

    impl Attributes for Pet {
        fn get_attr(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name.clone())),
                _ => None,
            }
        }

        fn set_attr(&mut self, name: &str, value: Value) -> bool {
            match name {
                "name" => {
                    self.name = value.as_str().unwrap_or_default().to_string();
                    true
                }
                _ => false,
            }
        }
    }

    fn call() -> (Options, Context) {
        (Options::default(), Context::default())
    }

    #[test]
    fn test_nil_accessor() {
        let (options, context) = call();
        let accessor = NilAccessor;
        let mut pet = Pet {
            name: "Finchen".to_string(),
        };

        assert_eq!(accessor.get(&pet, &options, &context), Ok(Value::Null));
        assert_eq!(
            accessor.set(&mut pet, Value::from(5), &options, &context),
            Ok(())
        );
        assert_eq!(pet.name, "Finchen");
    }

    #[test]
    fn test_attr_accessor_roundtrip() {
        let (options, context) = call();
        let accessor = AttrAccessor::new("name");
        let mut pet = Pet {
            name: "Finchen".to_string(),
        };

        assert_eq!(
            accessor.get(&pet, &options, &context),
            Ok(Value::from("Finchen"))
        );

        accessor
            .set(&mut pet, Value::from("Ronja"), &options, &context)
            .unwrap();
        assert_eq!(pet.name, "Ronja");
    }

    #[test]
    fn test_attr_accessor_missing_getter() {
        let (options, context) = call();
        let accessor = AttrAccessor::new("age");
        let pet = Pet {
            name: "Finchen".to_string(),
        };

        let result: Outcome<Value> = accessor.get(&pet, &options, &context);

        assert_eq!(
            result,
            Err(Failure::from(ErrorKind::MissingGetter {
                attr: "age".to_string()
            }))
        );
    }

    #[test]
    fn test_key_accessor_strict_and_default() {
        let (options, context) = call();
        let object = Value::object([("name", "Finchen")]);

        let strict = KeyAccessor::new("age");
        assert_eq!(
            strict.get(&object, &options, &context),
            Err(Failure::from(ErrorKind::MissingKey {
                key: "age".to_string()
            }))
        );

        let lenient = KeyAccessor::with_default("age", Value::Integer(0));
        assert_eq!(
            lenient.get(&object, &options, &context),
            Ok(Value::Integer(0))
        );
    }

    #[test]
    fn test_key_accessor_requires_object() {
        let (options, context) = call();
        let accessor = KeyAccessor::new("name");
        let mut not_an_object = Value::from(5);

        assert_eq!(
            accessor.get(&not_an_object, &options, &context),
            Err(Failure::from(ErrorKind::NotAnObject))
        );
        assert_eq!(
            accessor.set(&mut not_an_object, Value::Null, &options, &context),
            Err(Failure::from(ErrorKind::NotAnObject))
        );
        // Unchanged on failure.
        assert_eq!(not_an_object, Value::from(5));
    }

    #[test]
    fn test_mapped_accessor_applies_mapper() {
        let (options, context) = call();
        let doubler = FnMapper::new(
            |wire: &Value| Ok(Value::Integer(wire.as_i64().unwrap_or(0) / 2)),
            |domain: &Value| Ok(Value::Integer(domain.as_i64().unwrap_or(0) * 2)),
        );
        let accessor = MappedAccessor::new(doubler, KeyAccessor::new("n"));
        let mut object = Value::object([("n", Value::Integer(10))]);

        assert_eq!(
            accessor.get(&object, &options, &context),
            Ok(Value::Integer(5))
        );

        accessor
            .set(&mut object, Value::Integer(7), &options, &context)
            .unwrap();
        assert_eq!(object.get("n"), Some(&Value::Integer(14)));
    }

    #[test]
    fn test_fn_accessor() {
        let (options, context) = call();
        let accessor = FnAccessor::new(
            |pet: &Pet| Ok(Value::from(pet.name.to_uppercase())),
            |pet: &mut Pet, value: Value| {
                pet.name = value.as_str().unwrap_or_default().to_lowercase();
                Ok(())
            },
        );
        let mut pet = Pet {
            name: "Finchen".to_string(),
        };

        assert_eq!(
            accessor.get(&pet, &options, &context),
            Ok(Value::from("FINCHEN"))
        );

        accessor
            .set(&mut pet, Value::from("RONJA"), &options, &context)
            .unwrap();
        assert_eq!(pet.name, "ronja");
    }
}
