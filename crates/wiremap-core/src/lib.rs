//! # wiremap-core
//!
//! The combinator core of the mapping engine: a Result/Error algebra with
//! path-located failures, and the accessor/mapper/syncer composition model
//! used to copy data between domain objects and wire values in both
//! directions.
//!
//! Failures accumulate instead of aborting the traversal: every combinator
//! returns an [`Outcome`], and composite syncers keep walking their children
//! after an error, merging all located errors into a single [`Failure`].
//!
//! ## Example
//!
//! ```rust
//! use wiremap_core::accessor::Attributes;
//! use wiremap_core::builder::ObjectSyncerBuilder;
//! use wiremap_core::syncer::Syncer;
//! use wiremap_core::{Context, Options};
//! use wiremap_value::Value;
//!
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//! }
//!
//! impl Attributes for Person {
//!     fn get_attr(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "name" => Some(Value::from(self.name.clone())),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_attr(&mut self, name: &str, value: Value) -> bool {
//!         match name {
//!             "name" => {
//!                 self.name = value.as_str().unwrap_or_default().to_string();
//!                 true
//!             }
//!             _ => false,
//!         }
//!     }
//! }
//!
//! let syncer = ObjectSyncerBuilder::<Person>::new().property("name").build();
//!
//! let person = Person { name: "Marten".to_string() };
//! let mut wire = Value::empty_object();
//! syncer
//!     .push(&person, &mut wire, &Options::default(), &Context::default())
//!     .unwrap();
//!
//! assert_eq!(wire, Value::object([("name", "Marten")]));
//! ```

pub mod accessor;
pub mod builder;
pub mod error;
pub mod factory;
pub mod mapper;
pub mod options;
pub mod result;
pub mod syncer;
pub mod validator;

pub use error::{Error, ErrorKind};
pub use options::{Context, Options};
pub use result::{Failure, Outcome};
