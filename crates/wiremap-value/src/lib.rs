#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # wiremap-value
//!
//! The generic tree-shaped value model that mapping graphs read and write.
//!
//! This crate provides a format-neutral representation of wire data (nested
//! objects, arrays and scalars, i.e. the JSON tree shape) together with the
//! structural paths used to locate errors inside such a tree. Parsing and
//! generating actual JSON text is out of scope; `Value` round-trips through
//! serde, so any serde frontend can produce or consume it.

/// Structural paths into tree values.
pub mod path;
/// The wire value tree.
pub mod value;

pub use path::{Path, Segment};
pub use value::Value;
