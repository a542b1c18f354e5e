//! Object instantiation
//!
//! A factory abstracts how fresh domain or wire objects come into existence,
//! so combinators can seed an object graph without knowing the concrete
//! construction process.

/// Capability to instantiate objects
pub trait Factory<T> {
    /// Create a new object
    fn create(&self) -> T;
}

impl<T, F: Fn() -> T> Factory<T> for F {
    fn create(&self) -> T {
        self()
    }
}

/// Boxed factory, shareable across threads
pub type BoxFactory<T> = Box<dyn Factory<T> + Send + Sync>;

/// Reference-counted factory for combinators that share one construction
/// process
pub type SharedFactory<T> = std::sync::Arc<dyn Factory<T> + Send + Sync>;
