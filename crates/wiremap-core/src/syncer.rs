//! Syncers: moving data between live objects
//!
//! A syncer transfers data between a source and a target object in place.
//! `push` moves domain data into a wire object, `pull` moves wire data back
//! into a domain object. The composite syncer wires an accessor pair through
//! a mapper; the object syncer runs a list of child syncers and merges their
//! failures.

use tracing::trace;

use wiremap_value::Value;

use crate::accessor::{Accessor, BoxAccessor};
use crate::mapper::{BoxMapper, Mapper};
use crate::options::{Context, Options};
use crate::result::{Failure, Outcome};

/// Capability to transfer data between a source and a target object
pub trait Syncer<S, T> {
    /// Move data from `source` into `target`
    fn push(&self, source: &S, target: &mut T, options: &Options, context: &Context)
    -> Outcome<()>;

    /// Move data from `target` back into `source`
    fn pull(&self, source: &mut S, target: &T, options: &Options, context: &Context)
    -> Outcome<()>;
}

/// Boxed syncer, shareable across threads
pub type BoxSyncer<S, T> = Box<dyn Syncer<S, T> + Send + Sync>;

impl<S, T, Y: Syncer<S, T> + ?Sized> Syncer<S, T> for Box<Y> {
    fn push(
        &self,
        source: &S,
        target: &mut T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        self.as_ref().push(source, target, options, context)
    }

    fn pull(
        &self,
        source: &mut S,
        target: &T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        self.as_ref().pull(source, target, options, context)
    }
}

/// Pipes one aspect of the source into one aspect of the target
///
/// Pushing reads through the source accessor, converts with the mapper and
/// writes through the target accessor. Pulling runs the pipe in reverse. An
/// optional pipe treats a failing target read during pull as "not present"
/// and succeeds without touching the source.
pub struct CompositeSyncer<S, T, V, W> {
    source: BoxAccessor<S, V>,
    mapper: BoxMapper<V, W>,
    target: BoxAccessor<T, W>,
    optional: bool,
}

impl<S, T, V, W> CompositeSyncer<S, T, V, W>
where
    V: 'static,
    W: 'static,
{
    /// Wire a source accessor through a mapper into a target accessor
    pub fn new(
        source: impl Accessor<S, V> + Send + Sync + 'static,
        mapper: impl Mapper<V, W> + Send + Sync + 'static,
        target: impl Accessor<T, W> + Send + Sync + 'static,
    ) -> Self
    where
        S: 'static,
        T: 'static,
    {
        CompositeSyncer {
            source: Box::new(source),
            mapper: Box::new(mapper),
            target: Box::new(target),
            optional: false,
        }
    }

    /// Tolerate an absent target aspect during pull
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

impl<S, T, V, W> Syncer<S, T> for CompositeSyncer<S, T, V, W> {
    fn push(
        &self,
        source: &S,
        target: &mut T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        let value = self.source.get(source, options, context)?;
        let converted = self.mapper.write(&value, options, context)?;

        self.target.set(target, converted, options, context)
    }

    fn pull(
        &self,
        source: &mut S,
        target: &T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        let value = match self.target.get(target, options, context) {
            Ok(value) => value,
            Err(_) if self.optional => return Ok(()),
            Err(failure) => return Err(failure),
        };
        let converted = self.mapper.read(&value, options, context)?;

        self.source.set(source, converted, options, context)
    }
}

/// Restricts a syncer to the push direction; pull becomes a no-op
pub struct PushOnlySyncer<Y> {
    inner: Y,
}

impl<Y> PushOnlySyncer<Y> {
    pub fn new(inner: Y) -> Self {
        PushOnlySyncer { inner }
    }
}

impl<S, T, Y: Syncer<S, T>> Syncer<S, T> for PushOnlySyncer<Y> {
    fn push(
        &self,
        source: &S,
        target: &mut T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        self.inner.push(source, target, options, context)
    }

    fn pull(
        &self,
        _source: &mut S,
        _target: &T,
        _options: &Options,
        _context: &Context,
    ) -> Outcome<()> {
        Ok(())
    }
}

/// Restricts a syncer to the pull direction; push becomes a no-op
pub struct PullOnlySyncer<Y> {
    inner: Y,
}

impl<Y> PullOnlySyncer<Y> {
    pub fn new(inner: Y) -> Self {
        PullOnlySyncer { inner }
    }
}

impl<S, T, Y: Syncer<S, T>> Syncer<S, T> for PullOnlySyncer<Y> {
    fn push(
        &self,
        _source: &S,
        _target: &mut T,
        _options: &Options,
        _context: &Context,
    ) -> Outcome<()> {
        Ok(())
    }

    fn pull(
        &self,
        source: &mut S,
        target: &T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        self.inner.pull(source, target, options, context)
    }
}

/// Pushes only when a condition on the source holds
pub struct ConditionalPushSyncer<Y, P> {
    inner: Y,
    condition: P,
}

impl<Y, P> ConditionalPushSyncer<Y, P> {
    pub fn new(inner: Y, condition: P) -> Self {
        ConditionalPushSyncer { inner, condition }
    }
}

impl<S, T, Y, P> Syncer<S, T> for ConditionalPushSyncer<Y, P>
where
    Y: Syncer<S, T>,
    P: Fn(&S, &Options, &Context) -> bool,
{
    fn push(
        &self,
        source: &S,
        target: &mut T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        if (self.condition)(source, options, context) {
            self.inner.push(source, target, options, context)
        } else {
            Ok(())
        }
    }

    fn pull(
        &self,
        source: &mut S,
        target: &T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        self.inner.pull(source, target, options, context)
    }
}

/// Pulls only when a condition on the target holds
pub struct ConditionalPullSyncer<Y, P> {
    inner: Y,
    condition: P,
}

impl<Y, P> ConditionalPullSyncer<Y, P> {
    pub fn new(inner: Y, condition: P) -> Self {
        ConditionalPullSyncer { inner, condition }
    }
}

impl<S, T, Y, P> Syncer<S, T> for ConditionalPullSyncer<Y, P>
where
    Y: Syncer<S, T>,
    P: Fn(&T, &Options, &Context) -> bool,
{
    fn push(
        &self,
        source: &S,
        target: &mut T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        self.inner.push(source, target, options, context)
    }

    fn pull(
        &self,
        source: &mut S,
        target: &T,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        if (self.condition)(target, options, context) {
            self.inner.pull(source, target, options, context)
        } else {
            Ok(())
        }
    }
}

/// Runs a list of child syncers against a wire object
///
/// Every child runs even after a failure, each seeing the target as left by
/// its predecessors, and all failures are merged in order. The whole sync
/// succeeds iff no child failed.
pub struct ObjectSyncer<S> {
    syncers: Vec<BoxSyncer<S, Value>>,
}

impl<S> ObjectSyncer<S> {
    /// Create an object syncer from child syncers
    pub fn new(syncers: Vec<BoxSyncer<S, Value>>) -> Self {
        ObjectSyncer { syncers }
    }
}

impl<S> Syncer<S, Value> for ObjectSyncer<S> {
    fn push(
        &self,
        source: &S,
        target: &mut Value,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        let mut failure = Failure::empty();

        for syncer in &self.syncers {
            if let Err(errors) = syncer.push(source, target, options, context) {
                trace!(errors = %errors, "child push failed");
                failure.merge(errors);
            }
        }

        failure.into_outcome(())
    }

    fn pull(
        &self,
        source: &mut S,
        target: &Value,
        options: &Options,
        context: &Context,
    ) -> Outcome<()> {
        let mut failure = Failure::empty();

        for syncer in &self.syncers {
            if let Err(errors) = syncer.pull(source, target, options, context) {
                trace!(errors = %errors, "child pull failed");
                failure.merge(errors);
            }
        }

        failure.into_outcome(())
    }
}
