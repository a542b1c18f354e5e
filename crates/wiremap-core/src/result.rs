//! Success-or-failure results and failure aggregation
//!
//! [`Outcome`] is the return type of every mapping operation. Chaining with
//! `?` or `and_then` gives the short-circuit behavior of the combinator
//! algebra: once a step has failed, downstream steps are not applied and the
//! failure travels outward unchanged.

use std::fmt;

use wiremap_value::{Path, Value};

use crate::error::Error;

/// Result of a mapping operation
pub type Outcome<T> = Result<T, Failure>;

/// An ordered collection of errors describing a failed operation
///
/// A failure is never empty, except as the neutral accumulator used while
/// merging the results of sub-operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Failure {
    errors: Vec<Error>,
}

impl Failure {
    /// Create a failure from a single error
    pub fn new(error: Error) -> Self {
        Failure {
            errors: vec![error],
        }
    }

    /// Create a failure from a list of errors
    pub fn of(errors: Vec<Error>) -> Self {
        Failure { errors }
    }

    /// The neutral accumulator
    pub fn empty() -> Self {
        Failure::default()
    }

    /// Errors that lead to the failure, in traversal order
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Check whether any errors have accumulated
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append another failure's errors
    pub fn merge(&mut self, other: Failure) {
        self.errors.extend(other.errors);
    }

    /// Return a new failure with `prefix` prepended to every error path
    pub fn sink(self, prefix: &Path) -> Self {
        Failure {
            errors: self
                .errors
                .into_iter()
                .map(|error| error.sink(prefix))
                .collect(),
        }
    }

    /// Finish an accumulation: succeed with `value` iff no errors occurred
    pub fn into_outcome<T>(self, value: T) -> Outcome<T> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Render the failure as a wire value for reporting back to clients
    pub fn to_value(&self) -> Value {
        let errors = self.errors.iter().map(Error::to_value).collect::<Vec<_>>();

        Value::object([("errors", Value::Array(errors))])
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Failure::new(error)
    }
}

impl From<crate::error::ErrorKind> for Failure {
    fn from(kind: crate::error::ErrorKind) -> Self {
        Failure::new(Error::new(kind))
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {}

/// Reduce a sequence of results into one result
///
/// Successful values are collected in order. Each failed element has its
/// errors sunk under its position index, and all failures are merged, so
/// independent element failures are reported together with exact locations.
/// Collected values are discarded once any element has failed.
pub fn reduce<T, I>(results: I) -> Outcome<Vec<T>>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    let mut values = Vec::new();
    let mut failure = Failure::empty();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => values.push(value),
            Err(errors) => failure.merge(errors.sink(&Path::of([index]))),
        }
    }

    failure.into_outcome(values)
}
