//! Validators
//!
//! A validator checks a value and reports located errors. Validators are
//! supplied externally and consumed by the validated mapper combinator; the
//! predicate form covers most custom validators.

use regex::Regex;

use wiremap_value::Value;

use crate::error::{Error, ErrorKind};
use crate::options::{Context, Options};
use crate::result::{Failure, Outcome};

/// Capability to validate a value
pub trait Validator<T> {
    /// Check `value`, returning located errors on rejection
    fn validate(&self, value: &T, options: &Options, context: &Context) -> Outcome<()>;
}

/// Boxed validator, shareable across threads
pub type BoxValidator<T> = Box<dyn Validator<T> + Send + Sync>;

impl<T, V: Validator<T> + ?Sized> Validator<T> for Box<V> {
    fn validate(&self, value: &T, options: &Options, context: &Context) -> Outcome<()> {
        self.as_ref().validate(value, options, context)
    }
}

/// Accepts everything
///
/// The default in positions where a validator is expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityValidator;

impl<T> Validator<T> for IdentityValidator {
    fn validate(&self, _value: &T, _options: &Options, _context: &Context) -> Outcome<()> {
        Ok(())
    }
}

/// Computes the yes-or-no validity of a value
///
/// Since validity is by nature a predicate, this is the base for most custom
/// validators: pass the error to report and a closure deciding acceptance.
pub struct Predicate<F> {
    error: Error,
    predicate: F,
}

impl<F> Predicate<F> {
    /// Create a validator reporting `error` whenever `predicate` is false
    pub fn new(error: Error, predicate: F) -> Self {
        Predicate { error, predicate }
    }
}

impl<T, F: Fn(&T) -> bool> Validator<T> for Predicate<F> {
    fn validate(&self, value: &T, _options: &Options, _context: &Context) -> Outcome<()> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err(Failure::new(self.error.clone()))
        }
    }
}

/// Validates that a string value matches a regular expression
#[derive(Debug, Clone)]
pub struct RegexpValidator {
    regex: Regex,
}

impl RegexpValidator {
    /// Create a validator from a compiled regex
    pub fn new(regex: Regex) -> Self {
        RegexpValidator { regex }
    }
}

impl Validator<Value> for RegexpValidator {
    fn validate(&self, value: &Value, _options: &Options, _context: &Context) -> Outcome<()> {
        let string = value
            .as_str()
            .ok_or_else(|| Failure::from(ErrorKind::unexpected_type("string", value)))?;

        if self.regex.is_match(string) {
            Ok(())
        } else {
            Err(Failure::from(ErrorKind::NoRegexpMatch {
                pattern: self.regex.as_str().to_string(),
            }))
        }
    }
}

/// Validates that a string's length lies in an inclusive range
#[derive(Debug, Clone, Copy)]
pub struct LengthInRangeValidator {
    min: usize,
    max: usize,
}

impl LengthInRangeValidator {
    /// Create a validator for lengths in `min..=max`
    pub fn new(min: usize, max: usize) -> Self {
        LengthInRangeValidator { min, max }
    }
}

impl Validator<Value> for LengthInRangeValidator {
    fn validate(&self, value: &Value, _options: &Options, _context: &Context) -> Outcome<()> {
        let string = value
            .as_str()
            .ok_or_else(|| Failure::from(ErrorKind::unexpected_type("string", value)))?;

        let length = string.chars().count();
        if length >= self.min && length <= self.max {
            Ok(())
        } else {
            Err(Failure::from(ErrorKind::StringLengthOutOfRange {
                min: self.min,
                max: self.max,
            }))
        }
    }
}
