//! Structural paths into wire values
//!
//! A `Path` locates a position inside a tree value, mixing object keys and
//! array indices. Errors carry paths so that a failure deep inside a nested
//! structure can be reported at its exact location.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step into a tree value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Object key
    Key(String),

    /// Array index
    Index(usize),
}

impl Segment {
    /// Create a key segment
    pub fn key(name: impl Into<String>) -> Self {
        Segment::Key(name.into())
    }

    /// Create an index segment
    pub fn index(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Segment::Key(name.to_string())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Segment::Key(name)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(name) => write!(f, "{name}"),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// An ordered sequence of segments, root first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path, pointing at the root
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Build a path from segments
    pub fn of<I, T>(segments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Segment>,
    {
        Path(segments.into_iter().map(Into::into).collect())
    }

    /// Check whether the path points at the root
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments of the path
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Append a segment
    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    /// Return a new path with `prefix` concatenated before this one
    pub fn sunk_under(&self, prefix: &Path) -> Path {
        let mut segments = prefix.0.clone();
        segments.extend(self.0.iter().cloned());
        Path(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Key(_)) {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<T: Into<Segment>> FromIterator<T> for Path {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Path::of(iter)
    }
}
