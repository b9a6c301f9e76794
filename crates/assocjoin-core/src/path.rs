//! Dotted property paths identifying which mapped attribute a join satisfies.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dotted path from the query root to a mapped attribute, e.g. `Hero.team.headquarters`.
///
/// Only used for diagnostics; two joins may share a path prefix but never a full path
/// within one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Create a root path (e.g. the entity name).
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Parse a dotted path.
    ///
    /// Whitespace around the path and empty segments (`"team..headquarters"`) are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments = path
            .trim()
            .split('.')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// Return a new path with `property` appended.
    #[must_use]
    pub fn append(&self, property: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(property.into());
        Self { segments }
    }

    /// The parent path, or `None` for a root or empty path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The last segment (the property name).
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for PropertyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
