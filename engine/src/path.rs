//! Field paths and field masks.
//!
//! A [`FieldPath`] names a (possibly nested) field inside a document,
//! written in dotted notation: `address.city`. A [`FieldMask`] is the
//! ordered list of paths a patch is allowed to touch.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A path to a field inside a document's data.
///
/// Paths are non-empty sequences of non-empty segments. They order
/// lexicographically by segment, which gives masks and transforms a
/// stable, deterministic ordering when the host wants one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create a field path from pre-split segments.
    ///
    /// Returns [`Error::InvalidFieldPath`] if the path has no segments or
    /// any segment is empty.
    pub fn new(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(Error::InvalidFieldPath(segments.join(".")));
        }
        Ok(Self { segments })
    }

    /// Parse a dotted path such as `"address.city"`.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidFieldPath(path.to_string()));
        }
        Self::new(path.split('.').map(str::to_string).collect())
            .map_err(|_| Error::InvalidFieldPath(path.to_string()))
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Field paths are never empty; provided for clippy symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The last segment (the field name itself).
    pub fn last_segment(&self) -> &str {
        self.segments.last().expect("field paths are non-empty")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// The ordered set of field paths a patch mutation touches.
///
/// Equality is order-sensitive sequence equality: the engine neither
/// deduplicates nor sorts the paths it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMask {
    paths: Vec<FieldPath>,
}

impl FieldMask {
    /// Create a mask from an ordered list of paths.
    pub fn new(paths: Vec<FieldPath>) -> Self {
        Self { paths }
    }

    /// The paths, in the order the mask was constructed with.
    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// Whether the mask contains no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
