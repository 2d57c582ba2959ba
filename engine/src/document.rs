//! Document types: what the client knows about a single key.
//!
//! Knowledge about a document comes in exactly two shapes: a [`Document`]
//! (it exists, with data) or a [`NoDocument`] (it is known not to exist).
//! "Never heard of it" is expressed as `Option<MaybeDocument>::None` at
//! the API boundary rather than a third shape.

use crate::{FieldPath, FieldValue, ObjectValue, SnapshotVersion};
use serde::{Deserialize, Serialize};

/// The identity of a document. Opaque to the engine; only equality and
/// ordering matter here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Create a key from a path string such as `"users/alice"`.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The key's path string.
    pub fn path(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document that exists, together with its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The document's identity
    pub key: DocumentKey,
    /// The version the document was last read or written at
    pub version: SnapshotVersion,
    /// The document's fields
    pub data: ObjectValue,
    /// Whether this view still carries writes the server has not confirmed
    pub has_local_mutations: bool,
}

impl Document {
    /// Create a document.
    pub fn new(
        key: DocumentKey,
        version: SnapshotVersion,
        data: ObjectValue,
        has_local_mutations: bool,
    ) -> Self {
        Self {
            key,
            version,
            data,
            has_local_mutations,
        }
    }

    /// Look up a field by path.
    pub fn field(&self, path: &FieldPath) -> Option<&FieldValue> {
        self.data.field(path)
    }
}

/// A document that is known not to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoDocument {
    /// The document's identity
    pub key: DocumentKey,
    /// The version this nonexistence was established at
    pub version: SnapshotVersion,
}

impl NoDocument {
    /// Create a nonexistence marker.
    pub fn new(key: DocumentKey, version: SnapshotVersion) -> Self {
        Self { key, version }
    }
}

/// What the client knows about a document: it exists, or it does not.
///
/// Absence of any knowledge is `Option<MaybeDocument>::None` in the apply
/// APIs, not a variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MaybeDocument {
    Document(Document),
    NoDocument(NoDocument),
}

impl MaybeDocument {
    /// The key this knowledge is about.
    pub fn key(&self) -> &DocumentKey {
        match self {
            MaybeDocument::Document(doc) => &doc.key,
            MaybeDocument::NoDocument(no_doc) => &no_doc.key,
        }
    }

    /// The version of this knowledge.
    pub fn version(&self) -> SnapshotVersion {
        match self {
            MaybeDocument::Document(doc) => doc.version,
            MaybeDocument::NoDocument(no_doc) => no_doc.version,
        }
    }

    /// The document, if this is an existing one.
    pub fn document(&self) -> Option<&Document> {
        match self {
            MaybeDocument::Document(doc) => Some(doc),
            MaybeDocument::NoDocument(_) => None,
        }
    }

    /// Whether this is an existing document.
    pub fn is_document(&self) -> bool {
        matches!(self, MaybeDocument::Document(_))
    }
}

impl From<Document> for MaybeDocument {
    fn from(doc: Document) -> Self {
        MaybeDocument::Document(doc)
    }
}

impl From<NoDocument> for MaybeDocument {
    fn from(no_doc: NoDocument) -> Self {
        MaybeDocument::NoDocument(no_doc)
    }
}
