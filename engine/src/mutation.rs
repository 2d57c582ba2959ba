//! Mutations: the state-transition logic of the offline-first client.
//!
//! A mutation describes one client-issued write. The mutation queue
//! applies it twice: once against the locally cached document to produce
//! an optimistic view ([`Mutation::apply_to_local_view`]), and again once
//! the server acknowledges the write, against the last-known remote
//! document ([`Mutation::apply_to_remote_document`]). Both paths are pure
//! functions.
//!
//! The full transition table:
//!
//! | Mutation  | Applied to               | Results in                        |
//! |-----------|--------------------------|-----------------------------------|
//! | Set       | Document(v)              | Document(v)                       |
//! | Set       | NoDocument(v) / absent   | Document(MIN)                     |
//! | Patch     | Document(v)              | Document(v)                       |
//! | Patch     | NoDocument(v) / absent   | NoDocument(v) / absent            |
//! | Transform | Document(v)              | Document(v)                       |
//! | Transform | NoDocument(v) / absent   | NoDocument(v) / absent            |
//! | Delete    | anything                 | NoDocument(MIN) remotely,         |
//! |           |                          | NoDocument(deleted) locally       |
//!
//! Transform never synthesizes a document from nothing, even though the
//! server would: the client only issues a transform together with a set
//! or patch in the same batch, and only wants the transform applied when
//! that prior step left an actual document behind.
//!
//! # Panics
//!
//! Two disjoint failure channels exist. An unmet [`Precondition`] is an
//! expected condition and the apply paths return their input unchanged.
//! Invariant violations are caller bugs and panic: a mutation applied to
//! a document with a different key, transform results that are missing,
//! mismatched in length, or attached to a non-transform acknowledgment,
//! and a non-document where a satisfied `Exists(true)` guarantees one.

use crate::{
    Document, DocumentKey, FieldMask, FieldTransform, FieldValue, MaybeDocument, NoDocument,
    ObjectValue, Precondition, SnapshotVersion, Timestamp,
};
use serde::{Deserialize, Serialize};

/// The server's acknowledgment of a single mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    /// The version the write was committed at. Absent for deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<SnapshotVersion>,
    /// The values the server computed for a transform mutation's field
    /// transforms, in transform order. Present iff the acknowledged
    /// mutation was a transform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_results: Option<Vec<FieldValue>>,
}

impl MutationResult {
    /// Acknowledgment of a set or patch mutation.
    pub fn acknowledged(version: SnapshotVersion) -> Self {
        Self {
            version: Some(version),
            transform_results: None,
        }
    }

    /// Acknowledgment of a transform mutation, carrying the values the
    /// server computed.
    pub fn with_transform_results(
        version: SnapshotVersion,
        transform_results: Vec<FieldValue>,
    ) -> Self {
        Self {
            version: Some(version),
            transform_results: Some(transform_results),
        }
    }

    /// Acknowledgment of a delete mutation. Deletes commit without a
    /// version.
    pub fn for_delete() -> Self {
        Self {
            version: None,
            transform_results: None,
        }
    }
}

/// A full replacement of a document's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMutation {
    /// The document to write
    pub key: DocumentKey,
    /// The complete new data
    pub value: ObjectValue,
    /// Guard on the prior document state
    pub precondition: Precondition,
}

impl SetMutation {
    /// Create a set mutation.
    pub fn new(key: DocumentKey, value: ObjectValue, precondition: Precondition) -> Self {
        Self {
            key,
            value,
            precondition,
        }
    }

    fn apply_to_remote_document(
        &self,
        maybe_doc: Option<&MaybeDocument>,
        result: &MutationResult,
    ) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);
        assert!(
            result.transform_results.is_none(),
            "transform results in acknowledgment of a set mutation for {}",
            self.key
        );

        // The server validated the precondition before acknowledging, so
        // it is not re-checked here.
        let version = post_mutation_version(maybe_doc);
        Some(MaybeDocument::Document(Document::new(
            self.key.clone(),
            version,
            self.value.clone(),
            false,
        )))
    }

    fn apply_to_local_view(&self, maybe_doc: Option<&MaybeDocument>) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);

        if !self.precondition.is_valid_for(maybe_doc) {
            return maybe_doc.cloned();
        }

        let version = post_mutation_version(maybe_doc);
        Some(MaybeDocument::Document(Document::new(
            self.key.clone(),
            version,
            self.value.clone(),
            true,
        )))
    }
}

/// A partial update of a document, restricted to a field mask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchMutation {
    /// The document to patch
    pub key: DocumentKey,
    /// Candidate values for the masked fields
    pub data: ObjectValue,
    /// The fields this patch may touch
    pub field_mask: FieldMask,
    /// Guard on the prior document state
    pub precondition: Precondition,
}

impl PatchMutation {
    /// Create a patch mutation.
    pub fn new(
        key: DocumentKey,
        data: ObjectValue,
        field_mask: FieldMask,
        precondition: Precondition,
    ) -> Self {
        Self {
            key,
            data,
            field_mask,
            precondition,
        }
    }

    fn apply_to_remote_document(
        &self,
        maybe_doc: Option<&MaybeDocument>,
        result: &MutationResult,
    ) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);
        assert!(
            result.transform_results.is_none(),
            "transform results in acknowledgment of a patch mutation for {}",
            self.key
        );

        // Unlike set, the precondition is re-checked even though the
        // server already validated it: without a cached base document a
        // patch would fill the cache with a partial document built from
        // nothing.
        if !self.precondition.is_valid_for(maybe_doc) {
            return maybe_doc.cloned();
        }

        let version = post_mutation_version(maybe_doc);
        let new_data = self.patch_document(maybe_doc);
        Some(MaybeDocument::Document(Document::new(
            self.key.clone(),
            version,
            new_data,
            false,
        )))
    }

    fn apply_to_local_view(&self, maybe_doc: Option<&MaybeDocument>) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);

        if !self.precondition.is_valid_for(maybe_doc) {
            return maybe_doc.cloned();
        }

        let version = post_mutation_version(maybe_doc);
        let new_data = self.patch_document(maybe_doc);
        Some(MaybeDocument::Document(Document::new(
            self.key.clone(),
            version,
            new_data,
            true,
        )))
    }

    /// Start from the existing document's data (or the empty container)
    /// and apply the patch.
    fn patch_document(&self, maybe_doc: Option<&MaybeDocument>) -> ObjectValue {
        let base = match maybe_doc {
            Some(MaybeDocument::Document(doc)) => doc.data.clone(),
            _ => ObjectValue::empty(),
        };
        self.patch_object(base)
    }

    /// Walk the mask in order: a masked field present in the candidate
    /// data is set, a masked field absent from it is deleted. Fields
    /// outside the mask are untouched; candidate values outside the mask
    /// are ignored entirely.
    fn patch_object(&self, base: ObjectValue) -> ObjectValue {
        let mut data = base;
        for path in self.field_mask.paths() {
            data = match self.data.field(path) {
                Some(value) => data.set(path, value.clone()),
                None => data.delete(path),
            };
        }
        data
    }
}

/// Server-computed field transforms, paired in a batch with a prior set
/// or patch on the same document.
///
/// The precondition is pinned to `Exists(true)` and cannot be overridden:
/// the transform must only apply when the preceding write left an actual
/// document behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformMutation {
    /// The document whose fields are transformed
    pub key: DocumentKey,
    /// The transforms, in application order
    pub field_transforms: Vec<FieldTransform>,
}

impl TransformMutation {
    /// Create a transform mutation.
    pub fn new(key: DocumentKey, field_transforms: Vec<FieldTransform>) -> Self {
        Self {
            key,
            field_transforms,
        }
    }

    /// The precondition, always `Exists(true)`.
    pub fn precondition(&self) -> Precondition {
        Precondition::exists(true)
    }

    fn apply_to_remote_document(
        &self,
        maybe_doc: Option<&MaybeDocument>,
        result: &MutationResult,
    ) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);

        let transform_results = result
            .transform_results
            .as_ref()
            .unwrap_or_else(|| {
                panic!(
                    "acknowledgment of transform mutation for {} is missing transform results",
                    self.key
                )
            });
        assert_eq!(
            transform_results.len(),
            self.field_transforms.len(),
            "server returned {} transform results for {} field transforms on {}",
            transform_results.len(),
            self.field_transforms.len(),
            self.key
        );

        if !self.precondition().is_valid_for(maybe_doc) {
            return maybe_doc.cloned();
        }

        let doc = require_document(&self.key, maybe_doc);
        let new_data = self.transform_object(doc.data.clone(), transform_results);
        // The version carries over from the document the transform
        // applied to; a transform acknowledgment does not reset it.
        Some(MaybeDocument::Document(Document::new(
            self.key.clone(),
            doc.version,
            new_data,
            false,
        )))
    }

    fn apply_to_local_view(
        &self,
        maybe_doc: Option<&MaybeDocument>,
        base_doc: Option<&MaybeDocument>,
        local_write_time: Timestamp,
    ) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);

        if !self.precondition().is_valid_for(maybe_doc) {
            return maybe_doc.cloned();
        }

        let doc = require_document(&self.key, maybe_doc);
        let results = self.local_transform_results(base_doc, local_write_time);
        let new_data = self.transform_object(doc.data.clone(), &results);
        Some(MaybeDocument::Document(Document::new(
            self.key.clone(),
            doc.version,
            new_data,
            true,
        )))
    }

    /// Estimate the server's transform results before it has run.
    ///
    /// `base_doc` is the document state immediately before this mutation
    /// within its batch; previous field values are read from it so a
    /// server-timestamp estimate can carry them.
    fn local_transform_results(
        &self,
        base_doc: Option<&MaybeDocument>,
        local_write_time: Timestamp,
    ) -> Vec<FieldValue> {
        self.field_transforms
            .iter()
            .map(|field_transform| {
                let previous_value = match base_doc {
                    Some(MaybeDocument::Document(doc)) => doc.field(&field_transform.field),
                    _ => None,
                };
                field_transform
                    .transform
                    .local_estimate(previous_value, local_write_time)
            })
            .collect()
    }

    fn transform_object(&self, base: ObjectValue, results: &[FieldValue]) -> ObjectValue {
        debug_assert_eq!(results.len(), self.field_transforms.len());
        let mut data = base;
        for (field_transform, result) in self.field_transforms.iter().zip(results) {
            data = data.set(&field_transform.field, result.clone());
        }
        data
    }
}

/// A deletion of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMutation {
    /// The document to delete
    pub key: DocumentKey,
    /// Guard on the prior document state
    pub precondition: Precondition,
}

impl DeleteMutation {
    /// Create a delete mutation.
    pub fn new(key: DocumentKey, precondition: Precondition) -> Self {
        Self { key, precondition }
    }

    fn apply_to_remote_document(
        &self,
        maybe_doc: Option<&MaybeDocument>,
        result: &MutationResult,
    ) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);
        assert!(
            result.transform_results.is_none(),
            "transform results in acknowledgment of a delete mutation for {}",
            self.key
        );

        // The server validated the precondition before acknowledging.
        // The commit version is intentionally unused: a confirmed delete
        // always lands at MIN.
        Some(MaybeDocument::NoDocument(NoDocument::new(
            self.key.clone(),
            SnapshotVersion::MIN,
        )))
    }

    fn apply_to_local_view(&self, maybe_doc: Option<&MaybeDocument>) -> Option<MaybeDocument> {
        verify_key_matches(&self.key, maybe_doc);

        if !self.precondition.is_valid_for(maybe_doc) {
            return maybe_doc.cloned();
        }

        // A local delete is a tombstone pending server confirmation; its
        // version is the deleted sentinel, distinct from MIN.
        Some(MaybeDocument::NoDocument(NoDocument::new(
            self.key.clone(),
            SnapshotVersion::for_deleted_doc(),
        )))
    }
}

/// One client-issued document write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    Set(SetMutation),
    Patch(PatchMutation),
    Transform(TransformMutation),
    Delete(DeleteMutation),
}

impl Mutation {
    /// The key of the document this mutation targets.
    pub fn key(&self) -> &DocumentKey {
        match self {
            Mutation::Set(m) => &m.key,
            Mutation::Patch(m) => &m.key,
            Mutation::Transform(m) => &m.key,
            Mutation::Delete(m) => &m.key,
        }
    }

    /// The guard limiting when this mutation may take effect.
    pub fn precondition(&self) -> Precondition {
        match self {
            Mutation::Set(m) => m.precondition,
            Mutation::Patch(m) => m.precondition,
            Mutation::Transform(m) => m.precondition(),
            Mutation::Delete(m) => m.precondition,
        }
    }

    /// Compute the authoritative document state after the server has
    /// acknowledged this mutation with `result`.
    ///
    /// `maybe_doc` is the last document state known from the server, or
    /// `None` when nothing is known about the key.
    ///
    /// # Panics
    ///
    /// Panics on invariant violations: a present `maybe_doc` whose key
    /// differs from the mutation's, transform results missing or
    /// length-mismatched for a transform mutation, transform results
    /// present for any other mutation, or a non-document behind a
    /// satisfied `Exists(true)` precondition.
    pub fn apply_to_remote_document(
        &self,
        maybe_doc: Option<&MaybeDocument>,
        result: &MutationResult,
    ) -> Option<MaybeDocument> {
        match self {
            Mutation::Set(m) => m.apply_to_remote_document(maybe_doc, result),
            Mutation::Patch(m) => m.apply_to_remote_document(maybe_doc, result),
            Mutation::Transform(m) => m.apply_to_remote_document(maybe_doc, result),
            Mutation::Delete(m) => m.apply_to_remote_document(maybe_doc, result),
        }
    }

    /// Compute the optimistic local document state before the server has
    /// acknowledged this mutation.
    ///
    /// `maybe_doc` is the current cached state; `base_doc` is the state
    /// immediately prior to this mutation within its batch (consulted
    /// only by transform mutations, for previous field values);
    /// `local_write_time` stamps locally estimated server timestamps.
    ///
    /// # Panics
    ///
    /// Panics when a present `maybe_doc` has a different key than the
    /// mutation, or when a non-document sits behind a satisfied
    /// `Exists(true)` precondition.
    pub fn apply_to_local_view(
        &self,
        maybe_doc: Option<&MaybeDocument>,
        base_doc: Option<&MaybeDocument>,
        local_write_time: Timestamp,
    ) -> Option<MaybeDocument> {
        match self {
            Mutation::Set(m) => m.apply_to_local_view(maybe_doc),
            Mutation::Patch(m) => m.apply_to_local_view(maybe_doc),
            Mutation::Transform(m) => {
                m.apply_to_local_view(maybe_doc, base_doc, local_write_time)
            }
            Mutation::Delete(m) => m.apply_to_local_view(maybe_doc),
        }
    }
}

/// The version an acknowledged write leaves a document at: the existing
/// document's version if there was one, else MIN.
fn post_mutation_version(maybe_doc: Option<&MaybeDocument>) -> SnapshotVersion {
    match maybe_doc {
        Some(MaybeDocument::Document(doc)) => doc.version,
        _ => SnapshotVersion::MIN,
    }
}

/// A mutation may only ever be applied to its own document.
fn verify_key_matches(key: &DocumentKey, maybe_doc: Option<&MaybeDocument>) {
    if let Some(doc) = maybe_doc {
        assert_eq!(
            doc.key(),
            key,
            "mutation for {} applied to document {}",
            key,
            doc.key()
        );
    }
}

/// A satisfied `Exists(true)` precondition guarantees a document; anything
/// else at this point is corrupted state.
fn require_document<'a>(key: &DocumentKey, maybe_doc: Option<&'a MaybeDocument>) -> &'a Document {
    match maybe_doc {
        Some(MaybeDocument::Document(doc)) => doc,
        _ => panic!("transform mutation for {} requires an existing document", key),
    }
}
