//! # Harbor Engine
//!
//! The document mutation engine for Harbor's offline-first client.
//!
//! This crate computes document state transitions: given what the client
//! knows about a document and a description of a write, it produces the
//! new document state. It is the conflict-resolution primitive under the
//! client's mutation queue, which uses it twice per write - once to build
//! an optimistic local view before the server responds, and once to
//! reconcile against the last-known remote document after the server
//! acknowledges.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine knows nothing about storage, network, or
//!   platform; the mutation queue feeds documents in and stores results
//! - **Pure**: both apply paths are side-effect-free functions; the same
//!   inputs always produce the same outputs
//! - **Immutable values**: every entity is a value object, safe to share
//!   and reuse across threads without locking
//!
//! ## Core Concepts
//!
//! ### Documents
//!
//! What the client knows about a key is a [`MaybeDocument`]: either a
//! [`Document`] with data and a version, or a [`NoDocument`] marker for
//! confirmed nonexistence. No knowledge at all is plain `None`.
//!
//! ### Mutations
//!
//! Writes are expressed as [`Mutation`] values, not direct edits:
//! - [`SetMutation`] - replace a document's data wholesale
//! - [`PatchMutation`] - update the fields named by a [`FieldMask`]
//! - [`TransformMutation`] - apply server-computed field values (for now,
//!   server timestamps)
//! - [`DeleteMutation`] - delete the document
//!
//! Each carries a [`Precondition`] restricting when it may take effect.
//! An unmet precondition is not an error; the apply paths hand back the
//! input unchanged and the mutation queue decides what to do with the
//! batch.
//!
//! ### Acknowledgments
//!
//! When the server commits a write it answers with a [`MutationResult`]:
//! the commit version and, for transforms, the values it computed.
//! [`Mutation::apply_to_remote_document`] folds that acknowledgment into
//! the authoritative view.
//!
//! ## Quick Start
//!
//! ```rust
//! use harbor_engine::{
//!     DocumentKey, Mutation, MutationResult, ObjectValue, Precondition, SetMutation,
//!     SnapshotVersion, Timestamp,
//! };
//! use serde_json::json;
//!
//! let key = DocumentKey::new("users/alice");
//! let value = ObjectValue::from_value(json!({"name": "Alice"})).unwrap();
//! let mutation = Mutation::Set(SetMutation::new(key, value, Precondition::None));
//!
//! // Optimistic view, before the server has seen the write.
//! let local = mutation
//!     .apply_to_local_view(None, None, Timestamp::from_millis(1_706_745_600_000))
//!     .unwrap();
//! assert!(local.document().unwrap().has_local_mutations);
//! assert_eq!(local.version(), SnapshotVersion::MIN);
//!
//! // Authoritative view, after the server acknowledges it.
//! let commit = SnapshotVersion::from_timestamp(Timestamp::from_millis(1_706_745_601_000));
//! let remote = mutation
//!     .apply_to_remote_document(None, &MutationResult::acknowledged(commit))
//!     .unwrap();
//! assert!(!remote.document().unwrap().has_local_mutations);
//! ```
//!
//! ## Persistence
//!
//! Every type here serializes through serde with a stable JSON shape, so
//! the host can persist queued mutations and cached documents however it
//! likes. No storage or wire format is defined by this crate.

pub mod document;
pub mod error;
pub mod mutation;
pub mod path;
pub mod precondition;
pub mod timestamp;
pub mod transform;
pub mod value;
pub mod version;

// Re-export main types at crate root
pub use document::{Document, DocumentKey, MaybeDocument, NoDocument};
pub use error::{Error, Result};
pub use mutation::{
    DeleteMutation, Mutation, MutationResult, PatchMutation, SetMutation, TransformMutation,
};
pub use path::{FieldMask, FieldPath};
pub use precondition::Precondition;
pub use timestamp::Timestamp;
pub use transform::{
    estimate_local_write_time, estimate_previous_value, is_server_timestamp_estimate,
    server_timestamp_estimate, FieldTransform, TransformOperation,
};
pub use value::ObjectValue;
pub use version::SnapshotVersion;

/// The type document field values are expressed in.
pub type FieldValue = serde_json::Value;
