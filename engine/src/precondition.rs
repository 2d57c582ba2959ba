//! Preconditions: guards that decide whether a mutation may apply.
//!
//! A precondition constrains either the document's existence or its exact
//! update time, never both; the enum makes the combination
//! unrepresentable. An unmet precondition is not an error - the apply
//! paths simply return their input unchanged and the mutation queue
//! decides what that means for the batch.

use crate::{MaybeDocument, SnapshotVersion};
use serde::{Deserialize, Serialize};

/// A guard limiting when a mutation may take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Precondition {
    /// Always valid.
    #[default]
    None,
    /// Valid iff the document exists (`true`) or does not exist (`false`).
    Exists(bool),
    /// Valid iff the document exists at exactly this version.
    UpdateTime(SnapshotVersion),
}

impl Precondition {
    /// Precondition requiring the document to exist (or not).
    pub fn exists(exists: bool) -> Self {
        Precondition::Exists(exists)
    }

    /// Precondition requiring the document's version to equal `version`.
    pub fn update_time(version: SnapshotVersion) -> Self {
        Precondition::UpdateTime(version)
    }

    /// Whether the mutation guarded by this precondition may apply to
    /// `maybe_doc`.
    pub fn is_valid_for(&self, maybe_doc: Option<&MaybeDocument>) -> bool {
        match self {
            Precondition::None => true,
            Precondition::Exists(true) => {
                matches!(maybe_doc, Some(MaybeDocument::Document(_)))
            }
            Precondition::Exists(false) => {
                matches!(maybe_doc, None | Some(MaybeDocument::NoDocument(_)))
            }
            Precondition::UpdateTime(version) => match maybe_doc {
                Some(MaybeDocument::Document(doc)) => doc.version == *version,
                _ => false,
            },
        }
    }
}
