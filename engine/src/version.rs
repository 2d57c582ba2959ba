//! Snapshot versions: logical timestamps assigned by the server.
//!
//! Two sentinels exist for "no real server version" and they must stay
//! distinguishable. [`SnapshotVersion::MIN`] marks state the server has
//! confirmed (a remote delete, or a document that never existed), while
//! [`SnapshotVersion::for_deleted_doc`] marks a client-side tombstone
//! still waiting for acknowledgment.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// A totally ordered logical timestamp a document was read or written at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotVersion(Timestamp);

impl SnapshotVersion {
    /// The smallest possible version; also the version of documents the
    /// server confirmed as nonexistent.
    pub const MIN: SnapshotVersion = SnapshotVersion(Timestamp::new(0, 0));

    /// Create a version from a timestamp.
    pub const fn from_timestamp(timestamp: Timestamp) -> Self {
        Self(timestamp)
    }

    /// The version marking a locally deleted document (a tombstone pending
    /// server confirmation). Compares distinct from [`SnapshotVersion::MIN`].
    pub const fn for_deleted_doc() -> Self {
        Self(Timestamp::new(0, 1))
    }

    /// The underlying timestamp.
    pub fn timestamp(&self) -> Timestamp {
        self.0
    }
}
