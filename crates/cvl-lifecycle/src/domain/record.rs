//! Cached view of a published record
//!
//! A `Record` can only be built from a ledger snapshot. The revealed value
//! lives inside `ConfidentialityState::Verified`, so a record cannot carry a
//! value without being verified, and no constructor accepts a locally
//! decrypted plaintext.

use serde::Serialize;
use shared_types::{ConfidentialHandle, Identity, PublicAttributes, RecordId, RecordSnapshot};

/// Confidentiality state of a record.
///
/// ```text
/// [UNVERIFIED] ──ledger accepts decryption proof──→ [VERIFIED { value }]
/// ```
///
/// `Verified` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Default)]
pub enum ConfidentialityState {
    #[default]
    Unverified,
    Verified { revealed_value: u32 },
}

impl ConfidentialityState {
    fn from_snapshot(snapshot: &RecordSnapshot) -> Self {
        match snapshot.verified_value() {
            Some(revealed_value) => Self::Verified { revealed_value },
            None => Self::Unverified,
        }
    }
}

/// Result of merging a newer snapshot into a cached record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotMerge {
    /// Nothing observable changed.
    Unchanged,
    /// The snapshot carried the first verified state for this record.
    BecameVerified,
    /// The snapshot reported `Unverified` for a record already cached as
    /// `Verified`; the cached state was kept.
    StaleIgnored,
    /// The snapshot reported a different revealed value; the first one was kept.
    ConflictIgnored,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    id: RecordId,
    attributes: PublicAttributes,
    creator: Identity,
    timestamp: u64,
    handle: Option<ConfidentialHandle>,
    state: ConfidentialityState,
}

impl Record {
    pub fn from_snapshot(snapshot: &RecordSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            attributes: snapshot.attributes(),
            creator: snapshot.creator,
            timestamp: snapshot.timestamp,
            handle: None,
            state: ConfidentialityState::from_snapshot(snapshot),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn attributes(&self) -> &PublicAttributes {
        &self.attributes
    }

    pub fn creator(&self) -> Identity {
        self.creator
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Handle of the encrypted value, once learned from the ledger.
    pub fn handle(&self) -> Option<ConfidentialHandle> {
        self.handle
    }

    pub fn state(&self) -> ConfidentialityState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.state, ConfidentialityState::Verified { .. })
    }

    /// Present iff the record is verified.
    pub fn revealed_value(&self) -> Option<u32> {
        match self.state {
            ConfidentialityState::Verified { revealed_value } => Some(revealed_value),
            ConfidentialityState::Unverified => None,
        }
    }

    /// Merge a newer ledger snapshot without ever leaving `Verified` or
    /// changing a revealed value.
    pub fn apply_snapshot(&mut self, snapshot: &RecordSnapshot) -> SnapshotMerge {
        match (self.state, ConfidentialityState::from_snapshot(snapshot)) {
            (ConfidentialityState::Unverified, ConfidentialityState::Unverified) => {
                SnapshotMerge::Unchanged
            }
            (ConfidentialityState::Unverified, verified) => {
                self.state = verified;
                SnapshotMerge::BecameVerified
            }
            (ConfidentialityState::Verified { .. }, ConfidentialityState::Unverified) => {
                SnapshotMerge::StaleIgnored
            }
            (
                ConfidentialityState::Verified { revealed_value: cached },
                ConfidentialityState::Verified { revealed_value: fresh },
            ) => {
                if cached == fresh {
                    SnapshotMerge::Unchanged
                } else {
                    SnapshotMerge::ConflictIgnored
                }
            }
        }
    }

    /// Record the handle learned from the ledger. Returns false if a
    /// different handle is already attached.
    pub fn attach_handle(&mut self, handle: ConfidentialHandle) -> bool {
        match self.handle {
            None => {
                self.handle = Some(handle);
                true
            }
            Some(existing) => existing == handle,
        }
    }
}
