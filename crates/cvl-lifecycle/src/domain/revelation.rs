//! Outcome of a successful reveal

use serde::Serialize;
use shared_types::RecordId;
use std::fmt;

/// How a reveal reached the ledger-confirmed verified state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RevealPath {
    /// This call decrypted the value and its proof was accepted.
    Decrypted,
    /// The ledger already reported the record as verified; no crypto work
    /// and no ledger writes were performed.
    AlreadyVerified,
    /// This call's proof submission lost to a concurrent verification; the
    /// ledger's stored value was adopted.
    RaceResolved,
}

impl RevealPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealPath::Decrypted => "decrypted",
            RevealPath::AlreadyVerified => "already_verified",
            RevealPath::RaceResolved => "race_resolved",
        }
    }
}

impl fmt::Display for RevealPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value as confirmed by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Revelation {
    pub record_id: RecordId,
    pub value: u32,
    pub path: RevealPath,
}
