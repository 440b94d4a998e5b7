//! # Core Domain Entities
//!
//! Defines the values exchanged with the ledger client and the crypto engine.
//!
//! ## Clusters
//!
//! - **Identity**: `Identity`, `ContractAddress`
//! - **Records**: `RecordId`, `PublicAttributes`, `RecordSnapshot`
//! - **Confidential values**: `ConfidentialHandle`, `EncryptedInput`,
//!   `DecryptionProof`, `DecryptionResult`
//! - **Ledger writes**: `CreateRecordRequest`, `VerificationRequest`,
//!   `PendingReceipt`, `ConfirmedReceipt`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// A 32-byte hash (e.g., Keccak-256 / SHA3-256).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// The client identity (connected wallet account) that signs ledger writes
/// and owns the crypto engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Identity(pub Address);

impl Identity {
    /// Hex representation with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Address of the record contract on the ledger.
///
/// The crypto engine scopes both encryption (confidentiality context) and
/// decryption proofs (verification context) to this address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ContractAddress(pub Address);

impl ContractAddress {
    /// Hex representation with `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// =============================================================================
// CLUSTER B: RECORDS
// =============================================================================

/// Opaque, immutable identifier of a published record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an identifier returned by the ledger.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier for a record about to be created.
    pub fn generate() -> Self {
        Self(format!("job-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext attributes published alongside the confidential value.
///
/// `required_level` is a threshold on the same scale as the confidential
/// value but is deliberately public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAttributes {
    /// Record title (e.g. job title).
    pub title: String,
    /// Public required level.
    pub required_level: u32,
    /// Salary bracket in thousands.
    pub salary_bracket: u32,
    /// Free-form description stored with the record.
    pub description: String,
}

impl PublicAttributes {
    /// Default description attached to new records.
    pub const DEFAULT_DESCRIPTION: &'static str = "Job Position";

    pub fn new(title: impl Into<String>, required_level: u32, salary_bracket: u32) -> Self {
        Self {
            title: title.into(),
            required_level,
            salary_bracket,
            description: Self::DEFAULT_DESCRIPTION.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A read-only view of a record as currently stored on the ledger.
///
/// `decrypted_value` is only meaningful when `is_verified` is true; ledgers
/// report zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub id: RecordId,
    pub title: String,
    pub required_level: u32,
    pub salary_bracket: u32,
    pub description: String,
    /// Account that created the record.
    pub creator: Identity,
    /// Unix timestamp (seconds) of the creating block.
    pub timestamp: u64,
    pub is_verified: bool,
    pub decrypted_value: u32,
}

impl RecordSnapshot {
    /// Public attributes carried by this snapshot.
    pub fn attributes(&self) -> PublicAttributes {
        PublicAttributes {
            title: self.title.clone(),
            required_level: self.required_level,
            salary_bracket: self.salary_bracket,
            description: self.description.clone(),
        }
    }

    /// The revealed value, if the ledger reports the record as verified.
    pub fn verified_value(&self) -> Option<u32> {
        self.is_verified.then_some(self.decrypted_value)
    }
}

// =============================================================================
// CLUSTER C: CONFIDENTIAL VALUES
// =============================================================================

/// Opaque reference by which the ledger identifies a stored ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ConfidentialHandle(pub Hash);

impl fmt::Display for ConfidentialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Ciphertext bytes produced by the crypto engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext(pub Vec<u8>);

/// Zero-knowledge proof that a ciphertext is well formed and bound to the
/// submitting identity and contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

/// Output of the crypto engine's encryption step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedInput {
    pub ciphertext: Ciphertext,
    pub input_proof: InputProof,
}

/// Evidence that a set of clear values corresponds to a set of handles,
/// checkable by the ledger without trusting the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionProof(pub Vec<u8>);

/// Output of the crypto engine's public-decryption step.
///
/// The engine never submits this itself; the coordinator owns the ledger
/// submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionResult {
    /// Clear value per requested handle.
    pub clear_values: HashMap<ConfidentialHandle, u32>,
    /// Clear values ABI-encoded in request order, as covered by `proof`.
    pub abi_encoded_clear_values: Vec<u8>,
    pub proof: DecryptionProof,
}

impl DecryptionResult {
    pub fn value_for(&self, handle: &ConfidentialHandle) -> Option<u32> {
        self.clear_values.get(handle).copied()
    }
}

// =============================================================================
// CLUSTER D: LEDGER WRITES
// =============================================================================

/// Payload of the record creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    pub id: RecordId,
    pub attributes: PublicAttributes,
    pub encrypted: EncryptedInput,
    /// Signing account.
    pub sender: Identity,
}

/// Payload of the verification entry point call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub id: RecordId,
    pub abi_encoded_clear_values: Vec<u8>,
    pub proof: DecryptionProof,
    /// Signing account.
    pub sender: Identity,
}

/// Transaction hash of a submitted write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TxHash(pub Hash);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// A write accepted for inclusion but not yet final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReceipt {
    pub tx_hash: TxHash,
}

/// A write that reached finality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
}
