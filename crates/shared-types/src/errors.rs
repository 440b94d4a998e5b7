//! # Error Types
//!
//! Errors reported by the external collaborators. The lifecycle core maps
//! these into its own taxonomy.

use crate::entities::{ConfidentialHandle, Identity, RecordId, TxHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable reason attached to a ledger rejection or revert.
///
/// The lifecycle core branches on this code, never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevertCode {
    /// The record already holds a verified plaintext.
    AlreadyVerified,
    /// The decryption proof did not verify.
    InvalidProof,
    /// The ciphertext input proof did not verify.
    InvalidInputProof,
    /// No record with the given id exists.
    RecordNotFound,
    /// A record with the given id already exists.
    DuplicateRecord,
    /// The ledger did not report a structured reason.
    Unspecified,
}

/// Errors returned by the ledger client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The signer (wallet) refused to sign the transaction.
    #[error("Rejected by signer: {reason}")]
    RejectedBySigner { reason: String },

    /// The ledger refused the call before inclusion.
    #[error("Rejected by ledger ({code:?}): {reason}")]
    Rejected { code: RevertCode, reason: String },

    /// Transport failure reaching the ledger.
    #[error("Network error: {0}")]
    Network(String),

    /// Finality was not observed within the client's own deadline.
    #[error("Timed out waiting for finality of {tx_hash}")]
    FinalityTimeout { tx_hash: TxHash },

    /// The transaction was included but reverted.
    #[error("Transaction {tx_hash} reverted ({code:?}): {reason}")]
    Reverted {
        tx_hash: TxHash,
        code: RevertCode,
        reason: String,
    },

    /// The receipt refers to a transaction the ledger does not know.
    #[error("Unknown transaction: {0}")]
    UnknownTransaction(TxHash),

    /// A read referenced a record that does not exist.
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),
}

impl LedgerError {
    /// Structured revert reason, when the ledger supplied one.
    pub fn revert_code(&self) -> Option<RevertCode> {
        match self {
            LedgerError::Rejected { code, .. } | LedgerError::Reverted { code, .. } => Some(*code),
            LedgerError::RecordNotFound(_) => Some(RevertCode::RecordNotFound),
            _ => None,
        }
    }

    /// True when the ledger reports the record as already verified.
    pub fn is_already_verified(&self) -> bool {
        self.revert_code() == Some(RevertCode::AlreadyVerified)
    }
}

/// Errors returned by the crypto engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material or proof parameters could not be established.
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// The engine has no session for this identity.
    #[error("Engine not initialized for {0}")]
    NotInitialized(Identity),

    /// Encryption or input-proof generation failed.
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Public decryption or proof generation failed.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// The handle is not known to the decryption service.
    #[error("Unknown handle: {0}")]
    UnknownHandle(ConfidentialHandle),
}

/// Errors decoding ABI-encoded clear values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Payload length is not a whole number of 32-byte words.
    #[error("Payload length {len} is not a multiple of 32")]
    MisalignedPayload { len: usize },

    /// A word does not fit the 32-bit value type.
    #[error("Word {index} exceeds the 32-bit value range")]
    ValueOutOfRange { index: usize },
}
