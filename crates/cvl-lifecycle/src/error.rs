//! Error types for the lifecycle core
//!
//! Every failure of `create`, `reveal` and `refresh` is one of these kinds.
//! Collaborator errors (`LedgerError`, `CryptoError`) are mapped into the
//! taxonomy at the coordinator boundary and their text is kept verbatim in
//! the `reason` fields.

use thiserror::Error;

/// Why a state-changing submission did not reach the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionFailure {
    /// The signer (wallet) declined to sign.
    #[error("rejected by signer: {reason}")]
    RejectedBySigner { reason: String },

    /// The ledger refused the call or could not be reached.
    #[error("rejected by ledger: {reason}")]
    RejectedByLedger { reason: String },
}

/// Why a submitted write did not reach finality.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfirmationFailure {
    #[error("timed out waiting for finality")]
    Timeout,

    #[error("transaction reverted: {reason}")]
    Reverted { reason: String },
}

/// Why a verification submission failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    /// The ledger already holds a verified plaintext for the record.
    ///
    /// Recovered locally by the coordinator; callers only see it if the
    /// follow-up re-fetch cannot confirm the verified state.
    #[error("record already verified")]
    AlreadyVerified,

    /// The ledger did not accept the decryption proof.
    #[error("decryption proof rejected: {reason}")]
    ProofRejected { reason: String },

    /// The signer declined the verification transaction.
    #[error("verification rejected by signer: {reason}")]
    RejectedBySigner { reason: String },

    /// Any other ledger failure (network, timeout, unrelated revert).
    #[error("ledger error: {reason}")]
    Ledger { reason: String },
}

/// Lifecycle core errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The session is not `Ready`; no collaborator was called.
    #[error("Session not initialized (state: {state})")]
    NotInitialized { state: String },

    /// Input outside the declared domain or a missing required field.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Encryption failed: {reason}")]
    Encryption { reason: String },

    #[error("Submission failed: {0}")]
    Submission(SubmissionFailure),

    #[error("Confirmation failed: {0}")]
    Confirmation(ConfirmationFailure),

    #[error("Failed to fetch confidential handle: {reason}")]
    HandleFetch { reason: String },

    #[error("Decryption failed: {reason}")]
    Decryption { reason: String },

    #[error("Verification failed: {0}")]
    Verification(VerificationFailure),

    /// A read-only listing or snapshot fetch failed, or never reflected a
    /// confirmed write.
    #[error("Failed to fetch record: {reason}")]
    RecordFetch { reason: String },
}

impl LifecycleError {
    /// Short human-readable summary for the presentation layer.
    pub fn user_message(&self) -> &'static str {
        match self {
            LifecycleError::NotInitialized { .. } => "Crypto engine not initialized",
            LifecycleError::Validation { .. } => "Invalid input",
            LifecycleError::Encryption { .. } => "Encryption failed",
            LifecycleError::Submission(SubmissionFailure::RejectedBySigner { .. }) => {
                "Transaction rejected"
            }
            LifecycleError::Submission(SubmissionFailure::RejectedByLedger { .. }) => {
                "Submission failed"
            }
            LifecycleError::Confirmation(ConfirmationFailure::Timeout) => {
                "Confirmation timed out"
            }
            LifecycleError::Confirmation(ConfirmationFailure::Reverted { .. }) => {
                "Transaction reverted"
            }
            LifecycleError::HandleFetch { .. } => "Could not load encrypted value",
            LifecycleError::Decryption { .. } => "Decryption failed",
            LifecycleError::Verification(VerificationFailure::AlreadyVerified) => {
                "Data already verified"
            }
            LifecycleError::Verification(VerificationFailure::ProofRejected { .. }) => {
                "Decryption proof rejected"
            }
            LifecycleError::Verification(VerificationFailure::RejectedBySigner { .. }) => {
                "Transaction rejected"
            }
            LifecycleError::Verification(VerificationFailure::Ledger { .. }) => {
                "Verification failed"
            }
            LifecycleError::RecordFetch { .. } => "Failed to load data",
        }
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleError::NotInitialized { .. } => "not_initialized",
            LifecycleError::Validation { .. } => "validation",
            LifecycleError::Encryption { .. } => "encryption",
            LifecycleError::Submission(SubmissionFailure::RejectedBySigner { .. }) => {
                "submission_rejected_by_signer"
            }
            LifecycleError::Submission(SubmissionFailure::RejectedByLedger { .. }) => {
                "submission_rejected_by_ledger"
            }
            LifecycleError::Confirmation(ConfirmationFailure::Timeout) => "confirmation_timeout",
            LifecycleError::Confirmation(ConfirmationFailure::Reverted { .. }) => {
                "confirmation_reverted"
            }
            LifecycleError::HandleFetch { .. } => "handle_fetch",
            LifecycleError::Decryption { .. } => "decryption",
            LifecycleError::Verification(VerificationFailure::AlreadyVerified) => {
                "verification_already_verified"
            }
            LifecycleError::Verification(VerificationFailure::ProofRejected { .. }) => {
                "verification_proof_rejected"
            }
            LifecycleError::Verification(VerificationFailure::RejectedBySigner { .. }) => {
                "verification_rejected_by_signer"
            }
            LifecycleError::Verification(VerificationFailure::Ledger { .. }) => {
                "verification_ledger"
            }
            LifecycleError::RecordFetch { .. } => "record_fetch",
        }
    }
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
