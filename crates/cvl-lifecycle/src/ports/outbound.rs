//! Driven Ports (SPI - Outbound Dependencies)

use async_trait::async_trait;
use shared_bus::LifecycleEvent;
use shared_types::{
    ConfidentialHandle, ConfirmedReceipt, ContractAddress, CreateRecordRequest, CryptoError,
    DecryptionResult, EncryptedInput, Identity, LedgerError, PendingReceipt, RecordId,
    RecordSnapshot, StatusNotice, VerificationRequest,
};

/// Access to the ledger hosting the record contract.
///
/// Every read may be stale with respect to a write that was just confirmed.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit the record creation call.
    async fn submit_create(
        &self,
        request: CreateRecordRequest,
    ) -> Result<PendingReceipt, LedgerError>;

    /// Wait until a submitted write is final.
    async fn await_finality(
        &self,
        receipt: &PendingReceipt,
    ) -> Result<ConfirmedReceipt, LedgerError>;

    async fn get_all_record_ids(&self) -> Result<Vec<RecordId>, LedgerError>;

    async fn get_record(&self, id: &RecordId) -> Result<RecordSnapshot, LedgerError>;

    async fn get_confidential_handle(
        &self,
        id: &RecordId,
    ) -> Result<ConfidentialHandle, LedgerError>;

    /// Submit clear values and their decryption proof to the verification
    /// entry point.
    ///
    /// A record that is already verified is rejected with
    /// `RevertCode::AlreadyVerified`.
    async fn submit_verification(
        &self,
        request: VerificationRequest,
    ) -> Result<PendingReceipt, LedgerError>;
}

/// Homomorphic encryption capability bound to the connected identity.
#[async_trait]
pub trait CryptoEngine: Send + Sync {
    /// Establish key material and proof parameters for `identity`.
    async fn initialize(&self, identity: Identity) -> Result<(), CryptoError>;

    /// Encrypt `value` for `identity` under the record contract's
    /// confidentiality context, with an input validity proof.
    async fn encrypt(
        &self,
        context: ContractAddress,
        identity: Identity,
        value: u32,
    ) -> Result<EncryptedInput, CryptoError>;

    /// Publicly decrypt `handles` and produce a proof scoped to the record
    /// contract's verification context.
    ///
    /// Never submits anything to the ledger; the caller owns that step.
    async fn decrypt_with_proof(
        &self,
        context: ContractAddress,
        handles: &[ConfidentialHandle],
    ) -> Result<DecryptionResult, CryptoError>;
}

/// Sink for user-facing status notices and lifecycle events.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn notify(&self, notice: StatusNotice);

    /// Record and session events. Ignored unless the sink cares.
    async fn emit(&self, _event: LifecycleEvent) {}
}
