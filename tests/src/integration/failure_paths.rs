//! # Failure Paths
//!
//! Every collaborator failure of `create` and `reveal` surfaces as its own
//! error kind with one terminal notice, and leaves the cache as it was.
//!
//! ## Scenarios:
//!
//! 1. **Create**: encryption, submission and a reverted confirmation
//! 2. **Reveal**: handle fetch, decryption and a signer refusing the
//!    verification transaction
//!
//! After each failure the existing record still reveals normally.

#[cfg(test)]
mod tests {
    use crate::harness::Harness;
    use cvl_lifecycle::adapters::LedgerCall;
    use cvl_lifecycle::{
        ConfidentialRecordApi, ConfidentialityState, ConfirmationFailure, LifecycleError, Record,
        RevealPath, SubmissionFailure, VerificationFailure,
    };
    use shared_types::{
        CryptoError, LedgerError, NoticeStatus, OperationKind, PublicAttributes, RevertCode,
        TxHash,
    };

    fn engineer() -> PublicAttributes {
        PublicAttributes::new("Engineer", 5, 120)
    }

    /// Connected harness holding one unverified record with value 7.
    async fn with_record() -> (Harness, Record) {
        let harness = Harness::connected().await;
        let record = harness.coordinator.create(engineer(), 7).await.unwrap();
        harness.notifier.clear();
        (harness, record)
    }

    /// The last notice ends `kind` with `message`, and it is the only
    /// terminal notice emitted since the last clear.
    fn assert_failed_with(harness: &Harness, kind: OperationKind, message: &str) {
        let notices = harness.notifier.notices();
        let terminal: Vec<_> = notices
            .iter()
            .filter(|n| n.status != NoticeStatus::Pending)
            .collect();
        assert_eq!(terminal.len(), 1);

        let last = notices.last().unwrap();
        assert_eq!(last.kind, kind);
        assert_eq!(last.status, NoticeStatus::Failed);
        assert_eq!(last.message, message);
        assert!(notices.iter().all(|n| n.operation_id == last.operation_id));
    }

    /// The cache still holds `record` alone, unverified, and it reveals
    /// normally. The handle may have been learned by the failed reveal.
    async fn assert_record_intact(harness: &Harness, record: &Record) {
        let cached = harness.coordinator.records();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id(), record.id());
        assert_eq!(cached[0].attributes(), record.attributes());
        assert_eq!(cached[0].state(), ConfidentialityState::Unverified);
        assert_eq!(cached[0].revealed_value(), None);

        let revelation = harness.coordinator.reveal(record.id()).await.unwrap();
        assert_eq!(revelation.value, 7);
        assert_eq!(revelation.path, RevealPath::Decrypted);
        assert_eq!(harness.ledger.verified_count(), 1);
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    #[tokio::test]
    async fn test_encryption_failure() {
        let (harness, record) = with_record().await;
        let writes = harness.ledger.write_calls();
        harness
            .engine
            .fail_next_encrypt(CryptoError::EncryptionFailed("input proof worker crashed".into()));

        let err = harness.coordinator.create(engineer(), 3).await.unwrap_err();

        assert!(matches!(err, LifecycleError::Encryption { .. }));
        assert_eq!(err.kind(), "encryption");
        assert_failed_with(&harness, OperationKind::Create, "Encryption failed");
        // Nothing was submitted
        assert_eq!(harness.ledger.write_calls(), writes);
        assert_record_intact(&harness, &record).await;
    }

    #[tokio::test]
    async fn test_submission_rejected_by_ledger() {
        let (harness, record) = with_record().await;
        harness.ledger.fail_next(
            LedgerCall::SubmitCreate,
            LedgerError::Network("connection reset".into()),
        );

        let err = harness.coordinator.create(engineer(), 3).await.unwrap_err();

        assert!(matches!(
            err,
            LifecycleError::Submission(SubmissionFailure::RejectedByLedger { .. })
        ));
        assert_eq!(err.kind(), "submission_rejected_by_ledger");
        assert_failed_with(&harness, OperationKind::Create, "Submission failed");
        assert_record_intact(&harness, &record).await;
    }

    #[tokio::test]
    async fn test_confirmation_reverted() {
        let (harness, record) = with_record().await;
        harness.ledger.fail_next(
            LedgerCall::AwaitFinality,
            LedgerError::Reverted {
                tx_hash: TxHash([0; 32]),
                code: RevertCode::Unspecified,
                reason: "out of gas".into(),
            },
        );

        let err = harness.coordinator.create(engineer(), 3).await.unwrap_err();

        assert_eq!(
            err,
            LifecycleError::Confirmation(ConfirmationFailure::Reverted {
                reason: format!(
                    "Transaction {} reverted (Unspecified): out of gas",
                    TxHash([0; 32])
                ),
            })
        );
        assert_eq!(err.kind(), "confirmation_reverted");
        assert_failed_with(&harness, OperationKind::Create, "Transaction reverted");

        // The reverted create left nothing on the ledger either
        let listed = harness.coordinator.refresh().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), record.id());
        assert_record_intact(&harness, &record).await;
    }

    // =========================================================================
    // REVEAL
    // =========================================================================

    #[tokio::test]
    async fn test_handle_fetch_failure() {
        let (harness, record) = with_record().await;
        harness.ledger.fail_next(
            LedgerCall::GetConfidentialHandle,
            LedgerError::Network("rpc unavailable".into()),
        );

        let err = harness.coordinator.reveal(record.id()).await.unwrap_err();

        assert!(matches!(err, LifecycleError::HandleFetch { .. }));
        assert_eq!(err.kind(), "handle_fetch");
        assert_failed_with(&harness, OperationKind::Reveal, "Could not load encrypted value");
        assert_eq!(harness.engine.decrypt_calls(), 0);
        assert_record_intact(&harness, &record).await;
    }

    #[tokio::test]
    async fn test_decryption_failure() {
        let (harness, record) = with_record().await;
        let writes = harness.ledger.write_calls();
        harness
            .engine
            .fail_next_decrypt(CryptoError::DecryptionFailed("relayer timeout".into()));

        let err = harness.coordinator.reveal(record.id()).await.unwrap_err();

        assert!(matches!(err, LifecycleError::Decryption { .. }));
        assert_eq!(err.kind(), "decryption");
        assert_failed_with(&harness, OperationKind::Reveal, "Decryption failed");
        // No verification was submitted
        assert_eq!(harness.ledger.write_calls(), writes);
        assert_record_intact(&harness, &record).await;
    }

    #[tokio::test]
    async fn test_verification_rejected_by_signer() {
        let (harness, record) = with_record().await;
        harness.ledger.fail_next(
            LedgerCall::SubmitVerification,
            LedgerError::RejectedBySigner {
                reason: "user denied transaction signature".into(),
            },
        );

        let err = harness.coordinator.reveal(record.id()).await.unwrap_err();

        assert_eq!(
            err,
            LifecycleError::Verification(VerificationFailure::RejectedBySigner {
                reason: "user denied transaction signature".into(),
            })
        );
        assert_eq!(err.kind(), "verification_rejected_by_signer");
        assert_failed_with(&harness, OperationKind::Reveal, "Transaction rejected");
        assert_eq!(harness.ledger.verified_count(), 0);
        assert_record_intact(&harness, &record).await;
    }
}
