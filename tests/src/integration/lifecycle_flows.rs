//! # Lifecycle Flows
//!
//! Create, reveal and refresh end to end against the in-memory ledger.
//!
//! ## Flows Tested:
//!
//! 1. **Create → Reveal**: the encrypted value is decrypted, proven and
//!    verified, then answered from the ledger on every later reveal
//! 2. **Validation**: out-of-domain values never reach the crypto engine
//! 3. **Refresh**: the cache is rebuilt from the ledger listing

#[cfg(test)]
mod tests {
    use crate::harness::{Harness, ALICE, BOB};
    use cvl_lifecycle::adapters::LedgerCall;
    use cvl_lifecycle::{
        ConfidentialRecordApi, ConfidentialityState, LifecycleError, RevealPath,
        SubmissionFailure,
    };
    use shared_types::{LedgerError, NoticeStatus, OperationKind, PublicAttributes, RecordId};

    fn engineer() -> PublicAttributes {
        PublicAttributes::new("Engineer", 5, 120)
    }

    // =========================================================================
    // CREATE → REVEAL
    // =========================================================================

    #[tokio::test]
    async fn test_create_then_reveal_engineer() {
        let harness = Harness::connected().await;
        let coordinator = &harness.coordinator;

        let record = coordinator.create(engineer(), 7).await.unwrap();

        assert_eq!(record.state(), ConfidentialityState::Unverified);
        assert_eq!(record.creator(), ALICE);
        assert_eq!(record.attributes().salary_bracket, 120);
        assert_eq!(record.revealed_value(), None);

        let revelation = coordinator.reveal(record.id()).await.unwrap();

        assert_eq!(revelation.value, 7);
        assert_eq!(revelation.path, RevealPath::Decrypted);
        let cached = coordinator.record(record.id()).unwrap();
        assert_eq!(cached.revealed_value(), Some(7));
        assert_eq!(
            harness.ledger.stored_snapshot(record.id()).unwrap().decrypted_value,
            7
        );

        let last = harness.notifier.last_notice().unwrap();
        assert_eq!(last.kind, OperationKind::Reveal);
        assert_eq!(last.status, NoticeStatus::Succeeded);
        assert_eq!(last.message, "Value decrypted and verified");
    }

    #[tokio::test]
    async fn test_second_reveal_writes_nothing() {
        let harness = Harness::connected().await;
        let record = harness.coordinator.create(engineer(), 7).await.unwrap();
        harness.coordinator.reveal(record.id()).await.unwrap();

        let writes = harness.ledger.write_calls();
        let decrypts = harness.engine.decrypt_calls();

        let again = harness.coordinator.reveal(record.id()).await.unwrap();

        assert_eq!(again.value, 7);
        assert_eq!(again.path, RevealPath::AlreadyVerified);
        assert_eq!(harness.ledger.write_calls(), writes);
        assert_eq!(harness.engine.decrypt_calls(), decrypts);
        assert_eq!(
            harness.notifier.last_notice().unwrap().message,
            "Data is already verified"
        );
    }

    #[tokio::test]
    async fn test_reveal_of_record_verified_by_another_client() {
        let alice = Harness::connected().await;
        let record = alice.coordinator.create(engineer(), 3).await.unwrap();

        let bob = Harness::sharing(&alice);
        assert!(bob.session.connect(BOB).await.is_ready());
        bob.coordinator.refresh().await.unwrap();
        assert_eq!(
            bob.coordinator.reveal(record.id()).await.unwrap().path,
            RevealPath::Decrypted
        );

        // Alice's cache still shows the record unverified
        assert_eq!(alice.coordinator.record(record.id()).unwrap().revealed_value(), None);
        let decrypts = alice.engine.decrypt_calls();

        let revelation = alice.coordinator.reveal(record.id()).await.unwrap();

        assert_eq!(revelation.path, RevealPath::AlreadyVerified);
        assert_eq!(revelation.value, 3);
        assert_eq!(alice.engine.decrypt_calls(), decrypts);
        assert_eq!(alice.ledger.verified_count(), 1);
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    #[tokio::test]
    async fn test_out_of_domain_values_rejected_before_encryption() {
        let harness = Harness::connected().await;

        for value in [0, 11] {
            let err = harness.coordinator.create(engineer(), value).await.unwrap_err();
            assert!(matches!(
                err,
                LifecycleError::Validation {
                    field: "secret_value",
                    ..
                }
            ));
        }

        assert_eq!(harness.engine.encrypt_calls(), 0);
        assert_eq!(harness.ledger.write_calls(), 0);
        assert!(harness.coordinator.records().is_empty());
    }

    #[tokio::test]
    async fn test_domain_bounds_are_inclusive() {
        let harness = Harness::connected().await;

        for value in [1, 10] {
            let record = harness.coordinator.create(engineer(), value).await.unwrap();
            let revelation = harness.coordinator.reveal(record.id()).await.unwrap();
            assert_eq!(revelation.value, value);
        }
    }

    #[tokio::test]
    async fn test_signer_rejection_leaves_no_record() {
        let harness = Harness::connected().await;
        harness.ledger.fail_next(
            LedgerCall::SubmitCreate,
            LedgerError::RejectedBySigner {
                reason: "user denied".into(),
            },
        );

        let err = harness.coordinator.create(engineer(), 4).await.unwrap_err();

        assert!(matches!(
            err,
            LifecycleError::Submission(SubmissionFailure::RejectedBySigner { .. })
        ));
        assert_eq!(err.user_message(), "Transaction rejected");
        assert!(harness.coordinator.records().is_empty());
        assert_eq!(
            harness.notifier.last_notice().unwrap().status,
            NoticeStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_reveal_unknown_record() {
        let harness = Harness::connected().await;

        let err = harness
            .coordinator
            .reveal(&RecordId::new("job-missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::RecordFetch { .. }));
        assert_eq!(harness.engine.decrypt_calls(), 0);
        assert_eq!(harness.ledger.write_calls(), 0);
    }

    // =========================================================================
    // REFRESH
    // =========================================================================

    #[tokio::test]
    async fn test_refresh_rebuilds_cache_from_ledger() {
        let writer = Harness::connected().await;
        let first = writer.coordinator.create(engineer(), 2).await.unwrap();
        let second = writer
            .coordinator
            .create(PublicAttributes::new("Designer", 3, 90), 9)
            .await
            .unwrap();
        writer.coordinator.reveal(second.id()).await.unwrap();

        let records = writer.coordinator.refresh().await.unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.id().clone()).collect();
        assert_eq!(ids, vec![first.id().clone(), second.id().clone()]);
        assert_eq!(records[0].revealed_value(), None);
        assert_eq!(records[1].revealed_value(), Some(9));

        let stats = writer.coordinator.stats();
        assert_eq!((stats.total, stats.verified), (2, 1));
        assert!((stats.average_required_level - 4.0).abs() < f64::EPSILON);
        assert_eq!(
            writer.notifier.last_notice().unwrap().message,
            "Loaded 2 records"
        );
    }

    #[tokio::test]
    async fn test_refresh_works_without_crypto_session() {
        let writer = Harness::connected().await;
        writer.coordinator.create(engineer(), 5).await.unwrap();
        writer.session.disconnect().await;

        let records = writer.coordinator.refresh().await.unwrap();

        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_history_records_each_success() {
        let harness = Harness::connected().await;
        let record = harness.coordinator.create(engineer(), 6).await.unwrap();
        harness.coordinator.reveal(record.id()).await.unwrap();
        harness.coordinator.reveal(record.id()).await.unwrap();

        let actions: Vec<_> = harness
            .coordinator
            .history()
            .into_iter()
            .map(|entry| entry.action)
            .collect();

        assert_eq!(
            actions,
            vec!["Created record", "Revealed value", "Value already verified"]
        );
    }

    #[tokio::test]
    async fn test_analysis_uses_cached_record() {
        let harness = Harness::connected().await;
        let record = harness.coordinator.create(engineer(), 6).await.unwrap();

        let analysis = harness.coordinator.analyze(record.id(), Some(5)).unwrap();

        assert_eq!(analysis.match_score, 100);
        assert_eq!(analysis.skill_gap, 0);
        assert!(harness
            .coordinator
            .analyze(&RecordId::new("job-missing"), None)
            .is_none());
    }
}
