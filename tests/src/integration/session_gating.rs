//! # Session Gating
//!
//! Crypto-dependent operations run only while the session is Ready, and
//! concurrent identity events trigger a single engine initialization.

#[cfg(test)]
mod tests {
    use crate::harness::{Harness, ALICE, BOB};
    use cvl_lifecycle::{
        ConfidentialRecordApi, LifecycleError, SessionState, INITIALIZATION_FAILED_MESSAGE,
    };
    use shared_types::{CryptoError, NoticeStatus, OperationKind, PublicAttributes, RecordId};

    #[tokio::test]
    async fn test_create_before_connect_touches_nothing() {
        let harness = Harness::new();

        let err = harness
            .coordinator
            .create(PublicAttributes::new("Engineer", 5, 120), 7)
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::NotInitialized { .. }));
        assert_eq!(harness.engine.total_calls(), 0);
        assert_eq!(harness.ledger.write_calls(), 0);
        assert_eq!(harness.ledger.read_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_while_initializing_is_refused() {
        let harness = Harness::new();

        let (state, result) = tokio::join!(harness.session.connect(ALICE), async {
            harness
                .coordinator
                .create(PublicAttributes::new("Engineer", 5, 120), 7)
                .await
        });

        assert!(state.is_ready());
        match result.unwrap_err() {
            LifecycleError::NotInitialized { state } => assert_eq!(state, "Initializing"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(harness.engine.encrypt_calls(), 0);
        assert_eq!(harness.ledger.write_calls(), 0);
        assert_eq!(harness.ledger.read_calls(), 0);
    }

    #[tokio::test]
    async fn test_reveal_while_uninitialized_is_refused() {
        let harness = Harness::new();

        let err = harness
            .coordinator
            .reveal(&RecordId::new("job-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, LifecycleError::NotInitialized { .. }));
        assert_eq!(harness.ledger.read_calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_identity_events_initialize_once() {
        let harness = Harness::new();

        let (a, b, c) = tokio::join!(
            harness.session.connect(ALICE),
            harness.session.connect(ALICE),
            harness.session.connect(ALICE)
        );

        assert_eq!(harness.engine.init_calls(), 1);
        assert!(a.is_ready());
        // Coalesced callers return immediately with the attempt in flight
        assert!(matches!(b, SessionState::Initializing { .. }));
        assert!(matches!(c, SessionState::Initializing { .. }));
        assert!(harness.session.state().is_ready());
    }

    #[tokio::test]
    async fn test_identity_switch_mid_initialization_is_queued() {
        let harness = Harness::new();

        let (alice, bob) = tokio::join!(
            harness.session.connect(ALICE),
            harness.session.connect(BOB)
        );

        assert_eq!(harness.engine.init_calls(), 2);
        assert_eq!(harness.session.initialization_attempts(), 2);
        assert_eq!(alice, SessionState::Uninitialized);
        assert_eq!(bob, SessionState::Ready { identity: BOB });
        assert_eq!(harness.session.require_ready().unwrap(), BOB);

        let terminal = harness
            .notifier
            .notices()
            .into_iter()
            .filter(|n| n.kind == OperationKind::Initialize && n.status != NoticeStatus::Pending)
            .count();
        assert_eq!(terminal, 2);
    }

    #[tokio::test]
    async fn test_failed_initialization_can_be_retried() {
        let harness = Harness::new();
        harness
            .engine
            .fail_next_initialize(CryptoError::InitializationFailed("gateway down".into()));

        let state = harness.session.connect(ALICE).await;

        assert_eq!(state, SessionState::Uninitialized);
        let failure = harness
            .notifier
            .notices()
            .into_iter()
            .rfind(|n| n.kind == OperationKind::Initialize)
            .unwrap();
        assert_eq!(failure.status, NoticeStatus::Failed);
        assert_eq!(failure.message, INITIALIZATION_FAILED_MESSAGE);

        assert!(harness.session.connect(ALICE).await.is_ready());
        assert_eq!(harness.engine.init_calls(), 2);
        assert!(harness.engine.is_initialized_for(&ALICE));
    }

    #[tokio::test]
    async fn test_identity_switch_then_create_uses_new_identity() {
        let harness = Harness::connected().await;
        assert!(harness.session.connect(BOB).await.is_ready());

        let record = harness
            .coordinator
            .create(PublicAttributes::new("Analyst", 4, 80), 5)
            .await
            .unwrap();

        assert_eq!(record.creator(), BOB);
    }

    #[tokio::test]
    async fn test_disconnect_blocks_further_reveals() {
        let harness = Harness::connected().await;
        let record = harness
            .coordinator
            .create(PublicAttributes::new("Engineer", 5, 120), 7)
            .await
            .unwrap();

        harness.session.disconnect().await;

        let err = harness.coordinator.reveal(record.id()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::NotInitialized { .. }));
        assert_eq!(harness.ledger.verified_count(), 0);
    }
}
