//! # Event Flow
//!
//! Status notices, session transitions and record changes reach bus
//! subscribers in the order the operations produced them.

#[cfg(test)]
mod tests {
    use crate::harness::{test_config, ALICE};
    use cvl_lifecycle::adapters::{
        EventBusNotifier, InMemoryLedger, SimulatedCryptoEngine, SimulatedKms,
    };
    use cvl_lifecycle::{ConfidentialRecordApi, LifecycleCoordinator, SessionManager};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, LifecycleEvent};
    use shared_types::{NoticeStatus, OperationKind, PublicAttributes};
    use std::sync::Arc;

    struct BusHarness {
        bus: Arc<InMemoryEventBus>,
        session: Arc<SessionManager<SimulatedCryptoEngine, EventBusNotifier>>,
        coordinator:
            LifecycleCoordinator<InMemoryLedger, SimulatedCryptoEngine, EventBusNotifier>,
    }

    fn bus_harness() -> BusHarness {
        let config = test_config();
        let bus = Arc::new(InMemoryEventBus::new());
        let kms = Arc::new(SimulatedKms::new([9; 32]));
        let ledger = Arc::new(InMemoryLedger::new(config.contract, Arc::clone(&kms)));
        let engine = Arc::new(SimulatedCryptoEngine::new(kms));
        let notifier = Arc::new(EventBusNotifier::new(Arc::clone(&bus)));
        let session = Arc::new(SessionManager::new(
            Arc::clone(&engine),
            Arc::clone(&notifier),
        ));
        let coordinator =
            LifecycleCoordinator::new(config, Arc::clone(&session), ledger, engine, notifier);
        BusHarness {
            bus,
            session,
            coordinator,
        }
    }

    #[tokio::test]
    async fn test_record_events_follow_lifecycle() {
        let harness = bus_harness();
        let mut records = harness
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Records]));
        harness.session.connect(ALICE).await;

        let record = harness
            .coordinator
            .create(PublicAttributes::new("Engineer", 5, 120), 7)
            .await
            .unwrap();
        harness.coordinator.reveal(record.id()).await.unwrap();
        harness.coordinator.refresh().await.unwrap();

        let events = records.drain();
        assert_eq!(events.len(), 3);
        match &events[0] {
            LifecycleEvent::RecordCreated {
                record_id, creator, ..
            } => {
                assert_eq!(record_id, record.id());
                assert_eq!(*creator, ALICE);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match &events[1] {
            LifecycleEvent::RecordVerified { value, path, .. } => {
                assert_eq!(*value, 7);
                assert_eq!(path, "decrypted");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            events[2],
            LifecycleEvent::RecordsRefreshed { count: 1 }
        ));
    }

    #[tokio::test]
    async fn test_status_notices_pending_then_terminal() {
        let harness = bus_harness();
        let mut status = harness
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Status]));
        harness.session.connect(ALICE).await;

        harness
            .coordinator
            .create(PublicAttributes::new("Engineer", 5, 120), 7)
            .await
            .unwrap();

        let notices: Vec<_> = status
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                LifecycleEvent::StatusChanged(notice) if notice.kind == OperationKind::Create => {
                    Some(notice)
                }
                _ => None,
            })
            .collect();

        assert_eq!(notices.first().unwrap().status, NoticeStatus::Pending);
        let last = notices.last().unwrap();
        assert_eq!(last.status, NoticeStatus::Succeeded);
        assert_eq!(last.message, "Record created successfully!");
        assert!(notices
            .iter()
            .all(|n| n.operation_id == last.operation_id));
    }

    #[tokio::test]
    async fn test_session_transitions_published() {
        let harness = bus_harness();
        let mut session = harness
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Session]));

        harness.session.connect(ALICE).await;
        harness.session.disconnect().await;

        let transitions: Vec<_> = session
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                LifecycleEvent::SessionStateChanged { current, .. } => Some(current),
                _ => None,
            })
            .collect();

        assert_eq!(transitions, vec!["Initializing", "Ready", "Uninitialized"]);
    }

    #[tokio::test]
    async fn test_activity_entries_published() {
        let harness = bus_harness();
        let mut activity = harness
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Activity]));
        harness.session.connect(ALICE).await;

        let record = harness
            .coordinator
            .create(PublicAttributes::new("Engineer", 5, 120), 7)
            .await
            .unwrap();
        harness.coordinator.reveal(record.id()).await.unwrap();

        let entries: Vec<_> = activity
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                LifecycleEvent::ActivityAppended { entry } => Some(entry),
                _ => None,
            })
            .collect();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].ends_with("Created record"));
        assert!(entries[1].ends_with("Revealed value"));
    }
}
