//! Test wiring: one KMS shared by the ledger and the engine, a recording
//! notifier, and a coordinator over all of them.

use cvl_lifecycle::adapters::{InMemoryLedger, RecordingNotifier, SimulatedCryptoEngine, SimulatedKms};
use cvl_lifecycle::{LifecycleConfig, LifecycleCoordinator, SessionManager};
use shared_types::{ContractAddress, Identity};
use std::sync::Arc;
use std::time::Duration;

pub const CONTRACT: ContractAddress = ContractAddress([0xC0; 20]);
pub const ALICE: Identity = Identity([0xA1; 20]);
pub const BOB: Identity = Identity([0xB0; 20]);

pub type TestSession = SessionManager<SimulatedCryptoEngine, RecordingNotifier>;
pub type TestCoordinator =
    LifecycleCoordinator<InMemoryLedger, SimulatedCryptoEngine, RecordingNotifier>;

pub struct Harness {
    pub kms: Arc<SimulatedKms>,
    pub ledger: Arc<InMemoryLedger>,
    pub engine: Arc<SimulatedCryptoEngine>,
    pub notifier: Arc<RecordingNotifier>,
    pub session: Arc<TestSession>,
    pub coordinator: TestCoordinator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: LifecycleConfig) -> Self {
        let kms = Arc::new(SimulatedKms::new([7; 32]));
        let ledger = Arc::new(InMemoryLedger::new(config.contract, Arc::clone(&kms)));
        Self::build(config, kms, ledger)
    }

    /// A second client on the same ledger, with its own session and cache.
    pub fn sharing(other: &Harness) -> Self {
        Self::build(
            other.coordinator.config().clone(),
            Arc::clone(&other.kms),
            Arc::clone(&other.ledger),
        )
    }

    fn build(
        config: LifecycleConfig,
        kms: Arc<SimulatedKms>,
        ledger: Arc<InMemoryLedger>,
    ) -> Self {
        let engine = Arc::new(SimulatedCryptoEngine::new(Arc::clone(&kms)));
        let notifier = Arc::new(RecordingNotifier::new());
        let session = Arc::new(SessionManager::new(
            Arc::clone(&engine),
            Arc::clone(&notifier),
        ));
        let coordinator = LifecycleCoordinator::new(
            config,
            Arc::clone(&session),
            Arc::clone(&ledger),
            Arc::clone(&engine),
            Arc::clone(&notifier),
        );
        Self {
            kms,
            ledger,
            engine,
            notifier,
            session,
            coordinator,
        }
    }

    /// Harness whose session is already Ready for ALICE.
    pub async fn connected() -> Self {
        let harness = Self::new();
        assert!(harness.session.connect(ALICE).await.is_ready());
        harness
    }
}

/// Default config with a short read retry delay.
pub fn test_config() -> LifecycleConfig {
    let mut config = LifecycleConfig::for_contract(CONTRACT);
    config.read_retry_delay = Duration::from_millis(1);
    config
}
