//! # Component Container
//!
//! Builds every component once, in dependency order, and holds them for the
//! lifetime of the runtime.
//!
//! ```text
//! SimulatedKms ──→ InMemoryLedger
//!      └─────────→ SimulatedCryptoEngine ──→ SessionManager ──→ LifecycleCoordinator
//! InMemoryEventBus ──→ EventBusNotifier ────────────┴──────────────────┘
//! ```

use super::config::RuntimeConfig;
use cvl_lifecycle::adapters::{
    EventBusNotifier, InMemoryLedger, SimulatedCryptoEngine, SimulatedKms,
};
use cvl_lifecycle::{LifecycleCoordinator, SessionManager};
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use tracing::info;

/// Session manager as wired by the runtime.
pub type RuntimeSession = SessionManager<SimulatedCryptoEngine, EventBusNotifier>;

/// Coordinator as wired by the runtime.
pub type RuntimeCoordinator =
    LifecycleCoordinator<InMemoryLedger, SimulatedCryptoEngine, EventBusNotifier>;

pub struct LifecycleContainer {
    pub config: RuntimeConfig,
    pub event_bus: Arc<InMemoryEventBus>,
    pub kms: Arc<SimulatedKms>,
    pub ledger: Arc<InMemoryLedger>,
    pub engine: Arc<SimulatedCryptoEngine>,
    pub notifier: Arc<EventBusNotifier>,
    pub session: Arc<RuntimeSession>,
    pub coordinator: Arc<RuntimeCoordinator>,
}

impl LifecycleContainer {
    pub fn new(config: RuntimeConfig) -> Self {
        info!("[cvl] Building lifecycle components");

        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.event_capacity));
        let kms = Arc::new(match config.kms_key {
            Some(key) => SimulatedKms::new(key),
            None => SimulatedKms::random(),
        });
        let ledger = Arc::new(InMemoryLedger::new(
            config.lifecycle.contract,
            Arc::clone(&kms),
        ));
        let engine = Arc::new(SimulatedCryptoEngine::new(Arc::clone(&kms)));
        let notifier = Arc::new(EventBusNotifier::new(Arc::clone(&event_bus)));
        let session = Arc::new(SessionManager::new(
            Arc::clone(&engine),
            Arc::clone(&notifier),
        ));
        let coordinator = Arc::new(LifecycleCoordinator::new(
            config.lifecycle.clone(),
            Arc::clone(&session),
            Arc::clone(&ledger),
            Arc::clone(&engine),
            Arc::clone(&notifier),
        ));

        info!(
            contract = %config.lifecycle.contract,
            value_min = config.lifecycle.value_min,
            value_max = config.lifecycle.value_max,
            "[cvl] Components ready"
        );

        Self {
            config,
            event_bus,
            kms,
            ledger,
            engine,
            notifier,
            session,
            coordinator,
        }
    }
}
