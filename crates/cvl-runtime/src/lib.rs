//! # CVL Runtime
//!
//! Wires the lifecycle core to in-memory collaborators and drives a
//! demonstration of the record lifecycle.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and component container
//! - `wiring/` - Event routing from the shared bus
//!
//! ## Demo Sequence
//!
//! 1. Connect the configured identity (initializes the crypto engine)
//! 2. Create a record with an encrypted value
//! 3. Reveal it (decrypt, prove, verify on the ledger)
//! 4. Reveal it again (answered from the ledger, no writes)
//! 5. Refresh and report registry statistics

pub mod container;
pub mod wiring;

use anyhow::{anyhow, Context, Result};
use cvl_lifecycle::{ConfidentialRecordApi, RegistryStats, Revelation, SkillAnalysis};
use shared_types::{PublicAttributes, RecordId};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

pub use container::{LifecycleContainer, RuntimeConfig, RuntimeConfigError};

/// Summary of one demo run.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub created: RecordId,
    pub first_reveal: Revelation,
    pub second_reveal: Revelation,
    pub analysis: Option<SkillAnalysis>,
    pub stats: RegistryStats,
    pub ledger_writes: u64,
    pub history: Vec<String>,
}

/// The runtime: component container plus background event logging.
pub struct LifecycleRuntime {
    container: Arc<LifecycleContainer>,
    shutdown_tx: watch::Sender<bool>,
    event_logger: Option<JoinHandle<usize>>,
}

impl LifecycleRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let container = Arc::new(LifecycleContainer::new(config));
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container,
            shutdown_tx,
            event_logger: None,
        }
    }

    pub fn container(&self) -> &Arc<LifecycleContainer> {
        &self.container
    }

    /// Start routing bus events to the log.
    pub fn start(&mut self) {
        if self.event_logger.is_none() {
            self.event_logger = Some(wiring::spawn_event_logger(
                &self.container.event_bus,
                self.shutdown_tx.subscribe(),
            ));
        }
    }

    /// Run the demonstration lifecycle.
    pub async fn run_demo(&self) -> Result<DemoReport> {
        let container = &self.container;
        let coordinator = &container.coordinator;
        let identity = container.config.identity;

        info!(identity = %identity, "[cvl] Connecting identity");
        let state = container.session.connect(identity).await;
        if !state.is_ready() {
            return Err(anyhow!(
                "crypto engine not ready after connect (state: {})",
                state.label()
            ));
        }

        let record = coordinator
            .create(PublicAttributes::new("Engineer", 5, 120), 7)
            .await
            .context("Failed to create record")?;

        let first_reveal = coordinator
            .reveal(record.id())
            .await
            .context("Failed to reveal record")?;
        let second_reveal = coordinator
            .reveal(record.id())
            .await
            .context("Failed to reveal record again")?;

        coordinator
            .refresh()
            .await
            .context("Failed to refresh records")?;

        Ok(DemoReport {
            created: record.id().clone(),
            analysis: coordinator.analyze(record.id(), None),
            first_reveal,
            second_reveal,
            stats: coordinator.stats(),
            ledger_writes: container.ledger.write_calls(),
            history: coordinator
                .history()
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }

    /// Stop the event logger. Returns how many events it saw.
    pub async fn shutdown(&mut self) -> usize {
        info!("[cvl] Shutting down runtime");
        self.shutdown_tx.send_replace(true);
        match self.event_logger.take() {
            Some(handle) => handle.await.unwrap_or(0),
            None => 0,
        }
    }
}
