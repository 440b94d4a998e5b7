//! Status notifier adapters
//!
//! `EventBusNotifier` forwards notices and events to the shared bus for the
//! presentation layer; `RecordingNotifier` keeps them for inspection.

use crate::ports::outbound::StatusNotifier;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{EventPublisher, InMemoryEventBus, LifecycleEvent};
use shared_types::StatusNotice;
use std::sync::Arc;
use tracing::trace;

/// Event bus adapter for the presentation layer.
pub struct EventBusNotifier {
    event_bus: Arc<InMemoryEventBus>,
}

impl EventBusNotifier {
    pub fn new(event_bus: Arc<InMemoryEventBus>) -> Self {
        Self { event_bus }
    }
}

#[async_trait]
impl StatusNotifier for EventBusNotifier {
    async fn notify(&self, notice: StatusNotice) {
        trace!(operation = %notice.kind, status = ?notice.status, "[cvl] Publishing status notice");
        self.event_bus
            .publish(LifecycleEvent::StatusChanged(notice))
            .await;
    }

    async fn emit(&self, event: LifecycleEvent) {
        self.event_bus.publish(event).await;
    }
}

/// In-memory notifier for tests.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: RwLock<Vec<StatusNotice>>,
    events: RwLock<Vec<LifecycleEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<StatusNotice> {
        self.notices.read().clone()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.read().clone()
    }

    /// Most recent notice, if any.
    pub fn last_notice(&self) -> Option<StatusNotice> {
        self.notices.read().last().cloned()
    }

    pub fn clear(&self) {
        self.notices.write().clear();
        self.events.write().clear();
    }
}

#[async_trait]
impl StatusNotifier for RecordingNotifier {
    async fn notify(&self, notice: StatusNotice) {
        self.notices.write().push(notice);
    }

    async fn emit(&self, event: LifecycleEvent) {
        self.events.write().push(event);
    }
}
