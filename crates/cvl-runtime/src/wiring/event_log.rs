//! Event logger task

use cvl_telemetry::log_event;
use shared_bus::{EventFilter, InMemoryEventBus, LifecycleEvent};
use shared_types::NoticeStatus;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One-line rendering of an event.
pub fn describe_event(event: &LifecycleEvent) -> String {
    match event {
        LifecycleEvent::StatusChanged(notice) => {
            format!("[{}] {:?}: {}", notice.kind, notice.status, notice.message)
        }
        LifecycleEvent::SessionStateChanged {
            previous, current, ..
        } => format!("session {} -> {}", previous, current),
        LifecycleEvent::RecordCreated { record_id, .. } => format!("record {} created", record_id),
        LifecycleEvent::RecordVerified {
            record_id,
            value,
            path,
        } => format!("record {} verified with value {} ({})", record_id, value, path),
        LifecycleEvent::RecordsRefreshed { count } => format!("{} records loaded", count),
        LifecycleEvent::ActivityAppended { entry } => format!("activity: {}", entry),
    }
}

/// Log every bus event until `shutdown` flips to true. Returns the number
/// of events seen.
pub fn spawn_event_logger(
    event_bus: &InMemoryEventBus,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<usize> {
    let mut subscription = event_bus.subscribe(EventFilter::all());

    tokio::spawn(async move {
        let mut seen = 0usize;
        loop {
            tokio::select! {
                event = subscription.recv() => {
                    let Some(event) = event else { break };
                    seen += 1;
                    let line = describe_event(&event);
                    match &event {
                        LifecycleEvent::StatusChanged(notice)
                            if notice.status == NoticeStatus::Failed =>
                        {
                            log_event!(warn, "events", "Lifecycle event", detail = %line)
                        }
                        _ => log_event!(info, "events", "Lifecycle event", detail = %line),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        // Drain what was published before shutdown
                        for event in subscription.drain() {
                            seen += 1;
                            log_event!(info, "events", "Lifecycle event", detail = %describe_event(&event));
                        }
                        break;
                    }
                }
            }
        }
        seen
    })
}
