//! # Event Wiring
//!
//! Routes lifecycle events from the shared bus to their consumers. The
//! runtime has one consumer: the event logger standing in for the
//! presentation layer.
//!
//! ```text
//! SessionManager ─┐
//!                 ├─→ EventBusNotifier ─→ InMemoryEventBus ─→ event logger
//! Coordinator ────┘
//! ```

mod event_log;

pub use event_log::{describe_event, spawn_event_logger};
