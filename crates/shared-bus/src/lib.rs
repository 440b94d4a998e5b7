//! # Shared Bus - Lifecycle Event Bus
//!
//! Carries operation status notices, session transitions and record changes
//! from the lifecycle core to the presentation layer and any other observer.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ Lifecycle core   │                    │ Presentation     │
//! │                  │    publish()       │                  │
//! │                  │ ──────┐            │                  │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │          │
//!                      │              │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! Events are transient: a bus with no subscribers drops them.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, LifecycleEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
