//! # Event Publisher
//!
//! The lifecycle core publishes through `EventPublisher`; observers attach
//! to the in-memory bus with a topic filter. Delivery is best effort: an
//! event published while nobody listens is counted and then dropped.

use crate::events::{EventFilter, EventTopic, LifecycleEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Publishing side of the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event. Returns how many observers it was delivered to.
    async fn publish(&self, event: LifecycleEvent) -> usize;

    /// Events published so far, across all topics.
    fn events_published(&self) -> u64;
}

/// Broadcast bus shared by the lifecycle core and its observers.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<LifecycleEvent>,
    /// Published event count per topic.
    published: RwLock<HashMap<EventTopic, u64>>,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering up to `capacity` events per observer. Slow observers
    /// skip the oldest events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Observe events on the filter's topics from now on.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "Observer attached");
        Subscription::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Observers currently attached, regardless of filter.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Events published on `topic` so far.
    #[must_use]
    pub fn published_on(&self, topic: EventTopic) -> u64 {
        self.published
            .read()
            .map(|published| published.get(&topic).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LifecycleEvent) -> usize {
        let topic = event.topic();
        if let Ok(mut published) = self.published.write() {
            *published.entry(topic).or_insert(0) += 1;
        }

        match self.sender.send(event) {
            Ok(observers) => {
                debug!(topic = ?topic, observers, "Event published");
                observers
            }
            Err(_) => {
                trace!(topic = ?topic, "Event dropped (no observers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.published
            .read()
            .map(|published| published.values().sum())
            .unwrap_or(0)
    }
}
