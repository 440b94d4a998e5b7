//! # Lifecycle Events
//!
//! Defines all event types that flow through the shared bus toward the
//! presentation layer and any other observer of the lifecycle core.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Identity, RecordId, TxHash};
use shared_types::notices::StatusNotice;

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    // =========================================================================
    // OPERATION STATUS
    // =========================================================================
    /// An operation moved to Pending, Succeeded or Failed.
    StatusChanged(StatusNotice),

    // =========================================================================
    // SESSION
    // =========================================================================
    /// The session context changed state.
    SessionStateChanged {
        /// Identity the session is bound to, if any.
        identity: Option<Identity>,
        /// Previous state (debug rendering).
        previous: String,
        /// New state (debug rendering).
        current: String,
    },

    // =========================================================================
    // RECORDS
    // =========================================================================
    /// A record creation reached finality.
    RecordCreated {
        record_id: RecordId,
        creator: Identity,
        tx_hash: TxHash,
    },

    /// The ledger confirmed a record as verified.
    RecordVerified {
        record_id: RecordId,
        value: u32,
        /// How the verified state was reached (decrypted, already verified, race).
        path: String,
    },

    /// The local record cache was replaced by a fresh listing.
    RecordsRefreshed { count: usize },

    // =========================================================================
    // ACTIVITY
    // =========================================================================
    /// An entry was appended to the activity history.
    ActivityAppended { entry: String },
}

impl LifecycleEvent {
    /// Get the topic for this event (used for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::StatusChanged(_) => EventTopic::Status,
            Self::SessionStateChanged { .. } => EventTopic::Session,
            Self::RecordCreated { .. }
            | Self::RecordVerified { .. }
            | Self::RecordsRefreshed { .. } => EventTopic::Records,
            Self::ActivityAppended { .. } => EventTopic::Activity,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Operation status notices.
    Status,
    /// Session state transitions.
    Session,
    /// Record lifecycle changes.
    Records,
    /// Activity history entries.
    Activity,
    /// All topics (wildcard).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to subscribe to (empty = all).
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LifecycleEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
