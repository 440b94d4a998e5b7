//! Session context state machine
//!
//! Tracks whether the crypto engine has been initialized for the connected
//! identity. Transitions are a pure function of (state, event); the
//! `SessionManager` drives the engine and feeds the outcome back in.

use serde::Serialize;
use shared_types::Identity;

/// Monotonic number identifying one initialization attempt.
pub type AttemptId = u64;

/// Session state
///
/// State Machine:
/// ```text
/// [UNINITIALIZED] ──identity connected──→ [INITIALIZING {attempt}] ←──┐
///       ↑                                        │                     │
///       │                                        ├── outcome, another identity queued
///       │                                        │
///       │                                        ├── init succeeded ──→ [READY]
///       │                                        │
///       │                                        └── init failed ──→ [FAILED]
///       │                                                               │
///       └──────────────── failure acknowledged / disconnected ──────────┘
/// ```
///
/// At most one attempt is in flight. An identity connecting while another
/// identity's attempt runs is queued and started once that attempt's
/// outcome has been processed; the latest queued identity wins. Outcomes
/// carrying a superseded attempt id are ignored, so an attempt discarded by
/// a disconnect can never mark the session `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Initializing {
        identity: Identity,
        attempt: AttemptId,
    },
    Ready {
        identity: Identity,
    },
    Failed {
        identity: Identity,
    },
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "Uninitialized",
            SessionState::Initializing { .. } => "Initializing",
            SessionState::Ready { .. } => "Ready",
            SessionState::Failed { .. } => "Failed",
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        match self {
            SessionState::Uninitialized => None,
            SessionState::Initializing { identity, .. }
            | SessionState::Ready { identity }
            | SessionState::Failed { identity } => Some(*identity),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready { .. })
    }

    /// Gauge encoding (0=Uninitialized, 1=Initializing, 2=Ready, 3=Failed)
    pub fn as_gauge(&self) -> u8 {
        match self {
            SessionState::Uninitialized => 0,
            SessionState::Initializing { .. } => 1,
            SessionState::Ready { .. } => 2,
            SessionState::Failed { .. } => 3,
        }
    }
}

/// Events that drive session transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// An identity became available (wallet connected or switched)
    IdentityConnected(Identity),
    InitializationSucceeded { attempt: AttemptId },
    InitializationFailed { attempt: AttemptId },
    /// The failure was reported; return to `Uninitialized` so a later
    /// identity event can retry
    FailureAcknowledged,
    IdentityDisconnected,
}

/// Result of processing one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTransition {
    pub previous: SessionState,
    pub current: SessionState,
}

impl SessionTransition {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    /// The attempt the caller must now run, if this transition started one.
    pub fn started_attempt(&self) -> Option<(Identity, AttemptId)> {
        match (self.previous, self.current) {
            (
                SessionState::Initializing {
                    attempt: previous, ..
                },
                SessionState::Initializing { attempt, .. },
            ) if previous == attempt => None,
            (_, SessionState::Initializing { identity, attempt }) => Some((identity, attempt)),
            _ => None,
        }
    }
}

/// Session context for one client.
#[derive(Debug, Default)]
pub struct SessionContext {
    state: SessionState,
    last_attempt: AttemptId,
    /// Attempt whose outcome has not been processed yet. Survives a
    /// disconnect, since the engine call is still running.
    in_flight: Option<AttemptId>,
    /// Identity waiting for the attempt in flight to finish
    queued: Option<Identity>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn queued(&self) -> Option<Identity> {
        self.queued
    }

    /// True while an engine call is outstanding.
    pub fn has_attempt_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of initialization attempts started so far
    pub fn attempts_started(&self) -> u64 {
        self.last_attempt
    }

    /// Process an event and transition state
    pub fn process_event(&mut self, event: SessionEvent) -> SessionTransition {
        let previous = self.state;
        let (current, queued) = self.next_state(event);

        if let SessionEvent::InitializationSucceeded { attempt }
        | SessionEvent::InitializationFailed { attempt } = event
        {
            if self.in_flight == Some(attempt) {
                self.in_flight = None;
            }
        }

        let transition = SessionTransition { previous, current };
        if let Some((_, attempt)) = transition.started_attempt() {
            self.in_flight = Some(attempt);
            self.last_attempt = attempt;
        }
        self.state = current;
        self.queued = queued;
        transition
    }

    fn next_attempt(&self) -> AttemptId {
        self.last_attempt + 1
    }

    /// Start the queued identity, or settle in `settled`.
    fn after_outcome(&self, settled: SessionState) -> (SessionState, Option<Identity>) {
        match self.queued {
            Some(identity) => (
                SessionState::Initializing {
                    identity,
                    attempt: self.next_attempt(),
                },
                None,
            ),
            None => (settled, None),
        }
    }

    /// Pure transition function
    fn next_state(&self, event: SessionEvent) -> (SessionState, Option<Identity>) {
        match event {
            // Connect: coalesce, queue behind the attempt in flight, or start
            SessionEvent::IdentityConnected(id) => match self.state {
                SessionState::Initializing { identity, .. } | SessionState::Ready { identity }
                    if identity == id =>
                {
                    (self.state, None)
                }
                _ if self.in_flight.is_some() => (self.state, Some(id)),
                _ => (
                    SessionState::Initializing {
                        identity: id,
                        attempt: self.next_attempt(),
                    },
                    None,
                ),
            },

            SessionEvent::InitializationSucceeded { attempt: finished }
            | SessionEvent::InitializationFailed { attempt: finished } => {
                if self.in_flight != Some(finished) {
                    return (self.state, self.queued);
                }
                let settled = match (self.state, event) {
                    (
                        SessionState::Initializing { identity, attempt },
                        SessionEvent::InitializationSucceeded { .. },
                    ) if attempt == finished => SessionState::Ready { identity },
                    (
                        SessionState::Initializing { identity, attempt },
                        SessionEvent::InitializationFailed { .. },
                    ) if attempt == finished => SessionState::Failed { identity },
                    // Attempt discarded by a disconnect
                    (state, _) => state,
                };
                self.after_outcome(settled)
            }

            SessionEvent::FailureAcknowledged => match self.state {
                SessionState::Failed { .. } => (SessionState::Uninitialized, None),
                state => (state, self.queued),
            },
            SessionEvent::IdentityDisconnected => (SessionState::Uninitialized, None),
        }
    }
}
