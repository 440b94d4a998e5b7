//! Session Manager - crypto engine initialization gate
//!
//! Owns the `SessionContext` and is the only component that transitions it.
//! The check-and-set that starts an attempt happens under a short
//! `parking_lot` lock before the first `.await`, so at most one `initialize`
//! call is in flight. The caller that started an attempt also runs any
//! attempt queued behind it by an identity switch.

use crate::domain::{
    AttemptId, OperationOutcome, SessionContext, SessionEvent, SessionState, SessionTransition,
};
use crate::error::{LifecycleError, LifecycleResult};
use crate::metrics;
use crate::ports::outbound::{CryptoEngine, StatusNotifier};
use parking_lot::Mutex;
use shared_bus::LifecycleEvent;
use shared_types::{Identity, OperationKind};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Message shown when initialization fails.
pub const INITIALIZATION_FAILED_MESSAGE: &str = "Crypto engine initialization failed.";

/// Message shown when an attempt's result was discarded by an identity
/// change or a disconnect.
pub const INITIALIZATION_SUPERSEDED_MESSAGE: &str =
    "Crypto engine initialization superseded by identity change.";

pub struct SessionManager<C, N>
where
    C: CryptoEngine,
    N: StatusNotifier,
{
    context: Mutex<SessionContext>,
    engine: Arc<C>,
    notifier: Arc<N>,
    state_tx: watch::Sender<SessionState>,
}

impl<C, N> SessionManager<C, N>
where
    C: CryptoEngine,
    N: StatusNotifier,
{
    pub fn new(engine: Arc<C>, notifier: Arc<N>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Uninitialized);
        Self {
            context: Mutex::new(SessionContext::new()),
            engine,
            notifier,
            state_tx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.context.lock().state()
    }

    /// Watch session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Initialization attempts started since construction.
    pub fn initialization_attempts(&self) -> u64 {
        self.context.lock().attempts_started()
    }

    /// Gate for crypto-dependent operations.
    pub fn require_ready(&self) -> LifecycleResult<Identity> {
        match self.state() {
            SessionState::Ready { identity } => Ok(identity),
            other => Err(LifecycleError::NotInitialized {
                state: other.label().to_string(),
            }),
        }
    }

    /// Handle an identity becoming available.
    ///
    /// Starts initialization when nothing is in flight. A repeat trigger for
    /// the identity already initializing or ready is coalesced and returns
    /// immediately. A different identity arriving mid-attempt is queued; its
    /// caller waits until the session settles.
    ///
    /// Returns the session state as seen by `identity`: `Uninitialized`
    /// when the session ended up belonging to another identity.
    pub async fn connect(&self, identity: Identity) -> SessionState {
        let (transition, queued) = {
            let mut context = self.context.lock();
            let transition = context.process_event(SessionEvent::IdentityConnected(identity));
            (transition, context.queued() == Some(identity))
        };
        self.publish(transition).await;

        let Some(mut next) = transition.started_attempt() else {
            if queued {
                debug!(identity = %identity, "[cvl] Identity queued behind initialization in flight");
                self.wait_until_settled().await;
            } else {
                debug!(
                    identity = %identity,
                    state = transition.current.label(),
                    "[cvl] Initialization trigger coalesced"
                );
            }
            return self.state_for(identity);
        };

        while let Some(started) = self.run_attempt(next).await {
            next = started;
        }
        self.state_for(identity)
    }

    /// Handle the identity going away. Any attempt in flight is discarded.
    pub async fn disconnect(&self) -> SessionState {
        let transition = self
            .context
            .lock()
            .process_event(SessionEvent::IdentityDisconnected);
        if transition.changed() {
            info!("[cvl] Identity disconnected, session reset");
        }
        self.publish(transition).await;
        transition.current
    }

    /// Run one attempt and feed its outcome back. Returns the queued attempt
    /// the outcome started, if any.
    async fn run_attempt(
        &self,
        (identity, attempt): (Identity, AttemptId),
    ) -> Option<(Identity, AttemptId)> {
        let operation_id = Uuid::new_v4();
        info!(identity = %identity, attempt, "[cvl] Initializing crypto engine");
        self.notifier
            .notify(
                OperationOutcome::<String>::pending("Initializing crypto engine...")
                    .into_notice(operation_id, OperationKind::Initialize),
            )
            .await;

        let result = self.engine.initialize(identity).await;

        let (outcome, reset) = {
            let mut context = self.context.lock();
            let outcome = context.process_event(match result {
                Ok(()) => SessionEvent::InitializationSucceeded { attempt },
                Err(_) => SessionEvent::InitializationFailed { attempt },
            });
            let reset = matches!(outcome.current, SessionState::Failed { .. })
                .then(|| context.process_event(SessionEvent::FailureAcknowledged));
            (outcome, reset)
        };

        let terminal: OperationOutcome<String> = match (&result, outcome.current) {
            (Ok(()), SessionState::Ready { .. }) => {
                metrics::record_initialization("succeeded");
                info!(identity = %identity, attempt, "[cvl] Crypto engine ready");
                OperationOutcome::Succeeded("Crypto engine ready".to_string())
            }
            (Err(e), _) if outcome.changed() => {
                metrics::record_initialization("failed");
                warn!(identity = %identity, attempt, error = %e, "[cvl] Crypto engine initialization failed");
                OperationOutcome::Failed(INITIALIZATION_FAILED_MESSAGE.to_string())
            }
            _ => {
                metrics::record_initialization("superseded");
                debug!(identity = %identity, attempt, "[cvl] Initialization result superseded");
                OperationOutcome::Failed(INITIALIZATION_SUPERSEDED_MESSAGE.to_string())
            }
        };

        if outcome.changed() {
            self.publish(outcome).await;
        } else {
            // Wake callers queued behind this attempt
            self.state_tx.send_replace(outcome.current);
        }
        if let Some(reset) = reset {
            self.publish(reset).await;
        }
        self.notifier
            .notify(terminal.into_notice(operation_id, OperationKind::Initialize))
            .await;

        outcome.started_attempt()
    }

    /// Wait until no attempt is in flight. Every processed outcome
    /// notifies the watch channel.
    async fn wait_until_settled(&self) {
        let mut state_rx = self.state_tx.subscribe();
        let _ = state_rx
            .wait_for(|_| !self.context.lock().has_attempt_in_flight())
            .await;
    }

    /// Current state from the point of view of `identity`.
    fn state_for(&self, identity: Identity) -> SessionState {
        let state = self.state();
        match state.identity() {
            Some(owner) if owner == identity => state,
            _ => SessionState::Uninitialized,
        }
    }

    async fn publish(&self, transition: SessionTransition) {
        if !transition.changed() {
            return;
        }
        metrics::set_session_state(transition.current.as_gauge());
        self.state_tx.send_replace(transition.current);
        self.notifier
            .emit(LifecycleEvent::SessionStateChanged {
                identity: transition
                    .current
                    .identity()
                    .or_else(|| transition.previous.identity()),
                previous: transition.previous.label().to_string(),
                current: transition.current.label().to_string(),
            })
            .await;
    }
}
