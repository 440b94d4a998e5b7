//! Transient operation outcome shown to the presentation layer
//!
//! Every `StatusNotice` the core emits is rendered from an outcome: pending
//! steps while an operation runs, then exactly one terminal outcome.

use serde::Serialize;
use shared_types::{OperationId, OperationKind, StatusNotice};

/// Outcome of one initialize/create/reveal/refresh invocation. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum OperationOutcome<T> {
    /// Still running; carries the step in progress.
    Pending(String),
    Succeeded(T),
    /// Short human-readable reason.
    Failed(String),
}

impl<T> OperationOutcome<T> {
    pub fn pending(step: impl Into<String>) -> Self {
        OperationOutcome::Pending(step.into())
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationOutcome::Pending(_))
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            OperationOutcome::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    /// Replace a success payload with its user-facing summary.
    pub fn summarize(self, summary: impl FnOnce(T) -> String) -> OperationOutcome<String> {
        match self {
            OperationOutcome::Pending(step) => OperationOutcome::Pending(step),
            OperationOutcome::Succeeded(payload) => OperationOutcome::Succeeded(summary(payload)),
            OperationOutcome::Failed(reason) => OperationOutcome::Failed(reason),
        }
    }
}

impl OperationOutcome<String> {
    /// Render as the notice for one operation invocation.
    pub fn into_notice(self, operation_id: OperationId, kind: OperationKind) -> StatusNotice {
        match self {
            OperationOutcome::Pending(step) => StatusNotice::pending(operation_id, kind, step),
            OperationOutcome::Succeeded(summary) => {
                StatusNotice::succeeded(operation_id, kind, summary)
            }
            OperationOutcome::Failed(reason) => StatusNotice::failed(operation_id, kind, reason),
        }
    }
}
