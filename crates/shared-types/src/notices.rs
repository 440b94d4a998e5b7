//! # Status Notices
//!
//! User-facing status transitions emitted for each lifecycle operation.
//! Notices are transient; nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlates all notices belonging to one operation invocation.
pub type OperationId = Uuid;

/// Operation a notice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Initialize,
    Create,
    Reveal,
    Refresh,
}

impl OperationKind {
    /// Stable lowercase label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Initialize => "initialize",
            OperationKind::Create => "create",
            OperationKind::Reveal => "reveal",
            OperationKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeStatus {
    Pending,
    Succeeded,
    Failed,
}

/// One status transition of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotice {
    pub operation_id: OperationId,
    pub kind: OperationKind,
    pub status: NoticeStatus,
    /// Short human-readable summary.
    pub message: String,
}

impl StatusNotice {
    pub fn pending(operation_id: OperationId, kind: OperationKind, message: impl Into<String>) -> Self {
        Self {
            operation_id,
            kind,
            status: NoticeStatus::Pending,
            message: message.into(),
        }
    }

    pub fn succeeded(
        operation_id: OperationId,
        kind: OperationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation_id,
            kind,
            status: NoticeStatus::Succeeded,
            message: message.into(),
        }
    }

    pub fn failed(operation_id: OperationId, kind: OperationKind, message: impl Into<String>) -> Self {
        Self {
            operation_id,
            kind,
            status: NoticeStatus::Failed,
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != NoticeStatus::Pending
    }
}
