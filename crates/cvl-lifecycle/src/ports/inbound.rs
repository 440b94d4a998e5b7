//! Driving Ports (API - Inbound)
//!
//! What the presentation layer may invoke on the lifecycle core.

use crate::domain::{ActivityEntry, Record, RegistryStats, Revelation, SkillAnalysis};
use crate::error::LifecycleResult;
use async_trait::async_trait;
use shared_types::{PublicAttributes, RecordId};

/// Confidential record operations.
#[async_trait]
pub trait ConfidentialRecordApi: Send + Sync {
    /// Encrypt `secret_value`, publish it with `attributes` and wait for
    /// finality.
    ///
    /// Fails with `NotInitialized` before touching any collaborator when the
    /// session is not ready, and with `Validation` before encrypting when the
    /// value is outside the configured domain or the title is blank.
    async fn create(
        &self,
        attributes: PublicAttributes,
        secret_value: u32,
    ) -> LifecycleResult<Record>;

    /// Obtain the ledger-verified plaintext of a record.
    ///
    /// Idempotent: a record the ledger already reports as verified is
    /// answered from the ledger without crypto work or writes.
    async fn reveal(&self, id: &RecordId) -> LifecycleResult<Revelation>;

    /// Re-list the registry from the ledger and replace the local cache.
    async fn refresh(&self) -> LifecycleResult<Vec<Record>>;

    /// Cached records in listing order.
    fn records(&self) -> Vec<Record>;

    fn record(&self, id: &RecordId) -> Option<Record>;

    fn stats(&self) -> RegistryStats;

    /// Recent activity, oldest first.
    fn history(&self) -> Vec<ActivityEntry>;

    /// Skill match analysis for a cached record.
    fn analyze(&self, id: &RecordId, candidate_level: Option<u32>) -> Option<SkillAnalysis>;
}
