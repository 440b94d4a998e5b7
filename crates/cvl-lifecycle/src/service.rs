//! Lifecycle Coordinator - create and reveal flows
//!
//! ```text
//! create:  session ready? ─→ validate ─→ encrypt ─→ submit_create ─→ finality ─→ re-fetch
//! reveal:  session ready? ─→ get_record ──verified──→ done (no writes)
//!                               │
//!                               └─→ handle ─→ decrypt+proof ─→ submit_verification ─→ finality ─→ re-fetch
//!                                                                   │
//!                                                                   └─ AlreadyVerified ─→ re-fetch
//! ```
//!
//! The local cache is only written with snapshots read back from the ledger.
//! Plaintext produced by the crypto engine is forwarded to the ledger and
//! compared against the confirmed value, never cached.

use crate::domain::{
    ActivityEntry, ActivityLog, OperationOutcome, Record, RecordStore, RegistryStats, RevealPath,
    Revelation, SkillAnalysis, SnapshotMerge,
};
use crate::error::{
    ConfirmationFailure, LifecycleError, LifecycleResult, SubmissionFailure, VerificationFailure,
};
use crate::metrics;
use crate::ports::inbound::ConfidentialRecordApi;
use crate::ports::outbound::{CryptoEngine, LedgerClient, StatusNotifier};
use crate::session_manager::SessionManager;
use crate::types::LifecycleConfig;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::LifecycleEvent;
use shared_types::{
    ConfirmedReceipt, CreateRecordRequest, LedgerError, OperationId, OperationKind,
    PendingReceipt, PublicAttributes, RecordId, RecordSnapshot, RevertCode,
    VerificationRequest,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Cache and history, written only after a confirmed ledger read.
struct CoordinatorState {
    records: RecordStore,
    activity: ActivityLog,
}

/// Lifecycle Coordinator implementation
pub struct LifecycleCoordinator<L, C, N>
where
    L: LedgerClient,
    C: CryptoEngine,
    N: StatusNotifier,
{
    config: LifecycleConfig,
    session: Arc<SessionManager<C, N>>,
    ledger: Arc<L>,
    engine: Arc<C>,
    notifier: Arc<N>,
    state: RwLock<CoordinatorState>,
}

impl<L, C, N> LifecycleCoordinator<L, C, N>
where
    L: LedgerClient,
    C: CryptoEngine,
    N: StatusNotifier,
{
    pub fn new(
        config: LifecycleConfig,
        session: Arc<SessionManager<C, N>>,
        ledger: Arc<L>,
        engine: Arc<C>,
        notifier: Arc<N>,
    ) -> Self {
        let activity = ActivityLog::new(config.activity_log_capacity);
        Self {
            config,
            session,
            ledger,
            engine,
            notifier,
            state: RwLock::new(CoordinatorState {
                records: RecordStore::new(),
                activity,
            }),
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager<C, N>> {
        &self.session
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    async fn create_record(
        &self,
        operation_id: OperationId,
        attributes: PublicAttributes,
        secret_value: u32,
    ) -> LifecycleResult<Record> {
        let identity = self.session.require_ready()?;
        self.validate_create(&attributes, secret_value)?;

        self.progress(operation_id, OperationKind::Create, "Creating record with encrypted value...")
            .await;

        let encrypted = self
            .engine
            .encrypt(self.config.contract, identity, secret_value)
            .await
            .map_err(|e| LifecycleError::Encryption {
                reason: e.to_string(),
            })?;

        let id = RecordId::generate();
        let request = CreateRecordRequest {
            id: id.clone(),
            attributes,
            encrypted,
            sender: identity,
        };

        let pending = self
            .ledger
            .submit_create(request)
            .await
            .map_err(|e| LifecycleError::Submission(submission_failure(e)))?;
        debug!(record_id = %id, tx_hash = %pending.tx_hash, "[cvl] Create submitted");

        let confirmed = self
            .await_confirmation(&pending)
            .await
            .map_err(|e| LifecycleError::Confirmation(confirmation_failure(e)))?;
        info!(
            record_id = %id,
            tx_hash = %confirmed.tx_hash,
            block = confirmed.block_number,
            "[cvl] Record creation final"
        );

        let snapshot = self.read_after_write(&id, |_| true).await?;
        let (record, _) = self.state.write().records.upsert(&snapshot);
        self.refresh_gauges();

        self.notifier
            .emit(LifecycleEvent::RecordCreated {
                record_id: id,
                creator: identity,
                tx_hash: confirmed.tx_hash,
            })
            .await;
        self.append_activity("Created record").await;

        Ok(record)
    }

    fn validate_create(
        &self,
        attributes: &PublicAttributes,
        secret_value: u32,
    ) -> LifecycleResult<()> {
        if attributes.title.trim().is_empty() {
            return Err(LifecycleError::Validation {
                field: "title",
                reason: "must not be empty".to_string(),
            });
        }
        let domain = self.config.value_domain();
        if !domain.contains(&secret_value) {
            return Err(LifecycleError::Validation {
                field: "secret_value",
                reason: format!(
                    "{} is outside {}..={}",
                    secret_value,
                    domain.start(),
                    domain.end()
                ),
            });
        }
        Ok(())
    }

    // =========================================================================
    // REVEAL
    // =========================================================================

    async fn reveal_record(
        &self,
        operation_id: OperationId,
        id: &RecordId,
    ) -> LifecycleResult<Revelation> {
        let identity = self.session.require_ready()?;

        self.progress(operation_id, OperationKind::Reveal, "Checking verification status...")
            .await;

        let current = self
            .ledger
            .get_record(id)
            .await
            .map_err(|e| LifecycleError::RecordFetch {
                reason: e.to_string(),
            })?;
        self.merge_snapshot(&current);

        if let Some(value) = current.verified_value() {
            debug!(record_id = %id, "[cvl] Record already verified on ledger");
            self.append_activity("Value already verified").await;
            return Ok(Revelation {
                record_id: id.clone(),
                value,
                path: RevealPath::AlreadyVerified,
            });
        }

        let handle = self
            .ledger
            .get_confidential_handle(id)
            .await
            .map_err(|e| LifecycleError::HandleFetch {
                reason: e.to_string(),
            })?;
        if !self.state.write().records.attach_handle(id, handle) {
            warn!(record_id = %id, handle = %handle, "[cvl] Ledger returned a different handle than cached");
        }

        self.progress(operation_id, OperationKind::Reveal, "Decrypting with proof...")
            .await;

        let decrypted = self
            .engine
            .decrypt_with_proof(self.config.contract, &[handle])
            .await
            .map_err(|e| LifecycleError::Decryption {
                reason: e.to_string(),
            })?;
        let clear_value =
            decrypted
                .value_for(&handle)
                .ok_or_else(|| LifecycleError::Decryption {
                    reason: format!("no clear value returned for handle {}", handle),
                })?;

        let request = VerificationRequest {
            id: id.clone(),
            abi_encoded_clear_values: decrypted.abi_encoded_clear_values,
            proof: decrypted.proof,
            sender: identity,
        };

        let path = match self.submit_verification(request).await {
            Ok(confirmed) => {
                debug!(record_id = %id, tx_hash = %confirmed.tx_hash, "[cvl] Verification final");
                RevealPath::Decrypted
            }
            Err(VerificationFailure::AlreadyVerified) => {
                info!(record_id = %id, "[cvl] Verification lost to a concurrent submission");
                RevealPath::RaceResolved
            }
            Err(failure) => return Err(LifecycleError::Verification(failure)),
        };

        let confirmed = self
            .read_after_write(id, |snapshot| snapshot.is_verified)
            .await?;
        // The ledger's value is authoritative; a mismatch means this call's
        // plaintext was not the one the ledger accepted.
        let value = confirmed.decrypted_value;
        if path == RevealPath::Decrypted && value != clear_value {
            warn!(
                record_id = %id,
                "[cvl] Confirmed value differs from locally decrypted value"
            );
        }

        self.merge_snapshot(&confirmed);
        self.notifier
            .emit(LifecycleEvent::RecordVerified {
                record_id: id.clone(),
                value,
                path: path.to_string(),
            })
            .await;
        self.append_activity("Revealed value").await;

        Ok(Revelation {
            record_id: id.clone(),
            value,
            path,
        })
    }

    /// Submit the proof and wait for finality, classifying failures.
    async fn submit_verification(
        &self,
        request: VerificationRequest,
    ) -> Result<ConfirmedReceipt, VerificationFailure> {
        let pending = self
            .ledger
            .submit_verification(request)
            .await
            .map_err(verification_failure)?;
        self.await_confirmation(&pending)
            .await
            .map_err(verification_failure)
    }

    // =========================================================================
    // REFRESH
    // =========================================================================

    async fn refresh_records(&self, operation_id: OperationId) -> LifecycleResult<Vec<Record>> {
        self.progress(operation_id, OperationKind::Refresh, "Loading records...")
            .await;

        let ids = self
            .ledger
            .get_all_record_ids()
            .await
            .map_err(|e| LifecycleError::RecordFetch {
                reason: e.to_string(),
            })?;

        let mut snapshots = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.ledger.get_record(id).await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    metrics::record_snapshot_skipped();
                    warn!(record_id = %id, error = %e, "[cvl] Skipping record that failed to load");
                }
            }
        }

        let (records, rejected) = {
            let mut state = self.state.write();
            let rejected = state.records.replace_all(&snapshots);
            (state.records.records(), rejected)
        };
        if rejected > 0 {
            metrics::record_stale_reads(rejected);
            debug!(rejected, "[cvl] Kept verified records over stale snapshots");
        }
        self.refresh_gauges();

        self.notifier
            .emit(LifecycleEvent::RecordsRefreshed {
                count: records.len(),
            })
            .await;
        self.append_activity("Records refreshed").await;

        Ok(records)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Wait for finality within the configured deadline.
    async fn await_confirmation(
        &self,
        pending: &PendingReceipt,
    ) -> Result<ConfirmedReceipt, LedgerError> {
        match tokio::time::timeout(
            self.config.finality_timeout,
            self.ledger.await_finality(pending),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LedgerError::FinalityTimeout {
                tx_hash: pending.tx_hash,
            }),
        }
    }

    /// Read a record back after a confirmed write until `accept` holds.
    async fn read_after_write<F>(
        &self,
        id: &RecordId,
        accept: F,
    ) -> LifecycleResult<RecordSnapshot>
    where
        F: Fn(&RecordSnapshot) -> bool + Send + Sync,
    {
        let attempts = self.config.read_after_write_attempts.max(1);
        let mut last_problem = String::new();

        for attempt in 1..=attempts {
            match self.ledger.get_record(id).await {
                Ok(snapshot) if accept(&snapshot) => return Ok(snapshot),
                Ok(_) => {
                    last_problem = "ledger has not reflected the confirmed write".to_string();
                }
                Err(e) => last_problem = e.to_string(),
            }
            debug!(record_id = %id, attempt, problem = %last_problem, "[cvl] Read after write not yet consistent");
            if attempt < attempts {
                tokio::time::sleep(self.config.read_retry_delay).await;
            }
        }

        Err(LifecycleError::RecordFetch {
            reason: format!("{} after {} reads: {}", id, attempts, last_problem),
        })
    }

    fn merge_snapshot(&self, snapshot: &RecordSnapshot) {
        let (_, merge) = self.state.write().records.upsert(snapshot);
        match merge {
            SnapshotMerge::StaleIgnored | SnapshotMerge::ConflictIgnored => {
                metrics::record_stale_reads(1);
                warn!(record_id = %snapshot.id, ?merge, "[cvl] Ignored snapshot that contradicts verified state");
            }
            SnapshotMerge::BecameVerified | SnapshotMerge::Unchanged => {}
        }
        self.refresh_gauges();
    }

    fn refresh_gauges(&self) {
        let stats = self.state.read().records.stats();
        metrics::set_cached_records(stats.total, stats.verified);
    }

    async fn append_activity(&self, action: &str) {
        let entry = self.state.write().activity.append(action);
        self.notifier
            .emit(LifecycleEvent::ActivityAppended {
                entry: entry.to_string(),
            })
            .await;
    }

    /// Emit a pending notice for one step of an operation.
    async fn progress(&self, operation_id: OperationId, kind: OperationKind, step: &str) {
        let notice = OperationOutcome::<String>::pending(step).into_notice(operation_id, kind);
        self.notifier.notify(notice).await;
    }

    /// Emit the terminal notice and metrics for one operation.
    async fn finish<T>(
        &self,
        operation_id: OperationId,
        kind: OperationKind,
        result: &LifecycleResult<T>,
        success_message: impl FnOnce(&T) -> String,
    ) {
        let outcome = match result {
            Ok(payload) => {
                metrics::record_operation(kind.as_str(), "succeeded");
                OperationOutcome::Succeeded(payload)
            }
            Err(e) => {
                metrics::record_operation(kind.as_str(), "failed");
                metrics::record_failure(e.kind());
                warn!(operation = %kind, error = %e, kind = e.kind(), "[cvl] Operation failed");
                OperationOutcome::Failed(e.user_message().to_string())
            }
        };
        let notice = outcome
            .summarize(success_message)
            .into_notice(operation_id, kind);
        self.notifier.notify(notice).await;
    }
}

#[async_trait]
impl<L, C, N> ConfidentialRecordApi for LifecycleCoordinator<L, C, N>
where
    L: LedgerClient,
    C: CryptoEngine,
    N: StatusNotifier,
{
    async fn create(
        &self,
        attributes: PublicAttributes,
        secret_value: u32,
    ) -> LifecycleResult<Record> {
        let operation_id = Uuid::new_v4();
        let result = self
            .create_record(operation_id, attributes, secret_value)
            .await;
        self.finish(operation_id, OperationKind::Create, &result, |_| {
            "Record created successfully!".to_string()
        })
        .await;
        result
    }

    async fn reveal(&self, id: &RecordId) -> LifecycleResult<Revelation> {
        let operation_id = Uuid::new_v4();
        let result = self.reveal_record(operation_id, id).await;
        if let Ok(revelation) = &result {
            metrics::record_reveal(revelation.path.as_str());
        }
        self.finish(operation_id, OperationKind::Reveal, &result, |r| {
            match r.path {
                RevealPath::AlreadyVerified => "Data is already verified".to_string(),
                RevealPath::Decrypted | RevealPath::RaceResolved => {
                    "Value decrypted and verified".to_string()
                }
            }
        })
        .await;
        result
    }

    async fn refresh(&self) -> LifecycleResult<Vec<Record>> {
        let operation_id = Uuid::new_v4();
        let result = self.refresh_records(operation_id).await;
        self.finish(operation_id, OperationKind::Refresh, &result, |records| {
            format!("Loaded {} records", records.len())
        })
        .await;
        result
    }

    fn records(&self) -> Vec<Record> {
        self.state.read().records.records()
    }

    fn record(&self, id: &RecordId) -> Option<Record> {
        self.state.read().records.get(id).cloned()
    }

    fn stats(&self) -> RegistryStats {
        self.state.read().records.stats()
    }

    fn history(&self) -> Vec<ActivityEntry> {
        self.state.read().activity.entries()
    }

    fn analyze(&self, id: &RecordId, candidate_level: Option<u32>) -> Option<SkillAnalysis> {
        self.state
            .read()
            .records
            .get(id)
            .map(|record| SkillAnalysis::compute(record, candidate_level))
    }
}

// =============================================================================
// ERROR CLASSIFICATION
// =============================================================================

fn submission_failure(e: LedgerError) -> SubmissionFailure {
    match e {
        LedgerError::RejectedBySigner { reason } => SubmissionFailure::RejectedBySigner { reason },
        other => SubmissionFailure::RejectedByLedger {
            reason: other.to_string(),
        },
    }
}

/// Finality not observed (deadline or transport) is a timeout; anything the
/// ledger decided is a revert.
fn confirmation_failure(e: LedgerError) -> ConfirmationFailure {
    match e {
        LedgerError::FinalityTimeout { .. } | LedgerError::Network(_) => {
            ConfirmationFailure::Timeout
        }
        other => ConfirmationFailure::Reverted {
            reason: other.to_string(),
        },
    }
}

fn verification_failure(e: LedgerError) -> VerificationFailure {
    if e.is_already_verified() {
        return VerificationFailure::AlreadyVerified;
    }
    match e {
        LedgerError::RejectedBySigner { reason } => VerificationFailure::RejectedBySigner { reason },
        ref other if other.revert_code() == Some(RevertCode::InvalidProof) => {
            VerificationFailure::ProofRejected {
                reason: other.to_string(),
            }
        }
        other => VerificationFailure::Ledger {
            reason: other.to_string(),
        },
    }
}
