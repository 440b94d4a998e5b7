//! In-memory record ledger
//!
//! Implements `LedgerClient` with the record contract's rules: unique ids,
//! input proofs checked on creation, and a verification entry point that
//! accepts one valid decryption proof per record and rejects everything
//! after it with `RevertCode::AlreadyVerified`.
//!
//! Writes are included at submission and final at the next
//! `await_finality`. A scripted `Reverted` finality undoes the inclusion.
//! Tests can also script other failures per call, delay finality and serve
//! stale reads.

use super::kms::SimulatedKms;
use crate::ports::outbound::LedgerClient;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use sha3::{Digest, Keccak256};
use shared_types::{
    decode_clear_values, ConfidentialHandle, ConfirmedReceipt, ContractAddress,
    CreateRecordRequest, LedgerError, PendingReceipt, RecordId, RecordSnapshot, RevertCode,
    TxHash, VerificationRequest,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Ledger calls that can be scripted to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerCall {
    SubmitCreate,
    AwaitFinality,
    GetAllRecordIds,
    GetRecord,
    GetConfidentialHandle,
    SubmitVerification,
}

struct StoredRecord {
    snapshot: RecordSnapshot,
    handle: ConfidentialHandle,
}

/// State change a transaction applied when it was included.
#[derive(Clone, Debug)]
enum Inclusion {
    Create(RecordId),
    Verification(RecordId),
}

#[derive(Default)]
struct LedgerState {
    records: HashMap<RecordId, StoredRecord>,
    order: Vec<RecordId>,
    receipts: HashMap<TxHash, ConfirmedReceipt>,
    inclusions: HashMap<TxHash, Inclusion>,
    block_number: u64,
    tx_count: u64,
}

impl LedgerState {
    fn include(&mut self, inclusion: Inclusion) -> TxHash {
        self.tx_count += 1;
        self.block_number += 1;
        let mut hasher = Keccak256::new();
        hasher.update(self.tx_count.to_be_bytes());
        let tx_hash = TxHash(hasher.finalize().into());
        self.receipts.insert(
            tx_hash,
            ConfirmedReceipt {
                tx_hash,
                block_number: self.block_number,
            },
        );
        self.inclusions.insert(tx_hash, inclusion);
        tx_hash
    }

    /// Undo the writes of an included transaction.
    fn roll_back(&mut self, tx_hash: &TxHash) {
        self.receipts.remove(tx_hash);
        match self.inclusions.remove(tx_hash) {
            Some(Inclusion::Create(id)) => {
                self.records.remove(&id);
                self.order.retain(|existing| existing != &id);
            }
            Some(Inclusion::Verification(id)) => {
                if let Some(stored) = self.records.get_mut(&id) {
                    stored.snapshot.is_verified = false;
                    stored.snapshot.decrypted_value = 0;
                }
            }
            None => {}
        }
    }
}

pub struct InMemoryLedger {
    contract: ContractAddress,
    kms: Arc<SimulatedKms>,
    state: RwLock<LedgerState>,
    faults: Mutex<HashMap<LedgerCall, VecDeque<LedgerError>>>,
    finality_delay: Mutex<Option<Duration>>,
    stale_reads: AtomicUsize,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl InMemoryLedger {
    pub fn new(contract: ContractAddress, kms: Arc<SimulatedKms>) -> Self {
        Self {
            contract,
            kms,
            state: RwLock::new(LedgerState::default()),
            faults: Mutex::new(HashMap::new()),
            finality_delay: Mutex::new(None),
            stale_reads: AtomicUsize::new(0),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    pub fn contract(&self) -> ContractAddress {
        self.contract
    }

    /// Fail the next `call` with `error`. Queued errors are used in order.
    pub fn fail_next(&self, call: LedgerCall, error: LedgerError) {
        self.faults.lock().entry(call).or_default().push_back(error);
    }

    /// Delay every `await_finality` by `delay`.
    pub fn set_finality_delay(&self, delay: Option<Duration>) {
        *self.finality_delay.lock() = delay;
    }

    /// Serve the next `count` reads of verified records as unverified.
    pub fn serve_stale_reads(&self, count: usize) {
        self.stale_reads.store(count, Ordering::SeqCst);
    }

    /// Submissions received (create and verification), including rejected ones.
    pub fn write_calls(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Ledger-side view, bypassing stale-read simulation.
    pub fn stored_snapshot(&self, id: &RecordId) -> Option<RecordSnapshot> {
        self.state
            .read()
            .records
            .get(id)
            .map(|stored| stored.snapshot.clone())
    }

    /// Number of verification transitions the ledger has applied.
    pub fn verified_count(&self) -> usize {
        self.state
            .read()
            .records
            .values()
            .filter(|stored| stored.snapshot.is_verified)
            .count()
    }

    fn scripted(&self, call: LedgerCall) -> Result<(), LedgerError> {
        match self.faults.lock().get_mut(&call).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn rejected(code: RevertCode, reason: &str) -> LedgerError {
        LedgerError::Rejected {
            code,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn submit_create(
        &self,
        request: CreateRecordRequest,
    ) -> Result<PendingReceipt, LedgerError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.scripted(LedgerCall::SubmitCreate)?;

        if !self
            .kms
            .verify_input(self.contract, request.sender, &request.encrypted)
        {
            return Err(Self::rejected(
                RevertCode::InvalidInputProof,
                "Invalid input proof",
            ));
        }

        let mut state = self.state.write();
        if state.records.contains_key(&request.id) {
            return Err(Self::rejected(
                RevertCode::DuplicateRecord,
                "Record already exists",
            ));
        }

        let handle = self.kms.handle_for(&request.encrypted.ciphertext);
        self.kms
            .register(handle, request.encrypted.ciphertext.clone());

        let attributes = request.attributes;
        let snapshot = RecordSnapshot {
            id: request.id.clone(),
            title: attributes.title,
            required_level: attributes.required_level,
            salary_bracket: attributes.salary_bracket,
            description: attributes.description,
            creator: request.sender,
            timestamp: chrono::Utc::now().timestamp().max(0) as u64,
            is_verified: false,
            decrypted_value: 0,
        };
        state.order.push(request.id.clone());
        state
            .records
            .insert(request.id.clone(), StoredRecord { snapshot, handle });
        let tx_hash = state.include(Inclusion::Create(request.id.clone()));

        debug!(record_id = %request.id, tx_hash = %tx_hash, "[ledger] Record created");
        Ok(PendingReceipt { tx_hash })
    }

    async fn await_finality(
        &self,
        receipt: &PendingReceipt,
    ) -> Result<ConfirmedReceipt, LedgerError> {
        if let Err(error) = self.scripted(LedgerCall::AwaitFinality) {
            if matches!(error, LedgerError::Reverted { .. }) {
                self.state.write().roll_back(&receipt.tx_hash);
                debug!(tx_hash = %receipt.tx_hash, "[ledger] Transaction reverted");
            }
            return Err(error);
        }

        let delay = *self.finality_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.state
            .read()
            .receipts
            .get(&receipt.tx_hash)
            .cloned()
            .ok_or(LedgerError::UnknownTransaction(receipt.tx_hash))
    }

    async fn get_all_record_ids(&self) -> Result<Vec<RecordId>, LedgerError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.scripted(LedgerCall::GetAllRecordIds)?;
        Ok(self.state.read().order.clone())
    }

    async fn get_record(&self, id: &RecordId) -> Result<RecordSnapshot, LedgerError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.scripted(LedgerCall::GetRecord)?;

        let mut snapshot = self
            .stored_snapshot(id)
            .ok_or_else(|| LedgerError::RecordNotFound(id.clone()))?;

        if snapshot.is_verified
            && self
                .stale_reads
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        {
            snapshot.is_verified = false;
            snapshot.decrypted_value = 0;
        }
        Ok(snapshot)
    }

    async fn get_confidential_handle(
        &self,
        id: &RecordId,
    ) -> Result<ConfidentialHandle, LedgerError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.scripted(LedgerCall::GetConfidentialHandle)?;

        self.state
            .read()
            .records
            .get(id)
            .map(|stored| stored.handle)
            .ok_or_else(|| LedgerError::RecordNotFound(id.clone()))
    }

    async fn submit_verification(
        &self,
        request: VerificationRequest,
    ) -> Result<PendingReceipt, LedgerError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.scripted(LedgerCall::SubmitVerification)?;

        let mut state = self.state.write();
        let stored = state
            .records
            .get_mut(&request.id)
            .ok_or_else(|| Self::rejected(RevertCode::RecordNotFound, "Record does not exist"))?;

        if stored.snapshot.is_verified {
            return Err(Self::rejected(
                RevertCode::AlreadyVerified,
                "Data already verified",
            ));
        }

        if !self.kms.verify_decryption(
            self.contract,
            &[stored.handle],
            &request.abi_encoded_clear_values,
            &request.proof,
        ) {
            return Err(Self::rejected(
                RevertCode::InvalidProof,
                "Invalid decryption proof",
            ));
        }

        let value = decode_clear_values(&request.abi_encoded_clear_values)
            .ok()
            .and_then(|values| values.first().copied())
            .ok_or_else(|| Self::rejected(RevertCode::InvalidProof, "Malformed clear values"))?;

        stored.snapshot.is_verified = true;
        stored.snapshot.decrypted_value = value;
        let tx_hash = state.include(Inclusion::Verification(request.id.clone()));

        debug!(record_id = %request.id, tx_hash = %tx_hash, "[ledger] Record verified");
        Ok(PendingReceipt { tx_hash })
    }
}
