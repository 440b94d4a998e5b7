//! Crypto engine over the simulated KMS
//!
//! Mirrors the client SDK of a homomorphic ledger: `initialize` loads key
//! material for an identity, `encrypt` requires it, and public decryption
//! returns clear values with a proof but never talks to the ledger.

use super::kms::SimulatedKms;
use crate::ports::outbound::CryptoEngine;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{
    ConfidentialHandle, ContractAddress, CryptoError, DecryptionResult, EncryptedInput, Identity,
};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

pub struct SimulatedCryptoEngine {
    kms: Arc<SimulatedKms>,
    initialized: RwLock<HashSet<Identity>>,
    init_failures: Mutex<VecDeque<CryptoError>>,
    encrypt_failures: Mutex<VecDeque<CryptoError>>,
    decrypt_failures: Mutex<VecDeque<CryptoError>>,
    init_calls: AtomicU64,
    encrypt_calls: AtomicU64,
    decrypt_calls: AtomicU64,
}

impl SimulatedCryptoEngine {
    pub fn new(kms: Arc<SimulatedKms>) -> Self {
        Self {
            kms,
            initialized: RwLock::new(HashSet::new()),
            init_failures: Mutex::new(VecDeque::new()),
            encrypt_failures: Mutex::new(VecDeque::new()),
            decrypt_failures: Mutex::new(VecDeque::new()),
            init_calls: AtomicU64::new(0),
            encrypt_calls: AtomicU64::new(0),
            decrypt_calls: AtomicU64::new(0),
        }
    }

    /// Fail the next `initialize` with `error`.
    pub fn fail_next_initialize(&self, error: CryptoError) {
        self.init_failures.lock().push_back(error);
    }

    /// Fail the next `encrypt` of an initialized identity with `error`.
    pub fn fail_next_encrypt(&self, error: CryptoError) {
        self.encrypt_failures.lock().push_back(error);
    }

    /// Fail the next `decrypt_with_proof` with `error`.
    pub fn fail_next_decrypt(&self, error: CryptoError) {
        self.decrypt_failures.lock().push_back(error);
    }

    pub fn is_initialized_for(&self, identity: &Identity) -> bool {
        self.initialized.read().contains(identity)
    }

    pub fn init_calls(&self) -> u64 {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn encrypt_calls(&self) -> u64 {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> u64 {
        self.decrypt_calls.load(Ordering::SeqCst)
    }

    /// Calls of any kind made against the engine.
    pub fn total_calls(&self) -> u64 {
        self.init_calls() + self.encrypt_calls() + self.decrypt_calls()
    }
}

#[async_trait]
impl CryptoEngine for SimulatedCryptoEngine {
    async fn initialize(&self, identity: Identity) -> Result<(), CryptoError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        // Key loading is asynchronous in real engines; let other tasks run.
        tokio::task::yield_now().await;

        let scripted = self.init_failures.lock().pop_front();
        if let Some(error) = scripted {
            return Err(error);
        }
        self.initialized.write().insert(identity);
        debug!(identity = %identity, "[engine] Initialized");
        Ok(())
    }

    async fn encrypt(
        &self,
        context: ContractAddress,
        identity: Identity,
        value: u32,
    ) -> Result<EncryptedInput, CryptoError> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_initialized_for(&identity) {
            return Err(CryptoError::NotInitialized(identity));
        }
        let scripted = self.encrypt_failures.lock().pop_front();
        if let Some(error) = scripted {
            return Err(error);
        }
        Ok(self.kms.encrypt(context, identity, value))
    }

    async fn decrypt_with_proof(
        &self,
        context: ContractAddress,
        handles: &[ConfidentialHandle],
    ) -> Result<DecryptionResult, CryptoError> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        // Relayer round trip
        tokio::task::yield_now().await;

        let scripted = self.decrypt_failures.lock().pop_front();
        if let Some(error) = scripted {
            return Err(error);
        }
        self.kms.public_decrypt(context, handles)
    }
}
