//! # cvl-lifecycle
//!
//! Confidential Value Lifecycle: publish a record with one encrypted
//! attribute, then reveal that attribute through a decryption proof the
//! ledger verifies.
//!
//! ## Overview
//!
//! This crate provides:
//! - **Lifecycle Coordinator**: create and reveal flows with exactly-once
//!   verification
//! - **Session Manager**: one crypto engine initialization per identity,
//!   concurrent triggers coalesced
//! - **Monotonic cache**: a record shown as verified stays verified, and its
//!   value always comes from the ledger
//!
//! ## Architecture
//!
//! ```text
//! Presentation ──create/reveal/refresh──→ LifecycleCoordinator
//!                                             │
//!                                             ├── SessionManager ──→ CryptoEngine::initialize
//!                                             ├── CryptoEngine (encrypt, decrypt_with_proof)
//!                                             ├── LedgerClient (submit, finality, reads)
//!                                             └── StatusNotifier ──→ Presentation
//! ```
//!
//! ## Record State
//!
//! ```text
//! [UNVERIFIED] ──reveal: proof accepted by ledger──→ [VERIFIED { value }]
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use cvl_lifecycle::{LifecycleCoordinator, LifecycleConfig, SessionManager};
//! use cvl_lifecycle::ports::inbound::ConfidentialRecordApi;
//!
//! let session = Arc::new(SessionManager::new(engine.clone(), notifier.clone()));
//! session.connect(identity).await;
//!
//! let coordinator = LifecycleCoordinator::new(config, session, ledger, engine, notifier);
//! let record = coordinator
//!     .create(PublicAttributes::new("Engineer", 5, 120), 7)
//!     .await?;
//! let revealed = coordinator.reveal(record.id()).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod session_manager;
pub mod types;

pub use domain::{
    ActivityEntry, ConfidentialityState, OperationOutcome, Record, RegistryStats, RevealPath,
    Revelation, SessionState, SkillAnalysis,
};
pub use error::{
    ConfirmationFailure, LifecycleError, LifecycleResult, SubmissionFailure, VerificationFailure,
};
pub use ports::inbound::ConfidentialRecordApi;
pub use ports::outbound::{CryptoEngine, LedgerClient, StatusNotifier};
pub use service::LifecycleCoordinator;
pub use session_manager::{
    SessionManager, INITIALIZATION_FAILED_MESSAGE, INITIALIZATION_SUPERSEDED_MESSAGE,
};
pub use types::{ConfigError, LifecycleConfig};
