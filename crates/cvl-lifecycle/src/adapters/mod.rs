//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound ports against in-memory collaborators and the
//! shared event bus.

mod crypto_engine;
mod kms;
mod ledger;
mod notifier;

pub use crypto_engine::SimulatedCryptoEngine;
pub use kms::SimulatedKms;
pub use ledger::{InMemoryLedger, LedgerCall};
pub use notifier::{EventBusNotifier, RecordingNotifier};
