//! Ports module for the lifecycle core

pub mod inbound;
pub mod outbound;

pub use inbound::ConfidentialRecordApi;
pub use outbound::{CryptoEngine, LedgerClient, StatusNotifier};
