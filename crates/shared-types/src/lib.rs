//! # Shared Types Crate
//!
//! This crate contains the values that cross the boundary between the
//! lifecycle core and the collaborators it drives: the ledger client and the
//! crypto engine.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every type passed through a port is defined here.
//! - **Opaque Handles**: Ciphertexts are only ever addressed by `ConfidentialHandle`;
//!   the core never inspects ciphertext bytes.
//! - **Structured Rejections**: Ledger rejections carry a `RevertCode` so callers
//!   never branch on human-readable text.

pub mod encoding;
pub mod entities;
pub mod errors;
pub mod notices;

pub use encoding::{decode_clear_values, encode_clear_values, ABI_WORD_SIZE};
pub use entities::*;
pub use errors::*;
pub use notices::{NoticeStatus, OperationId, OperationKind, StatusNotice};
