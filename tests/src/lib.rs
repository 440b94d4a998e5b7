//! # Confidential Value Lifecycle Test Suite
//!
//! Unified test crate driving the lifecycle core against the in-memory
//! ledger, the simulated crypto engine and the event bus.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Wiring shared by every scenario
//! ├── integration/
//! │   ├── lifecycle_flows.rs   # Create, reveal, refresh end to end
//! │   ├── session_gating.rs    # Initialization gate and coalescing
//! │   ├── failure_paths.rs     # One test per collaborator failure kind
//! │   ├── races.rs             # Concurrent reveals, stale reads
//! │   └── event_flow.rs        # Notices and events on the shared bus
//! └── invariants.rs     # Property tests over random operation sequences
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cvl-tests
//! cargo test -p cvl-tests integration::races
//! ```

#![allow(dead_code)]

#[cfg(test)]
mod harness;
pub mod integration;
pub mod invariants;
