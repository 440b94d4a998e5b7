//! # Lifecycle Metrics
//!
//! Prometheus metrics for the lifecycle core.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! cvl-lifecycle = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `cvl_operations_total` - Counter of operations by kind and outcome
//! - `cvl_failures_total` - Counter of failures by error kind
//! - `cvl_reveals_total` - Counter of successful reveals by path
//! - `cvl_initializations_total` - Counter of engine initializations by outcome
//! - `cvl_snapshots_skipped_total` - Counter of snapshots skipped during refresh
//! - `cvl_stale_reads_total` - Counter of stale reads rejected by the cache
//! - `cvl_session_state` - Gauge of session state (0=Uninitialized, 1=Initializing, 2=Ready, 3=Failed)
//! - `cvl_cached_records` / `cvl_verified_records` - Gauges over the record cache

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Operations by kind (create, reveal, refresh) and outcome
    pub static ref OPERATIONS: IntCounterVec = register_int_counter_vec!(
        "cvl_operations_total",
        "Total lifecycle operations",
        &["kind", "outcome"]
    )
    .expect("Failed to create OPERATIONS metric");

    /// Failures by error kind
    pub static ref FAILURES: IntCounterVec = register_int_counter_vec!(
        "cvl_failures_total",
        "Total lifecycle failures",
        &["kind"]
    )
    .expect("Failed to create FAILURES metric");

    /// Successful reveals by path
    pub static ref REVEALS: IntCounterVec = register_int_counter_vec!(
        "cvl_reveals_total",
        "Total successful reveals",
        &["path"]
    )
    .expect("Failed to create REVEALS metric");

    /// Engine initializations by outcome
    pub static ref INITIALIZATIONS: IntCounterVec = register_int_counter_vec!(
        "cvl_initializations_total",
        "Total crypto engine initialization attempts",
        &["outcome"]
    )
    .expect("Failed to create INITIALIZATIONS metric");

    /// Snapshots skipped during refresh
    pub static ref SNAPSHOTS_SKIPPED: IntCounter = register_int_counter!(
        "cvl_snapshots_skipped_total",
        "Record snapshots that failed to load during refresh"
    )
    .expect("Failed to create SNAPSHOTS_SKIPPED metric");

    /// Stale reads rejected by the cache
    pub static ref STALE_READS: IntCounter = register_int_counter!(
        "cvl_stale_reads_total",
        "Snapshots that would have downgraded or altered a verified record"
    )
    .expect("Failed to create STALE_READS metric");

    /// Session state
    pub static ref SESSION_STATE: IntGauge = register_int_gauge!(
        "cvl_session_state",
        "Current session state (0=Uninitialized, 1=Initializing, 2=Ready, 3=Failed)"
    )
    .expect("Failed to create SESSION_STATE metric");

    /// Cached records
    pub static ref CACHED_RECORDS: IntGauge = register_int_gauge!(
        "cvl_cached_records",
        "Records in the local cache"
    )
    .expect("Failed to create CACHED_RECORDS metric");

    /// Cached verified records
    pub static ref VERIFIED_RECORDS: IntGauge = register_int_gauge!(
        "cvl_verified_records",
        "Verified records in the local cache"
    )
    .expect("Failed to create VERIFIED_RECORDS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a finished operation
#[cfg(feature = "metrics")]
pub fn record_operation(kind: &str, outcome: &str) {
    OPERATIONS.with_label_values(&[kind, outcome]).inc();
}

/// Record a failure by error kind
#[cfg(feature = "metrics")]
pub fn record_failure(kind: &str) {
    FAILURES.with_label_values(&[kind]).inc();
}

/// Record a successful reveal
#[cfg(feature = "metrics")]
pub fn record_reveal(path: &str) {
    REVEALS.with_label_values(&[path]).inc();
}

/// Record an initialization outcome
#[cfg(feature = "metrics")]
pub fn record_initialization(outcome: &str) {
    INITIALIZATIONS.with_label_values(&[outcome]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_snapshot_skipped() {
    SNAPSHOTS_SKIPPED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_stale_reads(count: usize) {
    STALE_READS.inc_by(count as u64);
}

#[cfg(feature = "metrics")]
pub fn set_session_state(state: u8) {
    SESSION_STATE.set(i64::from(state));
}

/// Update cache gauges
#[cfg(feature = "metrics")]
pub fn set_cached_records(total: usize, verified: usize) {
    CACHED_RECORDS.set(total as i64);
    VERIFIED_RECORDS.set(verified as i64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_operation(_kind: &str, _outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_failure(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_reveal(_path: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_initialization(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_snapshot_skipped() {}

#[cfg(not(feature = "metrics"))]
pub fn record_stale_reads(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn set_session_state(_state: u8) {}

#[cfg(not(feature = "metrics"))]
pub fn set_cached_records(_total: usize, _verified: usize) {}
