//! Domain module for the lifecycle core
//!
//! ## Core Modules
//! - record: Cached record with monotonic confidentiality state
//! - record_store: Ordered cache of the ledger registry
//! - session: Session context state machine
//! - revelation: Reveal results
//!
//! ## Supporting Modules
//! - activity_log: Bounded action history
//! - analysis: Skill match analysis
//! - outcome: Transient operation outcome

pub mod activity_log;
pub mod analysis;
pub mod outcome;
pub mod record;
pub mod record_store;
pub mod revelation;
pub mod session;

pub use activity_log::{ActivityEntry, ActivityLog};
pub use analysis::SkillAnalysis;
pub use outcome::OperationOutcome;
pub use record::{ConfidentialityState, Record, SnapshotMerge};
pub use record_store::{RecordStore, RegistryStats};
pub use revelation::{RevealPath, Revelation};
pub use session::{AttemptId, SessionContext, SessionEvent, SessionState, SessionTransition};
