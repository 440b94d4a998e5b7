//! Cross-component scenarios.

pub mod event_flow;
pub mod failure_paths;
pub mod lifecycle_flows;
pub mod session_gating;
