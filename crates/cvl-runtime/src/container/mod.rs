//! # Runtime Container
//!
//! Configuration and the component container with dependency injection.

pub mod components;
pub mod config;

pub use components::{LifecycleContainer, RuntimeCoordinator, RuntimeSession};
pub use config::{RuntimeConfig, RuntimeConfigError};
