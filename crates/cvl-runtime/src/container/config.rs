//! # Runtime Configuration
//!
//! Aggregates lifecycle and telemetry configuration with the settings the
//! runtime itself needs: the demo identity and the simulated KMS key.

use cvl_lifecycle::types::parse_address;
use cvl_lifecycle::{ConfigError, LifecycleConfig};
use cvl_telemetry::TelemetryConfig;
use shared_types::{ContractAddress, Hash, Identity};
use std::env;
use thiserror::Error;

/// Default record contract address used by the demo.
pub const DEFAULT_CONTRACT: ContractAddress = ContractAddress([
    0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64, 0x2f,
    0x64, 0x18, 0x0a, 0xa3,
]);

/// Default identity used by the demo.
pub const DEFAULT_IDENTITY: Identity = Identity([
    0xf3, 0x9f, 0xd6, 0xe5, 0x1a, 0xad, 0x88, 0xf6, 0xf4, 0xce, 0x6a, 0xb8, 0x82, 0x72, 0x79, 0xcf,
    0xff, 0xb9, 0x22, 0x66,
]);

/// Runtime configuration errors.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error(transparent)]
    Lifecycle(#[from] ConfigError),

    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub lifecycle: LifecycleConfig,
    pub telemetry: TelemetryConfig,
    /// Identity the demo connects with.
    pub identity: Identity,
    /// Simulated KMS key; random when unset.
    pub kms_key: Option<Hash>,
    /// Event bus channel capacity.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            lifecycle: LifecycleConfig::for_contract(DEFAULT_CONTRACT),
            telemetry: TelemetryConfig::for_component("runtime"),
            identity: DEFAULT_IDENTITY,
            kms_key: None,
            event_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the environment.
    ///
    /// Lifecycle variables are documented on `LifecycleConfig::from_env`.
    /// Runtime variables:
    ///
    /// - `CVL_IDENTITY`: 20-byte hex identity for the demo
    /// - `CVL_KMS_KEY`: 32-byte hex key for the simulated KMS
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        let mut lifecycle = LifecycleConfig::from_env()?;
        if env::var("CVL_CONTRACT_ADDRESS").is_err() {
            lifecycle.contract = DEFAULT_CONTRACT;
        }

        let identity = match env::var("CVL_IDENTITY") {
            Ok(raw) => Identity(parse_address("CVL_IDENTITY", &raw)?.0),
            Err(_) => DEFAULT_IDENTITY,
        };

        let kms_key = match env::var("CVL_KMS_KEY") {
            Ok(raw) => Some(parse_key(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            lifecycle,
            telemetry: TelemetryConfig::for_component("runtime"),
            identity,
            kms_key,
            event_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        })
    }
}

fn parse_key(raw: &str) -> Result<Hash, RuntimeConfigError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| RuntimeConfigError::InvalidVar {
        var: "CVL_KMS_KEY",
        reason: e.to_string(),
    })?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| RuntimeConfigError::InvalidVar {
            var: "CVL_KMS_KEY",
            reason: format!("expected 32 bytes, got {}", bytes.len()),
        })
}
