//! Lifecycle configuration
//!
//! Defaults match the deployed record contract: confidential values in
//! `1..=10`, ten history entries.

use shared_types::{Address, ContractAddress};
use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;
use thiserror::Error;

/// Lowest accepted confidential value.
pub const DEFAULT_VALUE_MIN: u32 = 1;
/// Highest accepted confidential value.
pub const DEFAULT_VALUE_MAX: u32 = 10;
/// Activity history entries kept before the oldest is evicted.
pub const DEFAULT_ACTIVITY_LOG_CAPACITY: usize = 10;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },

    #[error("Empty value domain: min {min} > max {max}")]
    EmptyValueDomain { min: u32, max: u32 },

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

/// Lifecycle coordinator configuration
#[derive(Clone, Debug)]
pub struct LifecycleConfig {
    /// Record contract; scopes both encryption and decryption proofs
    pub contract: ContractAddress,
    /// Smallest confidential value accepted by `create`
    pub value_min: u32,
    /// Largest confidential value accepted by `create`
    pub value_max: u32,
    /// Deadline for a submitted write to reach finality
    pub finality_timeout: Duration,
    /// Reads attempted after a confirmed write before giving up on a stale view
    pub read_after_write_attempts: u32,
    /// Delay between those reads
    pub read_retry_delay: Duration,
    /// Activity history capacity
    pub activity_log_capacity: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            contract: ContractAddress::default(),
            value_min: DEFAULT_VALUE_MIN,
            value_max: DEFAULT_VALUE_MAX,
            finality_timeout: Duration::from_secs(120),
            read_after_write_attempts: 3,
            read_retry_delay: Duration::from_millis(500),
            activity_log_capacity: DEFAULT_ACTIVITY_LOG_CAPACITY,
        }
    }
}

impl LifecycleConfig {
    /// Config bound to a specific record contract, other fields default.
    pub fn for_contract(contract: ContractAddress) -> Self {
        Self {
            contract,
            ..Self::default()
        }
    }

    /// Accepted confidential values.
    pub fn value_domain(&self) -> RangeInclusive<u32> {
        self.value_min..=self.value_max
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CVL_CONTRACT_ADDRESS`: 20-byte hex address, `0x` prefix optional
    /// - `CVL_VALUE_MIN` / `CVL_VALUE_MAX`: value domain (default 1..=10)
    /// - `CVL_FINALITY_TIMEOUT_SECS`: finality deadline (default 120)
    /// - `CVL_READ_ATTEMPTS`: read-after-write attempts (default 3)
    /// - `CVL_READ_RETRY_DELAY_MS`: delay between reads (default 500)
    /// - `CVL_ACTIVITY_LOG_CAPACITY`: history entries (default 10)
    ///
    /// Unset variables keep their defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("CVL_CONTRACT_ADDRESS") {
            config.contract = parse_address("CVL_CONTRACT_ADDRESS", &raw)?;
        }
        if let Some(v) = parse_var::<u32>("CVL_VALUE_MIN")? {
            config.value_min = v;
        }
        if let Some(v) = parse_var::<u32>("CVL_VALUE_MAX")? {
            config.value_max = v;
        }
        if let Some(v) = parse_var::<u64>("CVL_FINALITY_TIMEOUT_SECS")? {
            config.finality_timeout = Duration::from_secs(v);
        }
        if let Some(v) = parse_var::<u32>("CVL_READ_ATTEMPTS")? {
            config.read_after_write_attempts = v;
        }
        if let Some(v) = parse_var::<u64>("CVL_READ_RETRY_DELAY_MS")? {
            config.read_retry_delay = Duration::from_millis(v);
        }
        if let Some(v) = parse_var::<usize>("CVL_ACTIVITY_LOG_CAPACITY")? {
            config.activity_log_capacity = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.value_min > self.value_max {
            return Err(ConfigError::EmptyValueDomain {
                min: self.value_min,
                max: self.value_max,
            });
        }
        if self.finality_timeout.is_zero() {
            return Err(ConfigError::ZeroLimit {
                field: "finality_timeout",
            });
        }
        if self.read_after_write_attempts == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "read_after_write_attempts",
            });
        }
        if self.activity_log_capacity == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "activity_log_capacity",
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidVar {
                var,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// Parse a 20-byte hex address.
pub fn parse_address(var: &'static str, raw: &str) -> Result<ContractAddress, ConfigError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| ConfigError::InvalidVar {
        var,
        reason: e.to_string(),
    })?;
    let address: Address = bytes
        .as_slice()
        .try_into()
        .map_err(|_| ConfigError::InvalidVar {
            var,
            reason: format!("expected 20 bytes, got {}", bytes.len()),
        })?;
    Ok(ContractAddress(address))
}
