//! # CVL Telemetry
//!
//! Logging and metrics export shared by every binary in the workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cvl_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! // Logs are now emitted; metrics can be rendered with `encode_metrics()`.
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CVL_SERVICE_NAME` | `cvl` | Service name in logs |
//! | `CVL_LOG_LEVEL` | `info` | Log level filter |
//! | `CVL_JSON_LOGS` | `false` | JSON log output |
//! | `CVL_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};
pub use metrics::encode_metrics;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to export metrics: {0}")]
    MetricsExport(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let logging = init_logging(&config)?;
    Ok(TelemetryGuard { _logging: logging })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
