//! Prometheus text export.
//!
//! Component crates register their metrics on the default prometheus
//! registry (see `cvl_lifecycle::metrics`); this module renders whatever has
//! been registered.

use crate::TelemetryError;
use prometheus::{Encoder, TextEncoder};

/// Encode all registered metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsExport(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsExport(e.to_string()))
}
