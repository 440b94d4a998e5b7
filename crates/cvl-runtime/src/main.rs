//! # CVL Runtime
//!
//! Runs the record lifecycle demonstration against in-memory collaborators.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from env)
//! 2. Initialize telemetry
//! 3. Build components and start event routing
//! 4. Run the demo and print the report

use anyhow::{Context, Result};
use cvl_runtime::{LifecycleRuntime, RuntimeConfig};
use cvl_telemetry::{init_telemetry, log_record_event};
use shared_bus::EventTopic;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("Invalid configuration")?;
    let _telemetry = init_telemetry(config.telemetry.clone())
        .context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Confidential Value Lifecycle v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let mut runtime = LifecycleRuntime::new(config);
    runtime.start();

    let report = runtime.run_demo().await?;

    log_record_event!(
        info,
        "runtime",
        "Record revealed",
        report.first_reveal.record_id,
        value = report.first_reveal.value,
        path = %report.first_reveal.path
    );
    log_record_event!(
        info,
        "runtime",
        "Record revealed again",
        report.second_reveal.record_id,
        path = %report.second_reveal.path
    );
    info!(
        total = report.stats.total,
        verified = report.stats.verified,
        average_required_level = report.stats.average_required_level,
        ledger_writes = report.ledger_writes,
        "[cvl] Registry statistics"
    );
    if let Some(analysis) = &report.analysis {
        info!(
            analysis = %serde_json::to_string(analysis)?,
            "[cvl] Skill match analysis"
        );
    }
    for entry in &report.history {
        info!(entry = %entry, "[cvl] History");
    }

    let events = runtime.shutdown().await;
    let event_bus = &runtime.container().event_bus;
    info!(
        events,
        status = event_bus.published_on(EventTopic::Status),
        session = event_bus.published_on(EventTopic::Session),
        records = event_bus.published_on(EventTopic::Records),
        "[cvl] Runtime stopped"
    );

    #[cfg(feature = "metrics")]
    println!("{}", cvl_telemetry::encode_metrics()?);

    Ok(())
}
