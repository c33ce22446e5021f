//! Telemetry for Prism
//!
//! Structured logging via the `tracing` ecosystem, with a text or JSON
//! output format selected from configuration.

use prism_config::TelemetryConfig;
use prism_config::telemetry::LogFormat;

/// Initialize telemetry from configuration
///
/// Sets up `tracing-subscriber` with an env-filter seeded from the config
/// filter (falling back to `log_filter`, then `RUST_LOG`).
///
/// # Errors
///
/// Returns an error if the subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let directive = config
        .and_then(|telemetry| telemetry.filter.as_deref())
        .unwrap_or(log_filter);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = config.map_or(LogFormat::Text, |telemetry| telemetry.format);

    match format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
        }
    }

    Ok(())
}
