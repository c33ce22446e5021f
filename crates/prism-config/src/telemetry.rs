use serde::Deserialize;

/// Telemetry configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Log output format
    #[serde(default)]
    pub format: LogFormat,
    /// Log filter directive (overrides the binary's default, e.g. `debug`)
    #[serde(default)]
    pub filter: Option<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Text,
    /// Newline-delimited JSON, one object per event
    Json,
}
