use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream relay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Upstream API key
    ///
    /// When unset (or expanded to an empty string), the relay falls back to
    /// the `GEMINI_API_KEY` environment variable at startup. A missing key is
    /// a per-request fault, never a startup failure.
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Override the upstream base URL (tests, forward proxies)
    #[serde(default)]
    pub base_url: Option<Url>,
}
