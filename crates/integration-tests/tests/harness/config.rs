//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use prism_config::{Config, CorsConfig, HealthConfig, RelayConfig, ServerConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    cors: None,
                },
                relay: RelayConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Point the relay at a mock upstream with a test credential
    pub fn with_upstream(mut self, base_url: &str) -> Self {
        self.config.relay.base_url = Some(base_url.parse().expect("valid URL"));
        self.config.relay.api_key = Some(SecretString::from("test-key"));
        self
    }

    /// Point the relay at a mock upstream without any credential
    ///
    /// The relay falls back to `GEMINI_API_KEY`, unset in the test
    /// environment, so requests must fail before any dispatch.
    pub fn with_upstream_without_key(mut self, base_url: &str) -> Self {
        self.config.relay.base_url = Some(base_url.parse().expect("valid URL"));
        self.config.relay.api_key = None;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
