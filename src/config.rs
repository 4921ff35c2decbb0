//! Client configuration
//!
//! Connection settings for a Druid query endpoint. Deserializable so an
//! embedding application can load it from its own configuration file.

use serde::Deserialize;

/// Configuration for a Druid client
#[derive(Debug, Clone, Deserialize)]
pub struct DruidConfig {
    /// Base URL of the Druid broker (e.g. "http://localhost:8082")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Query endpoint path relative to the base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connection-level request timeout in milliseconds. Engine-side query
    /// timeouts are a `context` option, forwarded opaquely in the request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_endpoint() -> String {
    "druid/v2".to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for DruidConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl DruidConfig {
    /// Create a configuration for the given broker URL and endpoint path
    pub fn new(base_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            request_timeout_ms: default_request_timeout(),
        }
    }

    /// The full URL queries are posted to
    pub fn query_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}
