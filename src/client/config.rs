//! Client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the shared HTTP client.
///
/// Loadable from any serde format; missing fields take their defaults.
///
/// ```
/// use alias_fetch::client::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{ "request_timeout_ms": 5000 }"#).unwrap();
/// assert_eq!(config.request_timeout_ms, 5000);
/// assert!(config.enable_logging);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overall request deadline in milliseconds
    pub request_timeout_ms: u64,
    /// Connection establishment deadline in milliseconds
    pub connect_timeout_ms: u64,
    /// How long idle pooled connections are kept, in seconds
    pub pool_idle_timeout_secs: u64,
    /// Maximum idle connections kept per host
    pub max_idle_per_host: usize,
    /// Proxy for all traffic; empty means none
    pub proxy_url: String,
    /// `User-Agent` header value
    pub user_agent: Option<String>,
    /// Log request outcomes through `tracing`
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            pool_idle_timeout_secs: 90,
            max_idle_per_host: 32,
            proxy_url: String::new(),
            user_agent: None,
            enable_logging: true,
        }
    }
}
