//! HTTP transport.
//!
//! This module turns resolved request descriptors into normalized outcomes:
//!
//! - **Build** the URL (query string) and the body (JSON, multipart, or raw)
//! - **Execute** the request over a pooled `reqwest` client
//! - **Normalize** the response: decoded data on 2xx, structured detail otherwise
//! - **Cancel** any in-flight call through its own token
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── fetch   - FetchClient and the per-verb operations
//! ├── cancel  - Per-attempt cancellation tokens
//! ├── config  - Client configuration
//! └── utils   - Response normalization helpers
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FetchClient`] | Stateless transport over a shared connection pool |
//! | [`CancellationToken`] | Aborts one attempt |
//! | [`CancellationSignal`] | Travels in the descriptor and observes the token |
//! | [`ClientConfig`] | Timeouts, pooling, proxy, logging |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use alias_fetch::client::{ClientConfig, FetchClient};
//!
//! // Default configuration
//! let client = FetchClient::new();
//!
//! // Custom configuration
//! let config = ClientConfig {
//!     request_timeout_ms: 5_000,
//!     enable_logging: false,
//!     ..Default::default()
//! };
//! let client = FetchClient::with_config(config);
//! ```
//!
//! ## Normalizing a Response
//!
//! ```
//! use alias_fetch::client::status_text;
//! use http::StatusCode;
//!
//! assert_eq!(status_text(StatusCode::NOT_FOUND), "Not Found");
//! ```

mod cancel;
mod config;
mod fetch;
mod utils;

pub use cancel::{CancellationSignal, CancellationToken};
pub use config::ClientConfig;
pub use fetch::FetchClient;
pub use utils::*;
