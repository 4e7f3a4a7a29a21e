#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Alias Fetch: declarative requests with a tracked lifecycle
//!
//! This crate lets call sites issue HTTP requests against named backend
//! configurations ("aliases") and observe each request's lifecycle
//! (idle → loading → success/error) without wiring cancellation, body
//! serialization, or error normalization by hand.
//!
//! ## Overview
//!
//! Three layers, leaves first:
//!
//! 1. **Alias registry** - immutable map from alias name to base URL, default
//!    headers, and default body encoding
//! 2. **Transport** - stateless execution of a resolved request descriptor with
//!    normalized success and failure shapes
//! 3. **Controller** - per-call-site state machine with `trigger()`, `cancel()`,
//!    `reset()`, and deterministic teardown
//!
//! ## Key Features
//!
//! - **Fail-fast aliases**: an unknown alias is an error, never a silent default
//! - **Override precedence**: per-call values > alias defaults > library defaults
//! - **Body encodings**: JSON, multipart form data, or caller-serialized
//! - **Structured errors**: the server's JSON error body when present, the
//!   status text otherwise
//! - **Supersession**: a new trigger aborts the previous attempt; stale results
//!   never reach the state
//! - **Teardown safety**: no state change after deactivation, even if the
//!   request later completes
//!
//! ## Usage
//!
//! ```ignore
//! use alias_fetch::{AliasRegistry, FetchOptions, FetchProvider};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = AliasRegistry::from_json(r#"{
//!         "default": {
//!             "baseUrl": "https://api.example.com",
//!             "headers": { "Accept": "application/json" }
//!         }
//!     }"#)?;
//!     let provider = FetchProvider::new(registry);
//!
//!     let users = provider.get::<Value>("/users", FetchOptions::new().with_param("page", "1"))?;
//!     let mut states = users.subscribe();
//!     let state = states.wait_for(|state| !state.loading()).await?.clone();
//!
//!     match (state.response(), state.error()) {
//!         (Some(users), _) => println!("users: {}", users),
//!         (_, Some(failure)) => eprintln!("failed: {}", failure),
//!         _ => {}
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Methods, body types, descriptors, responses, failures
//! - **[error]** - Error type and result alias
//! - **[alias]** - Alias configuration and the registry
//! - **[client]** - The transport and cancellation tokens
//! - **[controller]** - Lifecycle controllers and the provider
//! - **[protocol]** - Query, body, and header building blocks

pub mod alias;
pub mod client;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod types;

pub use alias::{AliasConfig, AliasProfile, AliasRegistry, DEFAULT_ALIAS};
pub use client::{CancellationToken, ClientConfig, FetchClient};
pub use controller::{Controller, FetchOptions, FetchProvider, LifecycleState};
pub use error::{FetchError, Result};
pub use types::{
    BodyType, Detail, Failure, FetchResponse, Method, RequestDescriptor, ResponseMetadata,
};
