//! Stateless request transport.
//!
//! [`FetchClient`] executes fully-resolved [`RequestDescriptor`]s and normalizes
//! the outcome. It keeps nothing between calls except the pooled HTTP client,
//! and each call is cancellable through the signal in its descriptor.
//!
//! # Examples
//!
//! ## Simple GET request
//!
//! ```ignore
//! use alias_fetch::{FetchClient, Method, RequestDescriptor};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FetchClient::new();
//!     let users: Value = client
//!         .get(RequestDescriptor::new(Method::Get, "http://localhost:8080/users"))
//!         .await?;
//!     println!("users: {}", users);
//!     Ok(())
//! }
//! ```
//!
//! ## Response with metadata
//!
//! ```ignore
//! use alias_fetch::{FetchClient, Method, RequestDescriptor};
//! use serde_json::{json, Value};
//!
//! let descriptor = RequestDescriptor::new(Method::Post, "http://localhost:8080/users")
//!     .with_body(json!({ "name": "ada" }));
//! let response = client.execute::<Value>(descriptor).await?;
//! let location = response.metadata.headers.get("location");
//! println!("status {}, location {:?}", response.metadata.status, location);
//! ```
//!
//! ## Cancelling
//!
//! ```ignore
//! use alias_fetch::client::CancellationToken;
//!
//! let (token, signal) = CancellationToken::pair();
//! let pending = client.get::<Value>(descriptor.with_signal(signal));
//! token.abort();
//! assert!(pending.await.unwrap_err().is_aborted());
//! ```

use crate::client::config::ClientConfig;
use crate::client::utils::{response_metadata, settle_response};
use crate::error::{FetchError, Result};
use crate::protocol::{encode_body, endpoint_with_params, EncodedBody, JSON_CONTENT_TYPE};
use crate::types::{BodyType, FetchResponse, Method, RequestDescriptor};
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// The request transport.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl FetchClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        if !config.proxy_url.is_empty() {
            match reqwest::Proxy::all(&config.proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => {
                    tracing::warn!(proxy = %config.proxy_url, error = %e, "ignoring invalid proxy")
                }
            }
        }

        let client = builder.build().unwrap_or_default();

        FetchClient {
            client,
            config: Arc::new(config),
        }
    }

    /// `GET` and return the decoded body.
    pub async fn get<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.send(Method::Get, descriptor).await
    }

    /// `POST` and return the decoded body.
    pub async fn post<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.send(Method::Post, descriptor).await
    }

    /// `PUT` and return the decoded body.
    pub async fn put<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.send(Method::Put, descriptor).await
    }

    /// `PATCH` and return the decoded body.
    pub async fn patch<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.send(Method::Patch, descriptor).await
    }

    /// `DELETE` and return the decoded body.
    pub async fn del<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        self.send(Method::Delete, descriptor).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        mut descriptor: RequestDescriptor,
    ) -> Result<T> {
        descriptor.method = method;
        self.execute(descriptor).await.map(FetchResponse::into_data)
    }

    /// Execute a descriptor and return the decoded body with response metadata.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] / [`FetchError::Encode`] before anything is sent
    /// - [`FetchError::Network`] / [`FetchError::Timeout`] when no response arrived
    /// - [`FetchError::Http`] for non-2xx responses
    /// - [`FetchError::Decode`] for 2xx bodies that do not decode into `T`
    /// - [`FetchError::Aborted`] when the descriptor's token was aborted
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<FetchResponse<T>> {
        let RequestDescriptor {
            method,
            url,
            params,
            body,
            body_type,
            headers,
            timeout,
            signal,
        } = descriptor;

        let target = endpoint_with_params(&url, params.as_deref());
        let request =
            self.build_request(method, &target, body.as_ref(), body_type, headers, timeout)?;

        if self.config.enable_logging {
            tracing::debug!(method = %method, url = %target, "sending request");
        }

        let exchange = Self::exchange::<T>(request);
        let outcome = match signal {
            Some(signal) => signal.guard(exchange).await,
            None => exchange.await,
        };

        if self.config.enable_logging {
            match &outcome {
                Ok(response) => tracing::debug!(
                    method = %method,
                    url = %target,
                    status = response.metadata.status.as_u16(),
                    "request succeeded"
                ),
                Err(FetchError::Aborted) => {
                    tracing::debug!(method = %method, url = %target, "request aborted")
                }
                Err(e) => {
                    tracing::warn!(method = %method, url = %target, error = %e, "request failed")
                }
            }
        }

        outcome
    }

    fn build_request(
        &self,
        method: Method,
        target: &str,
        body: Option<&Value>,
        body_type: BodyType,
        mut headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> Result<reqwest::RequestBuilder> {
        let url = Url::parse(target)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", target, e)))?;
        let encoded = encode_body(body, body_type)?;

        match &encoded {
            EncodedBody::Json(_) if !headers.contains_key(CONTENT_TYPE) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            }
            // the multipart boundary header must be the only content type
            EncodedBody::Form(_) => {
                headers.remove(CONTENT_TYPE);
            }
            _ => {}
        }

        let mut request = self.client.request(method.into(), url).headers(headers);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        Ok(match encoded {
            EncodedBody::Empty => request,
            EncodedBody::Json(bytes) | EncodedBody::Raw(bytes) => request.body(bytes),
            EncodedBody::Form(form) => request.multipart(form),
        })
    }

    async fn exchange<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<FetchResponse<T>> {
        let response = request.send().await?;
        let metadata = response_metadata(&response);
        let text = response.text().await?;
        settle_response(metadata, &text)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("config", &self.config)
            .finish()
    }
}
