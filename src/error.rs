//! Error types for alias-based fetching.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`FetchError`]. The variants separate the failure classes a caller may want to
//! react to differently:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`FetchError::UnknownAlias`] | Programmer error: the alias was never registered |
//! | [`FetchError::Network`] | Transport failure before any response arrived |
//! | [`FetchError::Timeout`] | The request exceeded its deadline |
//! | [`FetchError::Http`] | A non-2xx response, with the server-provided detail |
//! | [`FetchError::Aborted`] | The attempt was cancelled through its token |
//! | [`FetchError::Encode`] / [`FetchError::Decode`] | Body serialization problems |
//!
//! # Detail normalization
//!
//! UI code usually wants a single "what went wrong" value. [`FetchError::detail`]
//! produces it: HTTP failures yield the structured detail parsed from the
//! response body (or the status text), every other failure yields its message,
//! JSON-parsed when the message happens to be JSON.

use crate::types::{Detail, Failure};
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors produced while resolving, building, or executing a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The requested alias is not present in the registry.
    #[error("unknown alias: {0}")]
    UnknownAlias(String),

    /// The request failed before any response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-success status.
    #[error("http error {status}: {detail}")]
    Http {
        /// Response status code
        status: u16,
        /// Parsed JSON body, or the status text when there was none
        detail: Detail,
    },

    /// The attempt was cancelled.
    #[error("request aborted")]
    Aborted,

    /// The request body could not be encoded.
    #[error("body encode error: {0}")]
    Encode(String),

    /// The response body could not be decoded.
    #[error("body decode error: {0}")]
    Decode(String),

    /// The request URL is not valid.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// A header name or value is not valid.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Alias or client configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// True when the error is a cancellation rather than a genuine failure.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }

    /// Status code for HTTP failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw message carried by the error, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            FetchError::UnknownAlias(name) => format!("unknown alias: {}", name),
            FetchError::Network(msg)
            | FetchError::Timeout(msg)
            | FetchError::Encode(msg)
            | FetchError::Decode(msg)
            | FetchError::InvalidUrl(msg)
            | FetchError::InvalidHeader(msg)
            | FetchError::Config(msg) => msg.clone(),
            FetchError::Http { detail, .. } => detail.to_string(),
            FetchError::Aborted => "request aborted".to_string(),
        }
    }

    /// The best available detail for display.
    ///
    /// HTTP failures already carry a structured detail. Everything else is
    /// normalized from its message: a JSON message becomes [`Detail::Json`],
    /// anything else stays [`Detail::Text`].
    pub fn detail(&self) -> Detail {
        match self {
            FetchError::Http { detail, .. } => detail.clone(),
            other => Detail::from_message(&other.message()),
        }
    }

    /// Convert into the normalized failure shape stored in lifecycle state.
    pub fn into_failure(self) -> Failure {
        Failure::from(self)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
