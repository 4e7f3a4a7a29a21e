//! Core request and response types.
//!
//! These types describe a single HTTP attempt from the moment it is resolved
//! against an alias until its outcome is normalized:
//!
//! - [`Method`] and [`BodyType`] select the verb and body encoding
//! - [`RequestDescriptor`] is the fully-resolved input to the transport
//! - [`FetchResponse`] and [`ResponseMetadata`] carry a successful outcome
//! - [`Failure`] and [`Detail`] carry a normalized failure

use crate::client::CancellationSignal;
use crate::error::FetchError;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    #[serde(alias = "del")]
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether a controller for this verb loads on activation by default.
    ///
    /// Reads load eagerly, writes wait for an explicit trigger.
    #[inline]
    pub const fn loads_on_mount(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a request body is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// JSON text with an implied `application/json` content type
    #[default]
    Json,
    /// `multipart/form-data` built from the body object's keys
    #[serde(alias = "form-data", alias = "multipart")]
    FormData,
    /// Sent as-is; the caller has already serialized it
    Original,
}

/// Best available description of a failure.
///
/// Either the JSON payload the server sent back, or plain text (a status text
/// or an error message) when no JSON was available.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Detail {
    /// Parsed JSON detail
    Json(Value),
    /// Plain text detail
    Text(String),
}

impl Detail {
    /// Normalize an error message: JSON messages are parsed, others kept as text.
    pub fn from_message(message: &str) -> Self {
        match serde_json::from_str::<Value>(message) {
            Ok(value) => Detail::Json(value),
            Err(_) => Detail::Text(message.to_string()),
        }
    }

    /// The JSON detail, if this is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Detail::Json(value) => Some(value),
            Detail::Text(_) => None,
        }
    }

    /// The text detail, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Detail::Json(_) => None,
            Detail::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::Json(value) => write!(f, "{}", value),
            Detail::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Detail {
    fn from(text: &str) -> Self {
        Detail::Text(text.to_string())
    }
}

impl From<Value> for Detail {
    fn from(value: Value) -> Self {
        Detail::Json(value)
    }
}

/// Normalized failure of one attempt, as exposed in lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// Response status when the server answered
    pub status: Option<u16>,
    /// Parsed body, status text, or error message
    pub detail: Detail,
}

impl Failure {
    /// Create a failure from its parts.
    pub fn new(status: Option<u16>, detail: impl Into<Detail>) -> Self {
        Failure {
            status,
            detail: detail.into(),
        }
    }
}

impl From<FetchError> for Failure {
    fn from(err: FetchError) -> Self {
        Failure {
            status: err.status(),
            detail: err.detail(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{}: {}", status, self.detail),
            None => write!(f, "{}", self.detail),
        }
    }
}

/// Transport-level view of a received response.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// Status code
    pub status: StatusCode,
    /// Reason phrase (or the numeric code when there is none)
    pub status_text: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Final URL after redirects
    pub url: String,
}

/// Successful outcome of an attempt.
#[derive(Debug, Clone)]
pub struct FetchResponse<T> {
    /// Decoded response body
    pub data: T,
    /// Untouched response metadata (status, headers, final URL)
    pub metadata: ResponseMetadata,
}

impl<T> FetchResponse<T> {
    /// Drop the metadata and keep the data.
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Fully-resolved parameters for one HTTP attempt.
///
/// Built per attempt (usually by [`AliasProfile::descriptor`]) and consumed by
/// the transport.
///
/// [`AliasProfile::descriptor`]: crate::alias::AliasProfile::descriptor
#[derive(Debug)]
pub struct RequestDescriptor {
    /// HTTP verb
    pub method: Method,
    /// Absolute URL without the query string
    pub url: String,
    /// Query parameters, appended in order
    pub params: Option<Vec<(String, String)>>,
    /// Body before serialization
    pub body: Option<Value>,
    /// Body encoding
    pub body_type: BodyType,
    /// Request headers
    pub headers: HeaderMap,
    /// Per-request deadline
    pub timeout: Option<Duration>,
    /// Cancellation side of this attempt's token
    pub signal: Option<CancellationSignal>,
}

impl RequestDescriptor {
    /// Create a descriptor with no params, body, or headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        RequestDescriptor {
            method,
            url: url.into(),
            params: None,
            body: None,
            body_type: BodyType::default(),
            headers: HeaderMap::new(),
            timeout: None,
            signal: None,
        }
    }

    /// Set query parameters
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params = Some(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Set body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set body type
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    /// Replace headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation signal
    pub fn with_signal(mut self, signal: CancellationSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}
