//! Per-call request options.

use crate::alias::DEFAULT_ALIAS;
use crate::error::{FetchError, Result};
use crate::types::{BodyType, Method};
use serde::Serialize;
use serde_json::Value;

/// Caller-supplied overrides for a controller's requests.
///
/// Everything is optional; unset values fall back to the alias profile and then
/// to library defaults.
///
/// # Examples
///
/// ```
/// use alias_fetch::{BodyType, FetchOptions};
/// use serde_json::json;
///
/// let options = FetchOptions::new()
///     .with_alias("billing")
///     .with_header("Idempotency-Key", "42")
///     .with_param("dry_run", "true")
///     .with_body_type(BodyType::Json)
///     .with_body(json!({ "amount": 100 }));
///
/// assert_eq!(options.alias_name(), "billing");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    /// Alias to resolve; `"default"` when unset
    pub alias: Option<String>,
    /// Trigger once on activation; verb-dependent when unset
    pub load_on_mount: Option<bool>,
    /// Body encoding override
    pub body_type: Option<BodyType>,
    /// Header overrides, applied over the alias defaults
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Option<Value>,
    /// Query parameters, in order
    pub params: Option<Vec<(String, String)>>,
}

impl FetchOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set whether to trigger on activation
    pub fn with_load_on_mount(mut self, load_on_mount: bool) -> Self {
        self.load_on_mount = Some(load_on_mount);
        self
    }

    /// Set body type
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Add a header override
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add several header overrides
    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Encode`] if the value cannot be represented as JSON.
    pub fn with_json<S: Serialize>(self, body: &S) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| FetchError::Encode(e.to_string()))?;
        Ok(self.with_body(value))
    }

    /// Add a query parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    pub fn with_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .get_or_insert_with(Vec::new)
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The alias these options resolve against.
    pub fn alias_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(DEFAULT_ALIAS)
    }

    /// Whether a controller for `method` triggers on activation.
    pub fn load_on_mount_for(&self, method: Method) -> bool {
        self.load_on_mount.unwrap_or_else(|| method.loads_on_mount())
    }
}
