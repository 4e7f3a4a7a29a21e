//! Named backend connection profiles.
//!
//! An *alias* names a backend: its base URL, the headers every request to it
//! carries, and the body encoding it expects. The host application builds one
//! [`AliasRegistry`] at start-up and hands clones of it to every consumer
//! (usually through a [`FetchProvider`]). The registry is immutable once built;
//! clones share the same profiles.
//!
//! # Configuration format
//!
//! Registries can be loaded from JSON documents keyed by alias name:
//!
//! ```json
//! {
//!   "default": {
//!     "baseUrl": "https://api.example.com",
//!     "headers": { "Accept": "application/json" }
//!   },
//!   "uploads": {
//!     "baseUrl": "https://files.example.com",
//!     "bodyType": "formdata",
//!     "timeoutMs": 60000
//!   }
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use alias_fetch::alias::{AliasConfig, AliasRegistry};
//! use alias_fetch::BodyType;
//!
//! let registry = AliasRegistry::builder()
//!     .alias("default", AliasConfig::new("https://api.example.com"))
//!     .alias(
//!         "uploads",
//!         AliasConfig::new("https://files.example.com").with_body_type(BodyType::FormData),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let uploads = registry.resolve("uploads").unwrap();
//! assert_eq!(uploads.body_type, BodyType::FormData);
//! assert!(registry.resolve("billing").is_err());
//! ```
//!
//! [`FetchProvider`]: crate::controller::FetchProvider

use crate::controller::FetchOptions;
use crate::error::{FetchError, Result};
use crate::protocol::{header_map, join_url, merge_headers};
use crate::types::{BodyType, Method, RequestDescriptor};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Alias used when a caller does not name one.
pub const DEFAULT_ALIAS: &str = "default";

/// Host-facing configuration of one alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasConfig {
    /// Base URL that endpoints are appended to
    pub base_url: String,

    /// Headers sent with every request through this alias
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Default body encoding (JSON when unset)
    #[serde(default)]
    pub body_type: Option<BodyType>,

    /// Per-request deadline in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl AliasConfig {
    /// Create a configuration for a base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        AliasConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Add a default header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set default body type
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Set per-request timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// A validated, immutable connection profile.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasProfile {
    /// Alias name
    pub name: String,
    /// Base URL that endpoints are appended to
    pub base_url: String,
    /// Default headers
    pub headers: HeaderMap,
    /// Default body encoding
    pub body_type: BodyType,
    /// Per-request deadline
    pub timeout: Option<Duration>,
}

impl AliasProfile {
    /// Validate a configuration into a profile.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] for an unparseable base URL and
    /// [`FetchError::InvalidHeader`] for a malformed default header.
    pub fn from_config(name: impl Into<String>, config: AliasConfig) -> Result<Self> {
        let name = name.into();
        url::Url::parse(&config.base_url).map_err(|e| {
            FetchError::Config(format!(
                "alias {}: invalid base url {:?}: {}",
                name, config.base_url, e
            ))
        })?;

        Ok(AliasProfile {
            headers: header_map(&config.headers)?,
            body_type: config.body_type.unwrap_or_default(),
            timeout: config.timeout_ms.map(Duration::from_millis),
            base_url: config.base_url,
            name,
        })
    }

    /// Build the descriptor for one attempt against this profile.
    ///
    /// Per-call values win over profile defaults: headers are merged name by
    /// name, the body type falls back to the profile's, which falls back to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidHeader`] for a malformed override header.
    pub fn descriptor(
        &self,
        method: Method,
        endpoint: &str,
        options: &FetchOptions,
    ) -> Result<RequestDescriptor> {
        let overrides = header_map(options.headers.iter().map(|(k, v)| (k, v)))?;

        Ok(RequestDescriptor {
            method,
            url: join_url(&self.base_url, endpoint),
            params: options.params.clone(),
            body: options.body.clone(),
            body_type: options.body_type.unwrap_or(self.body_type),
            headers: merge_headers(&self.headers, &overrides),
            timeout: self.timeout,
            signal: None,
        })
    }
}

/// Immutable mapping from alias name to profile.
///
/// Cloning is cheap and every clone sees the same profiles. There is no way to
/// add or change an alias after [`AliasRegistryBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    aliases: Arc<HashMap<String, Arc<AliasProfile>>>,
}

impl AliasRegistry {
    /// Start building a registry.
    pub fn builder() -> AliasRegistryBuilder {
        AliasRegistryBuilder::default()
    }

    /// Build a registry from a map of configurations.
    ///
    /// # Errors
    ///
    /// Fails on the first alias whose configuration does not validate.
    pub fn from_config(config: BTreeMap<String, AliasConfig>) -> Result<Self> {
        let aliases = config
            .into_iter()
            .map(|(name, config)| {
                let profile = AliasProfile::from_config(name.clone(), config)?;
                Ok((name, Arc::new(profile)))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        tracing::debug!(aliases = aliases.len(), "alias registry built");

        Ok(AliasRegistry {
            aliases: Arc::new(aliases),
        })
    }

    /// Build a registry from a JSON document keyed by alias name.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] for malformed JSON, or any validation error.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BTreeMap<String, AliasConfig> =
            serde_json::from_str(json).map_err(|e| FetchError::Config(e.to_string()))?;
        Self::from_config(config)
    }

    /// Look up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnknownAlias`] when the name was never registered.
    pub fn resolve(&self, name: &str) -> Result<Arc<AliasProfile>> {
        self.aliases
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::UnknownAlias(name.to_string()))
    }

    /// Whether an alias is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Registered alias names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.aliases.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether no alias is registered.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Builder for [`AliasRegistry`].
#[derive(Debug, Clone, Default)]
pub struct AliasRegistryBuilder {
    configs: BTreeMap<String, AliasConfig>,
}

impl AliasRegistryBuilder {
    /// Register an alias. Registering a name twice keeps the last configuration.
    pub fn alias(mut self, name: impl Into<String>, config: AliasConfig) -> Self {
        self.configs.insert(name.into(), config);
        self
    }

    /// Validate every alias and publish the registry.
    ///
    /// # Errors
    ///
    /// Fails on the first alias whose configuration does not validate.
    pub fn build(self) -> Result<AliasRegistry> {
        AliasRegistry::from_config(self.configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> AliasRegistry {
        AliasRegistry::builder()
            .alias(
                DEFAULT_ALIAS,
                AliasConfig::new("https://api.example.com")
                    .with_header("Authorization", "Bearer alias")
                    .with_header("Accept", "application/json"),
            )
            .alias(
                "uploads",
                AliasConfig::new("https://files.example.com")
                    .with_body_type(BodyType::FormData)
                    .with_timeout_ms(1500),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_registered() {
        let registry = registry();
        let profile = registry.resolve("uploads").unwrap();
        assert_eq!(profile.name, "uploads");
        assert_eq!(profile.base_url, "https://files.example.com");
        assert_eq!(profile.body_type, BodyType::FormData);
        assert_eq!(profile.timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_resolve_unknown_fails() {
        let err = registry().resolve("billing").unwrap_err();
        assert_eq!(err, FetchError::UnknownAlias("billing".into()));
    }

    #[test]
    fn test_clones_share_profiles() {
        let registry = registry();
        let clone = registry.clone();
        assert!(Arc::ptr_eq(
            &registry.resolve(DEFAULT_ALIAS).unwrap(),
            &clone.resolve(DEFAULT_ALIAS).unwrap()
        ));
        assert_eq!(clone.names(), vec!["default".to_string(), "uploads".to_string()]);
        assert_eq!(clone.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let registry = AliasRegistry::from_json(
            r#"{
                "default": { "baseUrl": "http://localhost:8080", "headers": { "X-Team": "core" } },
                "raw": { "baseUrl": "http://localhost:9090", "bodyType": "original" }
            }"#,
        )
        .unwrap();
        let default = registry.resolve("default").unwrap();
        assert_eq!(default.headers["x-team"], "core");
        assert_eq!(default.body_type, BodyType::Json);
        assert_eq!(registry.resolve("raw").unwrap().body_type, BodyType::Original);
    }

    #[test]
    fn test_from_json_rejects_bad_document() {
        assert!(matches!(
            AliasRegistry::from_json("{ not json"),
            Err(FetchError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_base_url_fails_fast() {
        let result = AliasRegistry::builder()
            .alias("broken", AliasConfig::new("not a url"))
            .build();
        assert!(matches!(result, Err(FetchError::Config(_))));
    }

    #[test]
    fn test_descriptor_merges_overrides() {
        let registry = registry();
        let profile = registry.resolve(DEFAULT_ALIAS).unwrap();
        let options = FetchOptions::new()
            .with_header("authorization", "Bearer call")
            .with_param("page", "2")
            .with_body(json!({"a": 1}));

        let descriptor = profile.descriptor(Method::Post, "/users", &options).unwrap();
        assert_eq!(descriptor.url, "https://api.example.com/users");
        assert_eq!(descriptor.method, Method::Post);
        assert_eq!(descriptor.headers["authorization"], "Bearer call");
        assert_eq!(descriptor.headers["accept"], "application/json");
        assert_eq!(descriptor.body_type, BodyType::Json);
        assert_eq!(descriptor.params, Some(vec![("page".into(), "2".into())]));
        assert_eq!(descriptor.body, Some(json!({"a": 1})));
    }

    #[test]
    fn test_descriptor_body_type_precedence() {
        let registry = registry();
        let uploads = registry.resolve("uploads").unwrap();

        let inherited = uploads.descriptor(Method::Post, "/f", &FetchOptions::new()).unwrap();
        assert_eq!(inherited.body_type, BodyType::FormData);
        assert_eq!(inherited.timeout, Some(Duration::from_millis(1500)));

        let overridden = uploads
            .descriptor(
                Method::Post,
                "/f",
                &FetchOptions::new().with_body_type(BodyType::Original),
            )
            .unwrap();
        assert_eq!(overridden.body_type, BodyType::Original);
    }
}
