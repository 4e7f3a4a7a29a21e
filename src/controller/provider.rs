//! Scoped access to aliases and the shared transport.

use super::lifecycle::Controller;
use super::options::FetchOptions;
use crate::alias::{AliasProfile, AliasRegistry};
use crate::client::FetchClient;
use crate::error::Result;
use crate::types::{FetchResponse, Method, RequestDescriptor};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// The alias registry and transport a subtree of call sites works against.
///
/// Built once by the host and cloned into every consumer; clones share the
/// registry and the connection pool. Controllers created here are already
/// active, so GET controllers start loading immediately.
///
/// # Examples
///
/// ```ignore
/// use alias_fetch::{AliasConfig, AliasRegistry, FetchOptions, FetchProvider};
/// use serde_json::{json, Value};
///
/// let provider = FetchProvider::new(
///     AliasRegistry::builder()
///         .alias("default", AliasConfig::new("https://api.example.com"))
///         .build()?,
/// );
///
/// let profile = provider.get::<Value>("/me", FetchOptions::new())?;
/// let save = provider.post::<Value>(
///     "/me",
///     FetchOptions::new().with_body(json!({ "theme": "dark" })),
/// )?;
/// save.trigger();
/// ```
#[derive(Debug, Clone)]
pub struct FetchProvider {
    registry: AliasRegistry,
    client: FetchClient,
}

impl FetchProvider {
    /// Provider over a registry with a default client.
    pub fn new(registry: AliasRegistry) -> Self {
        Self::with_client(registry, FetchClient::new())
    }

    /// Provider over a registry and a preconfigured client.
    pub fn with_client(registry: AliasRegistry, client: FetchClient) -> Self {
        FetchProvider { registry, client }
    }

    /// The alias registry.
    #[inline]
    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }

    /// The shared transport.
    #[inline]
    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    /// Look up an alias.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnknownAlias`](crate::FetchError::UnknownAlias) for
    /// unregistered names.
    pub fn resolve(&self, alias: &str) -> Result<Arc<AliasProfile>> {
        self.registry.resolve(alias)
    }

    /// Resolve `options` against their alias into a descriptor.
    ///
    /// # Errors
    ///
    /// Fails for an unknown alias or a malformed header override.
    pub fn descriptor(
        &self,
        method: Method,
        endpoint: &str,
        options: &FetchOptions,
    ) -> Result<RequestDescriptor> {
        self.resolve(options.alias_name())?
            .descriptor(method, endpoint, options)
    }

    /// One-shot request through an alias, without lifecycle tracking.
    ///
    /// # Errors
    ///
    /// Any [`FetchError`](crate::FetchError) from resolution or the transport.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: &FetchOptions,
    ) -> Result<FetchResponse<T>> {
        let descriptor = self.descriptor(method, endpoint, options)?;
        self.client.execute(descriptor).await
    }

    /// Create and activate a controller.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnknownAlias`](crate::FetchError::UnknownAlias)
    /// when the alias is not registered.
    pub fn controller<T>(
        &self,
        method: Method,
        endpoint: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Controller<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let controller = Controller::new(self.clone(), method, endpoint, options)?;
        controller.activate();
        Ok(controller)
    }

    /// Active `GET` controller; loads on activation unless told otherwise.
    pub fn get<T>(
        &self,
        endpoint: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Controller<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.controller(Method::Get, endpoint, options)
    }

    /// Active `POST` controller; waits for `trigger()` unless told otherwise.
    pub fn post<T>(
        &self,
        endpoint: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Controller<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.controller(Method::Post, endpoint, options)
    }

    /// Active `PUT` controller
    pub fn put<T>(
        &self,
        endpoint: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Controller<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.controller(Method::Put, endpoint, options)
    }

    /// Active `PATCH` controller
    pub fn patch<T>(
        &self,
        endpoint: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Controller<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.controller(Method::Patch, endpoint, options)
    }

    /// Active `DELETE` controller
    pub fn delete<T>(
        &self,
        endpoint: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Controller<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.controller(Method::Delete, endpoint, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasConfig;
    use crate::FetchError;
    use serde_json::Value;

    fn provider() -> FetchProvider {
        FetchProvider::new(
            AliasRegistry::builder()
                .alias(
                    "default",
                    AliasConfig::new("http://localhost:8080").with_header("X-App", "demo"),
                )
                .alias("admin", AliasConfig::new("http://localhost:9090"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_descriptor_uses_named_alias() {
        let descriptor = provider()
            .descriptor(Method::Get, "/stats", &FetchOptions::new().with_alias("admin"))
            .unwrap();
        assert_eq!(descriptor.url, "http://localhost:9090/stats");
        assert!(descriptor.headers.get("x-app").is_none());
    }

    #[test]
    fn test_descriptor_unknown_alias() {
        let err = provider()
            .descriptor(Method::Get, "/stats", &FetchOptions::new().with_alias("nope"))
            .unwrap_err();
        assert_eq!(err, FetchError::UnknownAlias("nope".into()));
    }

    #[tokio::test]
    async fn test_post_controller_stays_idle() {
        let controller = provider().post::<Value>("/things", FetchOptions::new()).unwrap();
        assert!(controller.state().is_idle());
        assert!(controller.cancellation_handle().is_none());
    }
}
