//! Per-call-site request lifecycle.
//!
//! A [`Controller`] owns one logical request (an endpoint, a verb, an alias, and
//! per-call overrides) and drives it through [`LifecycleState`]:
//!
//! ```text
//!            trigger()                 success
//!   Idle ─────────────────▶ Loading ─────────────▶ Succeeded
//!    ▲                        │  ▲                    │
//!    │ reset()                │  └──── trigger() ─────┤
//!    │                        │ failure               │
//!    └────────────────────────┴──────▶ Failed ◀───────┘
//! ```
//!
//! # Attempts and tokens
//!
//! Each `trigger()` starts a new *attempt* with a fresh generation number and a
//! fresh [`CancellationToken`]; the previous token is aborted. A completion only
//! writes state if its generation is still current, its token was not aborted,
//! and the controller has not been torn down. Superseded results are dropped.
//!
//! # Activation and teardown
//!
//! [`Controller::activate`] is the "first render" hook: the first call triggers
//! once when auto-load is enabled. [`Controller::deactivate`] is the teardown
//! hook: it aborts the current token and freezes the state. Dropping the
//! controller deactivates it.
//!
//! # Examples
//!
//! ```ignore
//! use alias_fetch::{AliasConfig, AliasRegistry, FetchOptions, FetchProvider};
//! use serde_json::Value;
//!
//! let registry = AliasRegistry::builder()
//!     .alias("default", AliasConfig::new("http://localhost:8080"))
//!     .build()?;
//! let provider = FetchProvider::new(registry);
//!
//! // GET controllers load on activation.
//! let users = provider.get::<Value>("/users", FetchOptions::new())?;
//! let mut states = users.subscribe();
//! states.wait_for(|state| !state.loading()).await?;
//! println!("{:?}", users.state().response());
//! ```

use super::provider::FetchProvider;
use super::state::LifecycleState;
use crate::client::{CancellationSignal, CancellationToken};
use crate::controller::FetchOptions;
use crate::error::{FetchError, Result};
use crate::types::{FetchResponse, Method, RequestDescriptor};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Stateful lifecycle manager for one call site.
///
/// Not `Clone`: a controller is owned by its call site, and dropping it is the
/// teardown signal. Share observation through [`subscribe`](Self::subscribe).
pub struct Controller<T> {
    shared: Arc<Shared<T>>,
}

/// Everything the in-flight completion needs to reach.
struct Shared<T> {
    provider: FetchProvider,
    method: Method,
    endpoint: String,
    alias: String,
    options: FetchOptions,
    load_on_mount: bool,
    state: watch::Sender<LifecycleState<T>>,
    attempt: Mutex<Attempt>,
}

/// Bookkeeping for the current attempt. Every state write happens under this lock.
#[derive(Debug, Default)]
struct Attempt {
    generation: u64,
    token: Option<CancellationToken>,
    activated: bool,
    torn_down: bool,
}

impl<T> Controller<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create an inactive controller.
    ///
    /// The alias is checked immediately so that a misspelled alias fails here
    /// rather than on the first request. Only the alias name and `options` are
    /// kept; the profile is resolved again on every trigger.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::UnknownAlias`] when the alias is not registered.
    pub fn new(
        provider: FetchProvider,
        method: Method,
        endpoint: impl Into<String>,
        options: FetchOptions,
    ) -> Result<Self> {
        let alias = options.alias_name().to_string();
        provider.registry().resolve(&alias)?;

        let load_on_mount = options.load_on_mount_for(method);
        // Loading is only ever published by trigger()
        let (state, _) = watch::channel(LifecycleState::Idle);

        Ok(Controller {
            shared: Arc::new(Shared {
                provider,
                method,
                endpoint: endpoint.into(),
                alias,
                options,
                load_on_mount,
                state,
                attempt: Mutex::new(Attempt::default()),
            }),
        })
    }

    /// Start a new attempt, superseding any attempt in flight.
    ///
    /// Must be called from within a tokio runtime. Ignored after teardown.
    pub fn trigger(&self) {
        self.shared.trigger();
    }

    /// Activation hook: on the first call, trigger once if auto-load is enabled.
    pub fn activate(&self) {
        let should_trigger = {
            let mut attempt = self.shared.attempt.lock();
            if attempt.activated || attempt.torn_down {
                false
            } else {
                attempt.activated = true;
                self.shared.load_on_mount
            }
        };

        if should_trigger {
            self.shared.trigger();
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LifecycleState<T> {
        self.shared.state.borrow().clone()
    }

    /// Stream of state changes, starting with the current state.
    pub fn states(&self) -> WatchStream<LifecycleState<T>> {
        WatchStream::new(self.subscribe())
    }
}

impl<T> Controller<T> {
    /// Abort the current attempt without touching the visible state.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Return to idle. The network call, if any, keeps running but its result
    /// is discarded.
    pub fn reset(&self) {
        self.shared.reset(false);
    }

    /// Abort the current attempt and return to idle.
    pub fn cancel_and_reset(&self) {
        self.shared.reset(true);
    }

    /// Teardown hook: abort the current attempt and stop all state updates.
    ///
    /// Idempotent and safe to call when nothing was ever sent.
    pub fn deactivate(&self) {
        self.shared.deactivate();
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState<T>> {
        self.shared.state.subscribe()
    }

    /// Token of the current attempt, if one was started.
    pub fn cancellation_handle(&self) -> Option<CancellationToken> {
        self.shared.attempt.lock().token.clone()
    }

    /// Whether [`deactivate`](Self::deactivate) has run.
    pub fn is_torn_down(&self) -> bool {
        self.shared.attempt.lock().torn_down
    }

    /// Endpoint path appended to the alias base URL.
    pub fn endpoint(&self) -> &str {
        &self.shared.endpoint
    }

    /// HTTP verb.
    pub fn method(&self) -> Method {
        self.shared.method
    }

    /// Alias name.
    pub fn alias(&self) -> &str {
        &self.shared.alias
    }
}

impl<T> Drop for Controller<T> {
    fn drop(&mut self) {
        self.shared.deactivate();
    }
}

impl<T> std::fmt::Debug for Controller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("method", &self.shared.method)
            .field("endpoint", &self.shared.endpoint)
            .field("alias", &self.shared.alias)
            .field("attempt", &*self.shared.attempt.lock())
            .finish()
    }
}

impl<T> Shared<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn trigger(self: &Arc<Self>) {
        let (token, signal) = CancellationToken::pair();

        let generation = {
            let mut attempt = self.attempt.lock();
            if attempt.torn_down {
                tracing::warn!(endpoint = %self.endpoint, "trigger after teardown ignored");
                return;
            }
            attempt.generation += 1;
            if let Some(previous) = attempt.token.replace(token) {
                previous.abort();
            }
            self.state.send_replace(LifecycleState::Loading);
            attempt.generation
        };

        tracing::debug!(
            method = %self.method,
            endpoint = %self.endpoint,
            alias = %self.alias,
            generation,
            "request triggered"
        );

        let descriptor = match self.descriptor(signal) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                self.settle(generation, Err(e));
                return;
            }
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                self.settle(generation, Err(FetchError::Config(e.to_string())));
                return;
            }
        };

        let shared = Arc::clone(self);
        runtime.spawn(async move {
            let outcome = shared
                .provider
                .client()
                .execute::<T>(descriptor)
                .await
                .map(FetchResponse::into_data);
            shared.settle(generation, outcome);
        });
    }

    /// Re-resolve the alias and re-merge the overrides for a fresh attempt.
    fn descriptor(&self, signal: CancellationSignal) -> Result<RequestDescriptor> {
        let profile = self.provider.registry().resolve(&self.alias)?;
        let descriptor = profile.descriptor(self.method, &self.endpoint, &self.options)?;
        Ok(descriptor.with_signal(signal))
    }

    fn settle(&self, generation: u64, outcome: Result<T>) {
        let attempt = self.attempt.lock();

        if attempt.torn_down || attempt.generation != generation {
            tracing::trace!(
                generation,
                current = attempt.generation,
                "discarding superseded result"
            );
            return;
        }
        if attempt.token.as_ref().is_some_and(CancellationToken::is_aborted) {
            tracing::trace!(generation, "discarding cancelled result");
            return;
        }

        match outcome {
            Ok(data) => {
                tracing::debug!(endpoint = %self.endpoint, generation, "request settled");
                self.state.send_replace(LifecycleState::Succeeded(data));
            }
            Err(e) if e.is_aborted() => {
                tracing::trace!(generation, "request aborted");
            }
            Err(e) => {
                tracing::debug!(
                    endpoint = %self.endpoint,
                    generation,
                    error = %e,
                    "request failed"
                );
                self.state.send_replace(LifecycleState::Failed(e.into_failure()));
            }
        }
    }
}

impl<T> Shared<T> {
    fn cancel(&self) {
        if let Some(token) = self.attempt.lock().token.as_ref() {
            token.abort();
        }
    }

    fn reset(&self, abort: bool) {
        let mut attempt = self.attempt.lock();
        if attempt.torn_down {
            return;
        }
        if abort {
            if let Some(token) = attempt.token.as_ref() {
                token.abort();
            }
        }
        // invalidates the result of whatever is in flight
        attempt.generation += 1;
        self.state.send_replace(LifecycleState::Idle);
    }

    fn deactivate(&self) {
        let mut attempt = self.attempt.lock();
        if attempt.torn_down {
            return;
        }
        attempt.torn_down = true;
        if let Some(token) = attempt.token.take() {
            token.abort();
        }
        tracing::debug!(endpoint = %self.endpoint, "controller torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{AliasConfig, AliasRegistry};
    use serde_json::Value;

    fn provider(base_url: &str) -> FetchProvider {
        let registry = AliasRegistry::builder()
            .alias("default", AliasConfig::new(base_url))
            .build()
            .unwrap();
        FetchProvider::new(registry)
    }

    fn idle_controller(method: Method) -> Controller<Value> {
        Controller::new(provider("http://localhost"), method, "/x", FetchOptions::new()).unwrap()
    }

    #[test]
    fn test_unknown_alias_fails_fast() {
        let err = Controller::<Value>::new(
            provider("http://localhost"),
            Method::Get,
            "/x",
            FetchOptions::new().with_alias("missing"),
        )
        .unwrap_err();
        assert_eq!(err, FetchError::UnknownAlias("missing".into()));
    }

    #[test]
    fn test_initial_state_is_idle_until_activation() {
        let provider = provider("http://localhost");
        let get = Controller::<Value>::new(provider.clone(), Method::Get, "/x", FetchOptions::new())
            .unwrap();
        assert!(get.state().is_idle());
        assert!(get.cancellation_handle().is_none());

        let post =
            Controller::<Value>::new(provider, Method::Post, "/x", FetchOptions::new()).unwrap();
        assert!(post.state().is_idle());
        assert_eq!(post.alias(), "default");
        assert_eq!(post.endpoint(), "/x");
        assert_eq!(post.method(), Method::Post);
    }

    #[test]
    fn test_teardown_without_request_is_noop() {
        let controller = idle_controller(Method::Post);
        assert!(controller.cancellation_handle().is_none());
        controller.cancel();
        controller.deactivate();
        controller.deactivate();
        assert!(controller.is_torn_down());
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_teardown_before_activation_stays_idle() {
        let controller = idle_controller(Method::Get);
        controller.deactivate();
        controller.activate();
        assert!(controller.state().is_idle());
        assert!(!controller.state().loading());
        assert!(controller.cancellation_handle().is_none());
    }

    #[tokio::test]
    async fn test_activation_publishes_loading() {
        let controller = Controller::<Value>::new(
            provider("http://10.255.255.1:81"),
            Method::Get,
            "/x",
            FetchOptions::new(),
        )
        .unwrap();
        let states = controller.subscribe();
        controller.activate();
        assert!(states.has_changed().unwrap());
        assert!(controller.state().loading());
        assert!(controller.cancellation_handle().is_some());
        controller.activate();
        assert_eq!(controller.shared.attempt.lock().generation, 1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let controller = idle_controller(Method::Get);
        controller.reset();
        let once = controller.state();
        controller.reset();
        assert_eq!(controller.state(), once);
        assert!(once.is_idle());
    }

    #[test]
    fn test_trigger_without_runtime_fails_softly() {
        let controller = Controller::<Value>::new(
            provider("http://localhost"),
            Method::Post,
            "/x",
            FetchOptions::new(),
        )
        .unwrap();
        controller.trigger();
        let state = controller.state();
        assert!(state.error().is_some(), "got {:?}", state);
    }

    #[tokio::test]
    async fn test_trigger_after_teardown_is_ignored() {
        let controller = Controller::<Value>::new(
            provider("http://127.0.0.1:1"),
            Method::Post,
            "/x",
            FetchOptions::new(),
        )
        .unwrap();
        controller.deactivate();
        controller.trigger();
        assert!(controller.state().is_idle());
        assert!(controller.cancellation_handle().is_none());
    }

    #[tokio::test]
    async fn test_cancel_keeps_state_and_aborts_token() {
        let controller = Controller::<Value>::new(
            provider("http://10.255.255.1:81"),
            Method::Post,
            "/slow",
            FetchOptions::new(),
        )
        .unwrap();
        controller.trigger();
        let token = controller.cancellation_handle().unwrap();
        controller.cancel();
        assert!(token.is_aborted());
        assert!(controller.state().loading());
    }

    #[tokio::test]
    async fn test_new_trigger_aborts_previous_token() {
        let controller = Controller::<Value>::new(
            provider("http://10.255.255.1:81"),
            Method::Post,
            "/slow",
            FetchOptions::new(),
        )
        .unwrap();
        controller.trigger();
        let first = controller.cancellation_handle().unwrap();
        controller.trigger();
        let second = controller.cancellation_handle().unwrap();
        assert!(first.is_aborted());
        assert!(!second.is_aborted());
        controller.cancel_and_reset();
        assert!(second.is_aborted());
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_drop_aborts_current_token() {
        let controller = Controller::<Value>::new(
            provider("http://10.255.255.1:81"),
            Method::Post,
            "/slow",
            FetchOptions::new(),
        )
        .unwrap();
        controller.trigger();
        let token = controller.cancellation_handle().unwrap();
        drop(controller);
        assert!(token.is_aborted());
    }
}
