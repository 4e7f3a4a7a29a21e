//! Request lifecycle controllers.
//!
//! A controller is the stateful side of the crate: one per call site, it owns
//! an endpoint plus per-call overrides, resolves its alias on every attempt,
//! drives the transport, and publishes `{loading, response, error}` state.
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FetchProvider`] | Registry + transport handed to call sites |
//! | [`Controller`] | Per-call-site lifecycle with trigger/cancel/reset |
//! | [`FetchOptions`] | Alias, auto-load flag, and request overrides |
//! | [`LifecycleState`] | Idle, loading, succeeded, or failed |
//!
//! # Host integration
//!
//! Any lifecycle runtime can drive a controller with two calls: `activate()`
//! after first render and `deactivate()` (or drop) at teardown. State changes are
//! observed through `subscribe()` or the `states()` stream.

mod lifecycle;
mod options;
mod provider;
mod state;

pub use lifecycle::Controller;
pub use options::FetchOptions;
pub use provider::FetchProvider;
pub use state::LifecycleState;
