//! Observable request lifecycle state.

use crate::types::Failure;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Lifecycle of a controller's current request.
///
/// Only valid combinations exist: while loading there is neither a response nor
/// an error, a settled request has exactly one of them, and an idle controller
/// has neither.
///
/// Serializes as `{ "loading": bool, "response": T | null, "error": Failure | null }`
/// for hosts that hand state to a UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleState<T> {
    /// Nothing requested, or reset
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Succeeded(T),
    /// The last request failed
    Failed(Failure),
}

impl<T> LifecycleState<T> {
    /// Whether a request is in flight.
    pub fn loading(&self) -> bool {
        matches!(self, LifecycleState::Loading)
    }

    /// Response of the last successful request.
    pub fn response(&self) -> Option<&T> {
        match self {
            LifecycleState::Succeeded(data) => Some(data),
            _ => None,
        }
    }

    /// Failure of the last request.
    pub fn error(&self) -> Option<&Failure> {
        match self {
            LifecycleState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Whether the controller is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, LifecycleState::Idle)
    }

    /// Whether the last request has settled, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, LifecycleState::Succeeded(_) | LifecycleState::Failed(_))
    }

    /// Take the response out of the state.
    pub fn into_response(self) -> Option<T> {
        match self {
            LifecycleState::Succeeded(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> Default for LifecycleState<T> {
    fn default() -> Self {
        LifecycleState::Idle
    }
}

impl<T: Serialize> Serialize for LifecycleState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LifecycleState", 3)?;
        state.serialize_field("loading", &self.loading())?;
        state.serialize_field("response", &self.response())?;
        state.serialize_field("error", &self.error())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Detail;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let idle: LifecycleState<u32> = LifecycleState::default();
        assert!(idle.is_idle());
        assert!(!idle.loading());
        assert!(idle.response().is_none() && idle.error().is_none());

        let loading: LifecycleState<u32> = LifecycleState::Loading;
        assert!(loading.loading());
        assert!(!loading.is_settled());

        let done = LifecycleState::Succeeded(5u32);
        assert_eq!(done.response(), Some(&5));
        assert!(done.error().is_none());
        assert_eq!(done.into_response(), Some(5));
    }

    #[test]
    fn test_serialized_shape() {
        let failed: LifecycleState<u32> =
            LifecycleState::Failed(Failure::new(Some(404), Detail::Json(json!({"error": "gone"}))));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({
                "loading": false,
                "response": null,
                "error": { "status": 404, "detail": { "error": "gone" } }
            })
        );

        let loading: LifecycleState<u32> = LifecycleState::Loading;
        assert_eq!(
            serde_json::to_value(&loading).unwrap(),
            json!({ "loading": true, "response": null, "error": null })
        );
    }
}
