//! Response normalization helpers for the fetch client.
//!
//! The transport reads every response body as text before deciding anything.
//! [`settle_response`] then applies the success/failure rules:
//!
//! - 2xx: the body (absent when empty) is decoded into the caller's type
//! - anything else: the failure detail is the JSON body when there is one,
//!   the status text otherwise (a `null` body counts as none)

use crate::error::{FetchError, Result};
use crate::protocol::parse_body_text;
use crate::types::{Detail, FetchResponse, ResponseMetadata};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reason phrase for a status, or its numeric code when it has none.
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Capture the transport-level view of a response before its body is consumed.
pub fn response_metadata(response: &reqwest::Response) -> ResponseMetadata {
    let status = response.status();
    ResponseMetadata {
        status,
        status_text: status_text(status),
        headers: response.headers().clone(),
        url: response.url().to_string(),
    }
}

/// Turn a received response into the normalized outcome.
///
/// # Errors
///
/// - [`FetchError::Http`] for non-2xx statuses
/// - [`FetchError::Decode`] for a 2xx body that is not JSON or does not fit `T`
pub fn settle_response<T: DeserializeOwned>(
    metadata: ResponseMetadata,
    text: &str,
) -> Result<FetchResponse<T>> {
    let parsed = parse_body_text(text);

    if metadata.status.is_success() {
        let value = parsed?.unwrap_or(Value::Null);
        let data = serde_json::from_value(value)?;
        return Ok(FetchResponse { data, metadata });
    }

    let detail = match parsed {
        Ok(Some(value)) if !value.is_null() => Detail::Json(value),
        _ => Detail::Text(metadata.status_text.clone()),
    };
    Err(FetchError::Http {
        status: metadata.status.as_u16(),
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use serde_json::json;

    fn metadata(status: u16) -> ResponseMetadata {
        let status = StatusCode::from_u16(status).unwrap();
        ResponseMetadata {
            status,
            status_text: status_text(status),
            headers: HeaderMap::new(),
            url: "http://localhost/test".to_string(),
        }
    }

    #[test]
    fn test_status_text() {
        assert_eq!(status_text(StatusCode::INTERNAL_SERVER_ERROR), "Internal Server Error");
        assert_eq!(status_text(StatusCode::from_u16(599).unwrap()), "599");
    }

    #[test]
    fn test_success_json() {
        let response: FetchResponse<Value> = settle_response(metadata(200), r#"{"id":1}"#).unwrap();
        assert_eq!(response.data, json!({"id": 1}));
        assert_eq!(response.metadata.status, StatusCode::OK);
    }

    #[test]
    fn test_success_empty_body_is_null() {
        let response: FetchResponse<Option<Value>> = settle_response(metadata(204), "").unwrap();
        assert_eq!(response.data, None);
    }

    #[test]
    fn test_success_invalid_json_is_decode_error() {
        let err = settle_response::<Value>(metadata(200), "<html></html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_success_shape_mismatch_is_decode_error() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct User {
            id: u64,
        }
        let err = settle_response::<User>(metadata(200), r#"{"name":"x"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_failure_prefers_json_body() {
        let err = settle_response::<Value>(metadata(404), r#"{"error":"not found"}"#).unwrap_err();
        assert_eq!(
            err,
            FetchError::Http {
                status: 404,
                detail: Detail::Json(json!({"error": "not found"})),
            }
        );
    }

    #[test]
    fn test_failure_empty_body_uses_status_text() {
        let err = settle_response::<Value>(metadata(500), "").unwrap_err();
        assert_eq!(err.detail(), Detail::Text("Internal Server Error".to_string()));
    }

    #[test]
    fn test_failure_non_json_body_uses_status_text() {
        let err = settle_response::<Value>(metadata(502), "upstream down").unwrap_err();
        assert_eq!(err.detail(), Detail::Text("Bad Gateway".to_string()));
    }

    #[test]
    fn test_failure_null_body_uses_status_text() {
        let err = settle_response::<Value>(metadata(500), "null").unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.detail(), Detail::Text("Internal Server Error".to_string()));
    }
}
