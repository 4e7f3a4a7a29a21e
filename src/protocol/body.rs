//! Request body encoding and response body parsing.
//!
//! Encoding depends on the [`BodyType`]:
//!
//! | Body type | Wire form |
//! |-----------|-----------|
//! | `Json` | JSON text, `Content-Type: application/json` implied |
//! | `FormData` | `multipart/form-data`, one text part per object key |
//! | `Original` | Passed through; strings are sent verbatim |

use crate::error::{FetchError, Result};
use crate::types::BodyType;
use bytes::Bytes;
use reqwest::multipart::Form;
use serde_json::Value;

/// A request body ready to be attached to a request.
#[derive(Debug)]
pub enum EncodedBody {
    /// No body
    Empty,
    /// JSON text
    Json(Bytes),
    /// Multipart form
    Form(Form),
    /// Caller-serialized bytes
    Raw(Bytes),
}

impl EncodedBody {
    /// True when there is nothing to send.
    pub fn is_empty(&self) -> bool {
        matches!(self, EncodedBody::Empty)
    }
}

/// Encode a request body according to its body type.
///
/// Form bodies must be JSON objects; each of the object's own keys becomes a
/// text part. String values are used verbatim, other values as JSON text.
///
/// # Errors
///
/// Returns [`FetchError::Encode`] when a form body is not an object or JSON
/// serialization fails.
pub fn encode_body(body: Option<&Value>, body_type: BodyType) -> Result<EncodedBody> {
    let Some(body) = body else {
        return Ok(EncodedBody::Empty);
    };

    match body_type {
        BodyType::Json => serde_json::to_vec(body)
            .map(|bytes| EncodedBody::Json(Bytes::from(bytes)))
            .map_err(|e| FetchError::Encode(e.to_string())),
        BodyType::FormData => {
            let Value::Object(fields) = body else {
                return Err(FetchError::Encode(format!(
                    "form-data body must be an object, got {}",
                    value_kind(body)
                )));
            };
            let form = fields.iter().fold(Form::new(), |form, (key, value)| {
                form.text(key.clone(), form_value(value))
            });
            Ok(EncodedBody::Form(form))
        }
        BodyType::Original => Ok(EncodedBody::Raw(match body {
            Value::String(text) => Bytes::from(text.clone()),
            other => Bytes::from(other.to_string()),
        })),
    }
}

/// Parse response text as JSON.
///
/// Empty text means "no body" and yields `Ok(None)`.
///
/// # Errors
///
/// Returns the parser error for non-empty text that is not valid JSON.
pub fn parse_body_text(text: &str) -> std::result::Result<Option<Value>, serde_json::Error> {
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some)
}

fn form_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_body() {
        assert!(encode_body(None, BodyType::Json).unwrap().is_empty());
        assert!(encode_body(None, BodyType::FormData).unwrap().is_empty());
    }

    #[test]
    fn test_json_body() {
        let body = json!({"name": "ada", "tags": [1, 2]});
        match encode_body(Some(&body), BodyType::Json).unwrap() {
            EncodedBody::Json(bytes) => {
                let decoded: Value = serde_json::from_slice(&bytes).unwrap();
                assert_eq!(decoded, body);
            }
            other => panic!("expected json body, got {:?}", other),
        }
    }

    #[test]
    fn test_original_string_is_verbatim() {
        let body = json!("a=1&b=2");
        match encode_body(Some(&body), BodyType::Original).unwrap() {
            EncodedBody::Raw(bytes) => assert_eq!(&bytes[..], b"a=1&b=2"),
            other => panic!("expected raw body, got {:?}", other),
        }
    }

    #[test]
    fn test_form_requires_object() {
        let err = encode_body(Some(&json!([1, 2])), BodyType::FormData).unwrap_err();
        assert!(matches!(err, FetchError::Encode(_)));
    }

    #[test]
    fn test_form_values() {
        assert_eq!(form_value(&json!("plain")), "plain");
        assert_eq!(form_value(&json!(42)), "42");
        assert_eq!(form_value(&json!(true)), "true");
    }

    #[test]
    fn test_parse_body_text() {
        assert_eq!(parse_body_text("").unwrap(), None);
        assert_eq!(parse_body_text(r#"{"a":1}"#).unwrap(), Some(json!({"a": 1})));
        assert!(parse_body_text("<html>").is_err());
    }
}
