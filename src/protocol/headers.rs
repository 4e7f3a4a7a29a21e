//! Header validation and merging.
//!
//! Alias profiles carry default headers; callers may override any of them per
//! request. Names are compared case-insensitively, as HTTP requires, so an
//! override of `authorization` replaces a default `Authorization`.
//!
//! # Examples
//!
//! ```
//! use alias_fetch::protocol::{header_map, merge_headers};
//!
//! let defaults = header_map([("Accept", "application/json"), ("X-Team", "core")]).unwrap();
//! let overrides = header_map([("x-team", "billing")]).unwrap();
//!
//! let merged = merge_headers(&defaults, &overrides);
//! assert_eq!(merged["x-team"], "billing");
//! assert_eq!(merged["accept"], "application/json");
//! ```

use crate::error::{FetchError, Result};
use http::header::{HeaderMap, HeaderName, HeaderValue};

/// Content type implied by JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Build a validated header map from string pairs.
///
/// A name given twice keeps its last value.
///
/// # Errors
///
/// Returns [`FetchError::InvalidHeader`] for a malformed name or value.
pub fn header_map<I, K, V>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for (key, value) in pairs {
        let (key, value) = (key.as_ref(), value.as_ref());
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| FetchError::InvalidHeader(format!("{}: {}", key, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| FetchError::InvalidHeader(format!("{}: {}", key, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Merge per-request headers over defaults.
///
/// Every name present in `overrides` replaces all default values for that name.
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
    }
    for (name, value) in overrides {
        merged.append(name.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_valid() {
        let headers = header_map([("Authorization", "Bearer abc")]).unwrap();
        assert_eq!(headers["authorization"], "Bearer abc");
    }

    #[test]
    fn test_header_map_last_wins() {
        let headers = header_map([("X-A", "1"), ("x-a", "2")]).unwrap();
        assert_eq!(headers.get_all("x-a").iter().count(), 1);
        assert_eq!(headers["x-a"], "2");
    }

    #[test]
    fn test_header_map_invalid_name() {
        let err = header_map([("bad header", "x")]).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader(_)));
    }

    #[test]
    fn test_header_map_invalid_value() {
        assert!(header_map([("X-Ok", "line\nbreak")]).is_err());
    }

    #[test]
    fn test_merge_override_wins() {
        let defaults =
            header_map([("Authorization", "Bearer alias"), ("Accept", "text/plain")]).unwrap();
        let overrides = header_map([("authorization", "Bearer call")]).unwrap();
        let merged = merge_headers(&defaults, &overrides);
        assert_eq!(merged["authorization"], "Bearer call");
        assert_eq!(merged["accept"], "text/plain");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_without_overrides() {
        let defaults = header_map([("Accept", "text/plain")]).unwrap();
        assert_eq!(merge_headers(&defaults, &HeaderMap::new()), defaults);
    }
}
