//! URL and query string construction.

use url::form_urlencoded;

/// Join an alias base URL with an endpoint path.
///
/// Plain concatenation: the base URL is expected to carry no trailing slash
/// when endpoints carry a leading one.
#[inline]
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", base_url, endpoint)
}

/// Append query parameters to an endpoint.
///
/// Pairs are encoded as `application/x-www-form-urlencoded` in the order given.
/// `None` leaves the endpoint untouched; an empty list still appends `?`.
///
/// # Examples
///
/// ```
/// use alias_fetch::protocol::endpoint_with_params;
///
/// let params = vec![
///     ("a".to_string(), "1".to_string()),
///     ("b".to_string(), "2".to_string()),
/// ];
/// assert_eq!(endpoint_with_params("/items", Some(params.as_slice())), "/items?a=1&b=2");
/// assert_eq!(endpoint_with_params("/items", None), "/items");
/// ```
pub fn endpoint_with_params(endpoint: &str, params: Option<&[(String, String)]>) -> String {
    match params {
        Some(params) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            format!("{}?{}", endpoint, query)
        }
        None => endpoint.to_string(),
    }
}
