//! Header helpers shared by middleware, extractors and handlers

use axum::http::{header::COOKIE, HeaderMap};

/// Whether the request was issued by htmx (`HX-Request: true`)
///
/// # Example
///
/// ```rust
/// use axum::http::HeaderMap;
/// use workshops::middleware::is_htmx_request;
///
/// let mut headers = HeaderMap::new();
/// assert!(!is_htmx_request(&headers));
///
/// headers.insert("HX-Request", "true".parse().unwrap());
/// assert!(is_htmx_request(&headers));
/// ```
#[must_use]
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        == Some("true")
}

/// Value of cookie `name`, searching every `Cookie` header
#[must_use]
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}
