//! Raw form submissions
//!
//! [`SubmittedForm`] is the flat `field -> value` mapping received from a
//! client. It doubles as an axum extractor for
//! `application/x-www-form-urlencoded` bodies. Bodies that cannot be decoded,
//! or that repeat a field name, are rejected with [`MalformedSubmission`]
//! before any validation takes place.

use axum::{
    extract::{Form, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use thiserror::Error;

/// A submission that is not a well-formed `field -> value` mapping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedSubmission {
    /// The body could not be decoded as url-encoded form data
    #[error("form data could not be decoded: {0}")]
    Undecodable(String),

    /// A field name occurred more than once
    #[error("field `{0}` was submitted more than once")]
    DuplicateField(String),
}

impl IntoResponse for MalformedSubmission {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "rejecting malformed submission");
        (StatusCode::BAD_REQUEST, format!("Invalid form data: {self}")).into_response()
    }
}

/// Raw field values exactly as the client sent them
///
/// # Example
///
/// ```rust
/// use workshops::forms::SubmittedForm;
///
/// let form = SubmittedForm::from_pairs([("title", "Intro to Rust"), ("id", "42")])?;
/// assert_eq!(form.get("title"), Some("Intro to Rust"));
/// assert_eq!(form.get("missing"), None);
///
/// assert!(SubmittedForm::from_pairs([("a", "1"), ("a", "2")]).is_err());
/// # Ok::<(), workshops::forms::MalformedSubmission>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedForm {
    values: HashMap<String, String>,
}

impl SubmittedForm {
    /// An empty submission
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a submission from decoded pairs
    ///
    /// # Errors
    ///
    /// Returns [`MalformedSubmission::DuplicateField`] if a name repeats.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, MalformedSubmission>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (name, value) in pairs {
            let name = name.into();
            if values.contains_key(&name) {
                return Err(MalformedSubmission::DuplicateField(name));
            }
            values.insert(name, value.into());
        }
        Ok(Self { values })
    }

    /// Set a field, replacing any previous value
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Raw value for `field`, if it was submitted
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Whether `field` was submitted at all
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Iterate over all submitted pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of submitted fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was submitted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for SubmittedForm {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = MalformedSubmission;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|err| MalformedSubmission::Undecodable(err.body_text()))?;

        Self::from_pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt;

    async fn echo(form: SubmittedForm) -> String {
        format!("{} fields, title={}", form.len(), form.get("title").unwrap_or("-"))
    }

    fn app() -> Router {
        Router::new().route("/", post(echo))
    }

    fn form_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_from_pairs() {
        let form = SubmittedForm::from_pairs([("title", "A"), ("description", "")]).unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("description"), Some(""));
        assert!(form.contains("title"));
        assert!(!form.contains("price"));
    }

    #[test]
    fn test_duplicate_field_is_malformed() {
        let err = SubmittedForm::from_pairs([("title", "A"), ("title", "B")]).unwrap_err();
        assert_eq!(err, MalformedSubmission::DuplicateField("title".to_string()));
    }

    #[test]
    fn test_with_overwrites() {
        let form = SubmittedForm::new().with("title", "first").with("title", "second");
        assert_eq!(form.get("title"), Some("second"));
        assert_eq!(form.len(), 1);
    }

    #[tokio::test]
    async fn test_extracts_urlencoded_body() {
        let response = app()
            .oneshot(form_request("title=Hello+World&description=x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"2 fields, title=Hello World");
    }

    #[tokio::test]
    async fn test_duplicate_keys_rejected_with_bad_request() {
        let response = app()
            .oneshot(form_request("title=a&title=b"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_content_type_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title":"a"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
