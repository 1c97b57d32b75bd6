//! HTTP handlers
//!
//! Handlers return `Result<Response, WorkshopsError>`; failures render the
//! error page through [`WorkshopsError`](crate::error::WorkshopsError)'s
//! `IntoResponse`.

pub mod auth;
pub mod health;
pub mod workshops;

use crate::template::{ErrorPage, PageTemplate};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Send the client to `location` after a successful form post
///
/// Browsers get `303 See Other`. htmx requests get `200` with `HX-Redirect`
/// so htmx performs a full navigation.
#[must_use]
pub fn see_other(location: &str, is_htmx: bool) -> Response {
    if is_htmx {
        (StatusCode::OK, [("HX-Redirect", location.to_string())]).into_response()
    } else {
        Redirect::to(location).into_response()
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    ErrorPage {
        message: "Page not found".to_string(),
    }
    .render_with_status(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_see_other_browser() {
        let response = see_other("/workshops/1", false);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/workshops/1");
    }

    #[test]
    fn test_see_other_htmx() {
        let response = see_other("/workshops/1", true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("HX-Redirect").unwrap(), "/workshops/1");
        assert!(response.headers().get("location").is_none());
    }

    #[tokio::test]
    async fn test_not_found() {
        assert_eq!(not_found().await.status(), StatusCode::NOT_FOUND);
    }
}
