//! Askama page templates
//!
//! Every page is an askama template under `templates/` extending
//! `base.html`. [`PageTemplate`] turns any template into an HTML response.
//!
//! ```rust
//! use askama::Template;
//! use axum::http::StatusCode;
//! use workshops::template::PageTemplate;
//!
//! #[derive(Template)]
//! #[template(source = "<h1>{{ title }}</h1>", ext = "html")]
//! struct Heading {
//!     title: String,
//! }
//!
//! let response = Heading { title: "Workshops".into() }.render_html();
//! assert_eq!(response.status(), StatusCode::OK);
//! ```

mod pages;

pub use pages::{EditWorkshopPage, ErrorPage, IndexPage, LoginPage, WorkshopPage};

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Extension trait rendering askama templates as HTML responses
pub trait PageTemplate: Template {
    /// Render with `200 OK`
    fn render_html(&self) -> Response {
        self.render_with_status(StatusCode::OK)
    }

    /// Render with a specific status
    ///
    /// A rendering failure is logged and answered with a plain
    /// `500 Internal Server Error`.
    fn render_with_status(&self, status: StatusCode) -> Response {
        match self.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!("Template rendering error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Template rendering failed",
                )
                    .into_response()
            }
        }
    }
}

impl<T> PageTemplate for T where T: Template {}
