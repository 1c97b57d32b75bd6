//! Middleware layers
//!
//! - [`SessionLayer`]: cookie sessions backed by [`crate::auth::SessionStore`]
//! - [`is_htmx_request`]: request classification shared by extractors and handlers

mod helpers;
pub mod session;

pub use helpers::{is_htmx_request, read_cookie};
pub use session::{SameSite, SessionConfig, SessionLayer, SessionMiddleware};
