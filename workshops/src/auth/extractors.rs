//! Authentication extractors
//!
//! ```rust,no_run
//! use workshops::auth::{Authenticated, OptionalAuth};
//!
//! async fn protected(Authenticated(user): Authenticated) -> String {
//!     format!("Hello, {}!", user.email)
//! }
//!
//! async fn public(OptionalAuth(user): OptionalAuth) -> String {
//!     user.map_or_else(|| "Hello, guest!".to_string(), |u| format!("Hello, {}!", u.email))
//! }
//! ```

use super::{login_path, Session, User, UserError};
use crate::middleware::is_htmx_request;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

/// Signed-in user; rejects anonymous requests
///
/// Browsers are sent to the login page with the current path as
/// `redirect_to`. htmx requests get `401` with an `HX-Redirect` header
/// instead, since htmx does not follow redirects for full-page navigation.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthenticationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = is_htmx_request(&parts.headers);
        let return_to = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);
        let not_authenticated = || AuthenticationError::NotAuthenticated {
            login: login_path(&return_to),
            is_htmx,
        };

        let user_id = parts
            .extensions
            .get::<Session>()
            .and_then(Session::user_id)
            .ok_or_else(not_authenticated)?;

        let app_state = AppState::from_ref(state);
        match User::find_by_id(&user_id, app_state.pool()).await {
            Ok(user) => Ok(Self(user)),
            Err(UserError::NotFound) => {
                tracing::debug!(user_id = %user_id, "session refers to a deleted user");
                Err(not_authenticated())
            }
            Err(err) => Err(AuthenticationError::UserLookup(err)),
        }
    }
}

/// Signed-in user, if any
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthenticationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(user_id) = parts.extensions.get::<Session>().and_then(Session::user_id) else {
            return Ok(Self(None));
        };

        let app_state = AppState::from_ref(state);
        match User::find_by_id(&user_id, app_state.pool()).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(UserError::NotFound) => Ok(Self(None)),
            Err(err) => Err(AuthenticationError::UserLookup(err)),
        }
    }
}

/// Rejection from the authentication extractors
#[derive(Debug)]
pub enum AuthenticationError {
    /// No signed-in user
    NotAuthenticated {
        /// Login page carrying the return path
        login: String,
        /// Whether the request came from htmx
        is_htmx: bool,
    },

    /// Loading the user failed
    UserLookup(UserError),
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated { login, is_htmx: true } => {
                (StatusCode::UNAUTHORIZED, [("HX-Redirect", login)], "Unauthorized").into_response()
            }
            Self::NotAuthenticated {
                login,
                is_htmx: false,
            } => Redirect::to(&login).into_response(),
            Self::UserLookup(err) => crate::error::WorkshopsError::from(err).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_rejection_redirects_to_login() {
        let response = AuthenticationError::NotAuthenticated {
            login: login_path("/workshops/1/edit"),
            is_htmx: false,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "/login?redirect_to=%2Fworkshops%2F1%2Fedit"
        );
    }

    #[test]
    fn test_htmx_rejection_uses_hx_redirect() {
        let response = AuthenticationError::NotAuthenticated {
            login: login_path("/"),
            is_htmx: true,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("HX-Redirect").unwrap(),
            "/login?redirect_to=%2F"
        );
    }

    #[test]
    fn test_lookup_failure_is_server_error() {
        let response = AuthenticationError::UserLookup(UserError::DatabaseError(
            sqlx::Error::PoolClosed,
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
