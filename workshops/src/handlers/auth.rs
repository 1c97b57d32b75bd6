//! Login and logout

use super::see_other;
use crate::auth::{safe_redirect, OptionalAuth, Session, User, UserError};
use crate::error::WorkshopsError;
use crate::state::AppState;
use crate::template::{LoginPage, PageTemplate};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
    Form,
};
use axum_htmx::HxRequest;
use serde::Deserialize;
use validator::Validate;

/// Shown for an unknown email or a wrong password alike
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Query string of `GET /login`
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Path to return to after signing in
    pub redirect_to: Option<String>,
}

/// Login form data
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    /// Account email
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    /// Account password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Path to return to after signing in
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// `GET /login`
///
/// Already signed-in users go straight to the redirect target.
pub async fn login_form(
    HxRequest(is_htmx): HxRequest,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    let redirect_to = safe_redirect(query.redirect_to.as_deref());
    if user.is_some() {
        return see_other(redirect_to, is_htmx);
    }

    LoginPage {
        redirect_to: redirect_to.to_string(),
        ..LoginPage::default()
    }
    .render_html()
}

/// `POST /login`
///
/// # Errors
///
/// Returns an error only when the user lookup itself fails; bad input and bad
/// credentials re-render the form with `400`.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<LoginForm>,
) -> Result<Response, WorkshopsError> {
    let redirect_to = safe_redirect(form.redirect_to.as_deref()).to_string();

    if let Err(errors) = form.validate() {
        return Ok(LoginPage {
            email: form.email,
            redirect_to,
            errors: errors.into(),
            failure: None,
        }
        .render_with_status(StatusCode::BAD_REQUEST));
    }

    match User::authenticate(&form.email, &form.password, state.pool()).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user logged in");
            session.sign_in(user.id);
            Ok(see_other(&redirect_to, is_htmx))
        }
        Err(UserError::InvalidCredentials) => {
            tracing::debug!("login rejected");
            Ok(LoginPage {
                email: form.email,
                redirect_to,
                failure: Some(INVALID_CREDENTIALS.to_string()),
                ..LoginPage::default()
            }
            .render_with_status(StatusCode::BAD_REQUEST))
        }
        Err(err) => Err(err.into()),
    }
}

/// `POST /logout`
pub async fn logout(session: Session, HxRequest(is_htmx): HxRequest) -> Response {
    session.destroy();
    see_other("/", is_htmx)
}
