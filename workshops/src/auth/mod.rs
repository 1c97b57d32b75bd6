//! Authentication: users, password hashing, sessions and extractors

pub mod extractors;
pub mod password;
pub mod session;
pub mod user;

pub use extractors::{Authenticated, AuthenticationError, OptionalAuth};
pub use password::{hash_password, verify_password, PasswordError};
pub use session::{Session, SessionData, SessionId, SessionStore};
pub use user::{User, UserError, UserId};

/// Login page path
pub const LOGIN_PATH: &str = "/login";

/// Login page that returns to `redirect_to` after signing in
#[must_use]
pub fn login_path(redirect_to: &str) -> String {
    format!("{LOGIN_PATH}?redirect_to={}", urlencoding::encode(redirect_to))
}

/// Post-login target, limited to local paths
///
/// Anything that is not an absolute path on this site falls back to `/`.
/// That includes protocol-relative `//host` URLs and targets carrying control
/// characters, which browsers strip before resolving (`/\t/host` is `//host`).
#[must_use]
pub fn safe_redirect(redirect_to: Option<&str>) -> &str {
    match redirect_to {
        Some(to)
            if to.starts_with('/')
                && !to.starts_with("//")
                && !to.starts_with("/\\")
                && !to.chars().any(char::is_control) =>
        {
            to
        }
        _ => "/",
    }
}
