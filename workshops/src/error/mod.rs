//! Error types and error handling

use crate::auth::{PasswordError, UserError};
use crate::forms::{PersistError, RuleError};
use crate::template::{ErrorPage, PageTemplate};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum WorkshopsError {
    /// Invalid form rule declarations
    #[error("Invalid form rules: {0}")]
    Rules(#[from] RuleError),

    /// Not Found (404); the message is shown to the user as-is
    #[error("{0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// User lookup or creation failed
    #[error("User error: {0}")]
    User(#[from] UserError),

    /// Password hashing failed
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    /// Persisting a submission failed
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Listener or connection I/O failed
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkshopsError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WorkshopsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            format!("An unexpected error occurred: {self}")
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
            self.to_string()
        };

        ErrorPage { message }.render_with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WorkshopsError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WorkshopsError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_is_verbatim() {
        let err = WorkshopsError::NotFound("No workshop with the ID abc exists.".into());
        assert_eq!(err.to_string(), "No workshop with the ID abc exists.");
    }

    #[test]
    fn test_into_response_status() {
        let response = WorkshopsError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = WorkshopsError::NotFound("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
