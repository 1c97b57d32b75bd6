//! User model and credential checks
//!
//! Users and their password hashes live in separate tables; deleting a user
//! cascades to the password row.
//!
//! ```sql
//! CREATE TABLE users (
//!     id TEXT PRIMARY KEY NOT NULL,
//!     email TEXT NOT NULL UNIQUE,
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//!
//! CREATE TABLE passwords (
//!     user_id TEXT PRIMARY KEY NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     hash TEXT NOT NULL
//! );
//! ```

use super::password::{hash_password, verify_password, PasswordError};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool, Type};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// User lookup and creation errors
#[derive(Debug, Error)]
pub enum UserError {
    /// Email address is not well formed
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(#[from] PasswordError),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// No such user
    #[error("User not found")]
    NotFound,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// User identifier (UUID text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type)]
#[sqlx(transparent)]
pub struct UserId(String);

impl UserId {
    /// A fresh random id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize and check an email address
///
/// Surrounding whitespace is dropped and the address is lower-cased.
///
/// # Errors
///
/// Returns [`UserError::InvalidEmail`] if the address is not well formed.
pub fn normalize_email(email: &str) -> Result<String, UserError> {
    #[derive(Validate)]
    struct EmailCheck {
        #[validate(email)]
        email: String,
    }

    let check = EmailCheck {
        email: email.trim().to_lowercase(),
    };
    match check.validate() {
        Ok(()) => Ok(check.email),
        Err(_) => Err(UserError::InvalidEmail(check.email)),
    }
}

/// An account able to sign in
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Primary key
    pub id: UserId,

    /// Unique, lower-cased email address
    pub email: String,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user together with its password row
    ///
    /// # Errors
    ///
    /// Returns an error if the email is invalid, hashing fails, or the insert
    /// fails (for example because the email is taken).
    pub async fn create(email: &str, password: &str, pool: &SqlitePool) -> Result<Self, UserError> {
        let email = normalize_email(email)?;
        let hash = hash_password(password)?;
        let now = Utc::now();
        let user = Self {
            id: UserId::generate(),
            email,
            created_at: now,
            updated_at: now,
        };

        let mut tx = pool.begin().await?;
        sqlx::query("INSERT INTO users (id, email, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.email)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO passwords (user_id, hash) VALUES (?, ?)")
            .bind(&user.id)
            .bind(&hash)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "created user");
        Ok(user)
    }

    /// Find a user by id
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if there is no such user.
    pub async fn find_by_id(id: &UserId, pool: &SqlitePool) -> Result<Self, UserError> {
        sqlx::query_as::<_, Self>(
            "SELECT id, email, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(UserError::NotFound)
    }

    /// Find a user by email
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if there is no such user.
    pub async fn find_by_email(email: &str, pool: &SqlitePool) -> Result<Self, UserError> {
        let email = normalize_email(email)?;
        sqlx::query_as::<_, Self>(
            "SELECT id, email, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or(UserError::NotFound)
    }

    /// Delete a user (and its password) by email
    ///
    /// Returns whether a user was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is invalid or the delete fails.
    pub async fn delete_by_email(email: &str, pool: &SqlitePool) -> Result<bool, UserError> {
        let email = normalize_email(email)?;
        let result = sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(&email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check credentials
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidCredentials`] for an unknown email or a wrong
    /// password, and other variants for database or hash failures.
    pub async fn authenticate(
        email: &str,
        password: &str,
        pool: &SqlitePool,
    ) -> Result<Self, UserError> {
        let Ok(email) = normalize_email(email) else {
            return Err(UserError::InvalidCredentials);
        };

        let hash: Option<String> = sqlx::query_scalar(
            "SELECT p.hash FROM passwords p JOIN users u ON u.id = p.user_id WHERE u.email = ?",
        )
        .bind(&email)
        .fetch_optional(pool)
        .await?;

        let Some(hash) = hash else {
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(password, &hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Self::find_by_email(&email, pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Rachel@Remix.Run ").unwrap(),
            "rachel@remix.run"
        );
        assert!(matches!(
            normalize_email("not-an-email"),
            Err(UserError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = memory_pool().await;
        let user = User::create("Kody@Example.com", "koalas", &pool).await.unwrap();
        assert_eq!(user.email, "kody@example.com");

        let found = User::find_by_id(&user.id, &pool).await.unwrap();
        assert_eq!(found.email, "kody@example.com");
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = memory_pool().await;
        User::create("kody@example.com", "koalas", &pool).await.unwrap();
        let err = User::create("KODY@example.com", "other", &pool).await.unwrap_err();
        assert!(matches!(err, UserError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let pool = memory_pool().await;
        User::create("kody@example.com", "koalas", &pool).await.unwrap();

        let user = User::authenticate("kody@example.com", "koalas", &pool).await.unwrap();
        assert_eq!(user.email, "kody@example.com");

        assert!(matches!(
            User::authenticate("kody@example.com", "wrong", &pool).await,
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            User::authenticate("nobody@example.com", "koalas", &pool).await,
            Err(UserError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_delete_cascades_password() {
        let pool = memory_pool().await;
        User::create("kody@example.com", "koalas", &pool).await.unwrap();

        assert!(User::delete_by_email("kody@example.com", &pool).await.unwrap());
        assert!(!User::delete_by_email("kody@example.com", &pool).await.unwrap());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM passwords")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let pool = memory_pool().await;
        assert!(matches!(
            User::find_by_id(&UserId::new("missing"), &pool).await,
            Err(UserError::NotFound)
        ));
    }
}
