//! SQLite storage
//!
//! A [`SqlitePool`] is created from [`DatabaseSettings`] and migrated with the
//! migrations embedded from `migrations/`.

pub mod seed;
pub mod workshop;

pub use seed::seed;
pub use workshop::{Workshop, WorkshopEditor, WorkshopId, WorkshopSummary};

use crate::config::DatabaseSettings;
use sqlx::{
    migrate::{MigrateError, Migrator},
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a connection pool
///
/// The database file is created if it does not exist and foreign keys are
/// enforced. In-memory databases keep their connections alive for the life of
/// the pool, since closing the last one discards the data.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed or the first connection fails.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&settings.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool = SqlitePoolOptions::new().max_connections(settings.max_connections.max(1));
    if is_in_memory(&settings.url) {
        pool = pool.max_connections(1).idle_timeout(None).max_lifetime(None);
    }

    tracing::debug!(url = %settings.url, "connecting to database");
    pool.connect_with(options).await
}

/// Apply pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails or the applied history diverges from
/// the embedded migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("database migrations applied");
    Ok(())
}

/// Undo every migration, leaving an empty schema
///
/// # Errors
///
/// Returns an error if a migration cannot be reverted.
pub async fn drop_all(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.undo(pool, 0).await?;
    tracing::warn!("database schema dropped");
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:shared?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://workshops.db"));
    }

    #[tokio::test]
    async fn test_migrate_creates_tables() {
        let pool = testing::memory_pool().await;
        let tables: Vec<String> = sqlx::query_scalar(
            r"SELECT name FROM sqlite_master
              WHERE type = 'table' AND name NOT LIKE '\_%' ESCAPE '\'
              ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, ["passwords", "users", "workshops"]);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let pool = testing::memory_pool().await;
        migrate(&pool).await.unwrap();
    }
}
