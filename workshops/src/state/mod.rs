//! Application state
//!
//! Everything handlers share: configuration, the database pool, the session
//! store and the edit-form rules. Cloning is cheap; every field is reference
//! counted.

use crate::{
    auth::SessionStore,
    config::WorkshopsConfig,
    db,
    error::WorkshopsError,
    forms::{workshop::workshop_rules, DefaultMessages, MessageFormatter, RuleSet},
    observability::ObservabilityConfig,
};
use sqlx::SqlitePool;
use std::{fmt, sync::Arc};

/// Shared application state
///
/// # Example
///
/// ```rust,no_run
/// use workshops::{config::WorkshopsConfig, state::AppState};
///
/// # async fn example() -> anyhow::Result<()> {
/// let state = AppState::connect(WorkshopsConfig::load()?).await?;
/// let app = workshops::app::router(state);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AppState {
    config: Arc<WorkshopsConfig>,
    observability: Arc<ObservabilityConfig>,
    pool: SqlitePool,
    sessions: SessionStore,
    workshop_rules: Arc<RuleSet>,
    messages: Arc<dyn MessageFormatter>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("observability", &self.observability)
            .field("sessions", &self.sessions)
            .field("workshop_rules", &self.workshop_rules)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state around an open pool
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopsError::Rules`] if the edit-form rules are
    /// inconsistent.
    pub fn new(config: WorkshopsConfig, pool: SqlitePool) -> Result<Self, WorkshopsError> {
        let sessions = SessionStore::new(config.security.session_max_age_secs);

        Ok(Self {
            config: Arc::new(config),
            observability: Arc::new(ObservabilityConfig::default()),
            pool,
            sessions,
            workshop_rules: Arc::new(workshop_rules()?),
            messages: Arc::new(DefaultMessages),
        })
    }

    /// Open the configured database, migrate it if enabled, and build state
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn connect(config: WorkshopsConfig) -> Result<Self, WorkshopsError> {
        let pool = db::connect(&config.database).await?;
        if config.database.run_migrations {
            db::migrate(&pool).await?;
        }
        Self::new(config, pool)
    }

    /// Replace the violation message formatter
    #[must_use]
    pub fn with_messages(mut self, messages: impl MessageFormatter + 'static) -> Self {
        self.messages = Arc::new(messages);
        self
    }

    /// Application configuration
    #[must_use]
    pub fn config(&self) -> &WorkshopsConfig {
        &self.config
    }

    /// Observability settings
    #[must_use]
    pub fn observability(&self) -> &ObservabilityConfig {
        &self.observability
    }

    /// Database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Session store
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Rules for the workshop edit form
    #[must_use]
    pub fn workshop_rules(&self) -> &RuleSet {
        &self.workshop_rules
    }

    /// Violation message formatter
    #[must_use]
    pub fn messages(&self) -> &dyn MessageFormatter {
        self.messages.as_ref()
    }
}
