//! Configuration management
//!
//! Configuration is layered with figment, later sources overriding earlier
//! ones:
//!
//! 1. Hardcoded defaults
//! 2. `./config.toml` (or the file passed to [`WorkshopsConfig::load_from`])
//! 3. Environment variables with the `WORKSHOPS_` prefix, using `__` to reach
//!    nested keys (`WORKSHOPS_DATABASE__URL`)
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [database]
//! url = "sqlite://workshops.db"
//! max_connections = 5
//! run_migrations = true
//!
//! [security]
//! session_cookie = "workshops_session"
//! session_max_age_secs = 86400
//! secure_cookies = false
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "WORKSHOPS_";

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Largest accepted request body in bytes
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            body_limit_bytes: 64 * 1024,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite connection URL
    pub url: String,

    /// Pool size
    pub max_connections: u32,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://workshops.db".to_string(),
            max_connections: 5,
            run_migrations: true,
        }
    }
}

/// Session and cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// Name of the session cookie
    pub session_cookie: String,

    /// Idle lifetime of a session in seconds
    pub session_max_age_secs: u64,

    /// Mark cookies `Secure` (HTTPS only)
    pub secure_cookies: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            session_cookie: "workshops_session".to_string(),
            session_max_age_secs: 86400, // 24 hours
            secure_cookies: !cfg!(debug_assertions),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkshopsConfig {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerSettings,

    /// Database
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Sessions and cookies
    #[serde(default)]
    pub security: SecuritySettings,
}

impl WorkshopsConfig {
    /// Load from `./config.toml` and the environment
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a source cannot be parsed or a value has
    /// the wrong type.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use workshops::config::WorkshopsConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = WorkshopsConfig::load()?;
    /// println!("listening on {}", config.bind_address());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific TOML file and the environment
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a source cannot be parsed or a value has
    /// the wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    /// The layered figment, exposed for callers that merge extra providers
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// `host:port` for the listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = WorkshopsConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.run_migrations);
        assert_eq!(config.security.session_cookie, "workshops_session");
        assert_eq!(config.security.session_max_age_secs, 86400);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_security_defaults() {
        let security = SecuritySettings::default();

        #[cfg(debug_assertions)]
        assert!(!security.secure_cookies);

        #[cfg(not(debug_assertions))]
        assert!(security.secure_cookies);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = WorkshopsConfig::load()?;
            assert_eq!(config.server.port, 3000);
            Ok(())
        });
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                port = 8080

                [database]
                url = "sqlite::memory:"
                "#,
            )?;

            let config = WorkshopsConfig::load()?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.database.url, "sqlite::memory:");
            assert_eq!(config.database.max_connections, 5);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[server]\nport = 8080\n")?;
            jail.set_env("WORKSHOPS_SERVER__PORT", "9090");
            jail.set_env("WORKSHOPS_SECURITY__SESSION_COOKIE", "sid");

            let config = WorkshopsConfig::load_from("custom.toml")?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.security.session_cookie, "sid");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[server]\nport = \"not a number\"\n")?;
            assert!(WorkshopsConfig::load().is_err());
            Ok(())
        });
    }
}
