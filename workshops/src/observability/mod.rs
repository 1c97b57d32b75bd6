//! Observability (logging and tracing)
//!
//! Structured logging through `tracing`, pretty-printed in debug builds and
//! JSON in release builds. HTTP request spans come from `tower-http`'s
//! `TraceLayer`, installed by [`crate::app::router`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber
///
/// Honors `RUST_LOG`; otherwise logs `debug` (with `workshops=trace`) in debug
/// builds and `info` in release builds.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use workshops::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
pub fn init() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    #[cfg(debug_assertions)]
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .try_init()?;

    #[cfg(not(debug_assertions))]
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;

    Ok(())
}

fn default_filter() -> EnvFilter {
    if cfg!(debug_assertions) {
        EnvFilter::new("debug,workshops=trace,sqlx=warn")
    } else {
        EnvFilter::new("info,sqlx=warn")
    }
}

/// Observability settings carried in application state
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to log output
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new("workshops")
    }
}

impl ObservabilityConfig {
    /// Create a config for `service_name`
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}
