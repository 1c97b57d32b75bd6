//! Router assembly and server startup

use crate::error::WorkshopsError;
use crate::handlers::{self, auth, health, workshops};
use crate::middleware::{SessionConfig, SessionLayer};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// How often expired sessions are swept from the store
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Build the application router
///
/// Page routes run inside the session layer; health probes and the 404
/// fallback do not.
///
/// ```rust,no_run
/// use workshops::{app, config::WorkshopsConfig, state::AppState};
///
/// # async fn example() -> anyhow::Result<()> {
/// let state = AppState::connect(WorkshopsConfig::load()?).await?;
/// let router = app::router(state);
/// # Ok(())
/// # }
/// ```
pub fn router(state: AppState) -> Router {
    let config = state.config();
    let sessions = SessionLayer::new(
        state.sessions().clone(),
        SessionConfig::from(&config.security),
    );
    let body_limit = RequestBodyLimitLayer::new(config.server.body_limit_bytes);

    Router::new()
        .route("/", get(workshops::index))
        .route("/workshops/{id}", get(workshops::show))
        .route(
            "/workshops/{id}/edit",
            get(workshops::edit).post(workshops::update),
        )
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(sessions)
        // Probes and unknown paths never open a session
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .fallback(handlers::not_found)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C
///
/// Expired sessions are swept every [`SESSION_SWEEP_INTERVAL`] while the
/// server runs.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState) -> Result<(), WorkshopsError> {
    let addr = state.config().bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let sessions = state.sessions().clone();
    let sweeper = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.purge_expired();
            if removed > 0 {
                tracing::debug!(removed, "expired sessions purged");
            }
        }
    });

    tracing::info!("Starting server on {}", addr);

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();

    Ok(result?)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
