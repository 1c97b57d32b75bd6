//! Health endpoints
//!
//! `/health` answers as long as the process serves requests. `/health/ready`
//! also checks the database.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Readiness report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Readiness {
    /// `ready` or `unavailable`
    pub status: &'static str,
    /// `ok` or `unreachable`
    pub database: &'static str,
}

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: `200` when the database answers, `503` otherwise
pub async fn readiness(State(state): State<AppState>) -> Response {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => Json(Readiness {
            status: "ready",
            database: "ok",
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    status: "unavailable",
                    database: "unreachable",
                }),
            )
                .into_response()
        }
    }
}
