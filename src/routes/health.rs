use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

/// Register health check routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// `GET /health` — process liveness plus store reachability.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.db.as_ref() {
        Some(db) => match db.ping().await {
            Ok(()) => "connected",
            Err(err) => {
                tracing::warn!("Database ping failed: {err}");
                "disconnected"
            }
        },
        None => "unconfigured",
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
