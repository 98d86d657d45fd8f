pub mod health;
pub mod lobby;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET | POST | DELETE /` — the lobby (state, actions, leave)
/// - `GET /health` — liveness with store connectivity
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(lobby::router())
        .merge(health::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found.".to_string())
}
