use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::DatabaseTransaction;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{chat_message, player};
use crate::error::AppError;
use crate::services::LobbyService;
use crate::services::lobby_service::{LobbySnapshot, NewPlayer};
use crate::state::AppState;

/// Header carrying the token handed out on join. Header lookup is case-insensitive.
pub const SESSION_HEADER: &str = "x-session-id";

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// The lobby lives on a single path; the method (and for `POST`, the body's
/// `action`) selects the operation. `OPTIONS` is answered by the CORS layer.
/// `HEAD` is rejected explicitly since axum would otherwise serve it from `get`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_lobby)
            .head(method_not_allowed)
            .post(post_action)
            .delete(leave_lobby)
            .fallback(method_not_allowed),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AssignTeamRequest {
    player_id: i32,
    #[serde(default)]
    team_id: Option<i32>,
}

#[derive(Deserialize)]
struct SendMessageRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Serialize)]
struct JoinResponse {
    success: bool,
    player: player::Model,
    session_id: String,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: chat_message::Model,
}

const SUCCESS: SuccessResponse = SuccessResponse { success: true };

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Parse the raw body as a JSON object. An empty body counts as `{}`.
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))
}

/// Deserialize an action's payload; the `action` key itself is ignored.
fn payload<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("Invalid request: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /` — players, lobby state and the last 50 chat messages.
async fn get_lobby(State(state): State<AppState>) -> Result<Json<LobbySnapshot>, AppError> {
    let txn = state.begin().await?;
    let snapshot = LobbyService::snapshot(&txn).await?;
    txn.commit().await?;
    Ok(Json(snapshot))
}

/// `POST /` — dispatch on the body's `action` field.
///
/// A missing or unknown action is answered like an unsupported method.
async fn post_action(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let txn = state.begin().await?;
    let body = parse_body(&body)?;

    let action = body.get("action").and_then(Value::as_str).map(str::to_owned);
    let response = match action.as_deref() {
        Some("join") => join(&txn, payload(body)?).await?,
        Some("assign_team") => assign_team(&txn, payload(body)?).await?,
        Some("send_message") => send_message(&txn, payload(body)?).await?,
        other => {
            tracing::debug!(action = ?other, "Unknown lobby action");
            return Err(AppError::MethodNotAllowed);
        }
    };

    txn.commit().await?;
    Ok(response)
}

async fn join(txn: &DatabaseTransaction, request: NewPlayer) -> Result<Response, AppError> {
    let joined = LobbyService::join(txn, request).await?;
    Ok(Json(JoinResponse {
        success: true,
        player: joined.player,
        session_id: joined.session_id,
    })
    .into_response())
}

async fn assign_team(
    txn: &DatabaseTransaction,
    request: AssignTeamRequest,
) -> Result<Response, AppError> {
    LobbyService::assign_team(txn, request.player_id, request.team_id).await?;
    Ok(Json(SUCCESS).into_response())
}

async fn send_message(
    txn: &DatabaseTransaction,
    request: SendMessageRequest,
) -> Result<Response, AppError> {
    let message = LobbyService::send_message(
        txn,
        request.username.as_deref().unwrap_or_default(),
        request.message.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(MessageResponse {
        success: true,
        message,
    })
    .into_response())
}

/// `DELETE /` — leave the lobby. Always succeeds, with or without a matching token.
async fn leave_lobby(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    let txn = state.begin().await?;

    if let Some(session_id) = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        LobbyService::leave(&txn, session_id).await?;
    }

    txn.commit().await?;
    Ok(Json(SUCCESS))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_object() {
        let parsed = parse_body(b"  \n").unwrap_or_default();
        assert_eq!(parsed, serde_json::json!({}));
    }

    #[test]
    fn test_malformed_body_is_validation_error() {
        let err = parse_body(b"{not json").err();
        assert!(matches!(err, Some(AppError::Validation(_))));
    }

    #[test]
    fn test_assign_team_requires_player_id() {
        let result: Result<AssignTeamRequest, AppError> =
            payload(serde_json::json!({ "action": "assign_team", "team_id": 1 }));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_assign_team_null_team_clears() {
        let request: Result<AssignTeamRequest, AppError> = payload(serde_json::json!({
            "action": "assign_team",
            "player_id": 3,
            "team_id": null,
        }));
        assert!(matches!(
            request,
            Ok(AssignTeamRequest {
                player_id: 3,
                team_id: None
            })
        ));
    }
}
