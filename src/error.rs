use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified application error type that maps to JSON HTTP responses.
///
/// Body format: `{ "error": "<message>", "code": "<CODE>" }`. The `error` field stays a plain
/// string so existing lobby clients keep working; `code` is the machine-readable kind.
#[derive(Debug)]
pub enum AppError {
    /// 500 — the store connection string is not configured
    Misconfigured(String),
    /// 400 — the lobby already holds its maximum number of online players
    LobbyFull { capacity: u64 },
    /// 400 — malformed body or missing required fields
    Validation(String),
    /// 404
    NotFound(String),
    /// 405
    MethodNotAllowed,
    /// 500 — wraps any other error; its text is surfaced to the caller
    Internal(anyhow::Error),
}

impl AppError {
    /// HTTP status for this error kind.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Misconfigured(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::LobbyFull { .. } | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Misconfigured(_) => "CONFIG_ERROR",
            Self::LobbyFull { .. } => "LOBBY_FULL",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Human-readable message placed in the `error` field.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Misconfigured(msg) | Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
            Self::LobbyFull { capacity } => {
                format!("Lobby is full (maximum {capacity} players)")
            }
            Self::MethodNotAllowed => "Method not allowed".to_string(),
            Self::Internal(err) => err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(err) => tracing::error!("Internal server error: {err:#}"),
            Self::Misconfigured(msg) => tracing::error!("Configuration error: {msg}"),
            _ => tracing::debug!(code = self.code(), "Request rejected"),
        }

        (
            self.status(),
            Json(json!({
                "error": self.message(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}

/// Allow `?` to automatically convert any `anyhow::Error` (and `DbErr`) into `AppError::Internal`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_full_is_bad_request() {
        let err = AppError::LobbyFull { capacity: 10 };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "LOBBY_FULL");
        assert!(err.message().contains("10"));
    }

    #[test]
    fn test_method_not_allowed_message() {
        let err = AppError::MethodNotAllowed;
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.message(), "Method not allowed");
    }

    #[test]
    fn test_internal_surfaces_raw_text() {
        let err = AppError::from(sea_orm::DbErr::Custom("connection refused".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert!(err.message().contains("connection refused"));
    }

    #[test]
    fn test_misconfigured_is_server_error() {
        let err = AppError::Misconfigured("Database not configured".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
