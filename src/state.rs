use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::config::Config;
use crate::error::AppError;

/// Shared application state available to all request handlers via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// `None` when no connection string was configured.
    pub db: Option<DatabaseConnection>,
    pub config: Config,
}

impl AppState {
    /// Open the request-scoped store session.
    ///
    /// The returned transaction owns one connection until it is committed or dropped; dropping
    /// it on an early return or error rolls back and releases the connection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Misconfigured`] when no store is configured, or
    /// [`AppError::Internal`] if a session cannot be opened.
    pub async fn begin(&self) -> Result<DatabaseTransaction, AppError> {
        let db = self
            .db
            .as_ref()
            .ok_or_else(|| AppError::Misconfigured("Database not configured".to_string()))?;
        Ok(db.begin().await?)
    }
}
