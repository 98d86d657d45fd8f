use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

/// Open the lobby store.
///
/// Requests never share a connection: each one checks out its own session through
/// [`crate::state::AppState::begin`], and the pool only bounds how many are open at once.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    Ok(db)
}
