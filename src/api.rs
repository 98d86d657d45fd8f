use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::{HeaderName, Method, Request, header};
use axum::response::Response;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::routes::{self, lobby::SESSION_HEADER};
use crate::{db, state::AppState};

/// How long browsers may cache the preflight answer.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

pub struct Api;

impl Api {
    /// Initialize and launch the API server
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, migrations fail, or the listener
    /// cannot be bound.
    pub async fn launch() -> anyhow::Result<()> {
        let config = Config::from_env()?;

        Self::init_tracing(&config);

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = ?config.environment,
            "Starting lobby API"
        );

        let db = Self::connect_database(&config).await?;

        if config.run_migrations
            && let Some(db) = db.as_ref()
        {
            Self::run_migrations(db).await?;
        }

        let state = AppState {
            db,
            config: config.clone(),
        };

        let app = Self::build_router(state);

        Self::start_server(app, &config).await
    }

    /// Initialize tracing subscriber for structured logging
    fn init_tracing(config: &Config) {
        let env_filter =
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("lobby_api={},tower_http=info,sea_orm=warn", config.log_level).into()
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Connect to the database, if one is configured.
    ///
    /// A missing connection string is not fatal here: the server still starts and every
    /// store-backed request reports the misconfiguration.
    async fn connect_database(config: &Config) -> anyhow::Result<Option<DatabaseConnection>> {
        let Some(url) = config.database_url.as_deref() else {
            tracing::error!("DATABASE_URL is not set; lobby requests will fail until it is");
            return Ok(None);
        };

        tracing::info!("Connecting to database...");
        let db = db::connect(url)
            .await
            .context("Failed to connect to database")?;
        tracing::info!("Database connection established");

        Ok(Some(db))
    }

    /// Run database migrations
    async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");
        Migrator::up(db, None)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Build the Axum router with all routes and middleware.
    ///
    /// CORS is fully permissive: every response carries `Access-Control-Allow-Origin: *`
    /// and any `OPTIONS` request is answered here without reaching a handler.
    pub fn build_router(state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static(SESSION_HEADER),
            ])
            .max_age(PREFLIGHT_MAX_AGE);

        let trace = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    status_code = tracing::field::Empty,
                )
            })
            .on_response(|response: &Response, latency: Duration, span: &Span| {
                span.record("status_code", response.status().as_u16());
                tracing::info!(latency_ms = latency.as_millis(), "response");
            });

        routes::router().with_state(state).layer(cors).layer(trace)
    }

    /// Start the HTTP server
    async fn start_server(app: Router, config: &Config) -> anyhow::Result<()> {
        let addr = config.socket_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;
        tracing::info!(%addr, "Server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .context("Server error")?;

        Ok(())
    }

    /// Wait for shutdown signal (Ctrl+C or SIGTERM)
    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .map_err(|e| tracing::error!("Failed to install Ctrl+C handler: {e}"))
                .ok();
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::error!("Failed to install signal handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {
                tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
            },
            () = terminate => {
                tracing::info!("Received terminate signal, shutting down gracefully...");
            },
        }
    }
}
