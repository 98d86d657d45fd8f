use std::net::{IpAddr, SocketAddr};

/// Application configuration, built once at startup and carried in `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string for the lobby store. `None` keeps the server up but
    /// every store-backed request answers with a configuration error.
    pub database_url: Option<String>,
    pub server_host: IpAddr,
    pub server_port: u16,
    pub environment: Environment,
    pub log_level: String,
    /// Apply the bundled migrations before serving.
    pub run_migrations: bool,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// Optional with defaults: `DATABASE_URL`, `SERVER_HOST`, `SERVER_PORT` / `PORT`,
    /// `ENVIRONMENT`, `LOG_LEVEL`, `RUN_MIGRATIONS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `SERVER_HOST` / `SERVER_PORT` contain invalid values.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if the host or port values cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let environment = match lookup("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        // Hosting platforms provide PORT; fall back to SERVER_PORT, then 3000
        let server_port = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("SERVER_PORT / PORT must be a valid u16"))?;

        let default_host = if environment == Environment::Production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let server_host = lookup("SERVER_HOST")
            .unwrap_or_else(|| default_host.to_string())
            .parse::<IpAddr>()
            .map_err(|_| anyhow::anyhow!("SERVER_HOST must be a valid IP address"))?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let run_migrations = lookup("RUN_MIGRATIONS")
            .is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            database_url,
            server_host,
            server_port,
            environment,
            log_level,
            run_migrations,
        })
    }

    /// Build the socket address for the server to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }
}
