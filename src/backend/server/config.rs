/**
 * Server Configuration
 *
 * Loads server settings from the environment and opens the optional
 * PostgreSQL pool.
 *
 * # Environment Variables
 *
 * - `SERVER_PORT` - listen port (default 3000)
 * - `DATABASE_URL` - PostgreSQL URL, required in production. When absent the
 *   server runs in development mode: annotations live in memory
 *   and database-only routes answer 503
 * - `CORS_ORIGIN` - allowed origin; any origin when unset
 * - `STATIC_DIR` - built frontend directory (default `frontend/build`)
 *
 * `JWT_SECRET` is read by `auth::sessions`.
 */

use std::net::SocketAddr;
use std::path::PathBuf;

use sqlx::PgPool;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "frontend/build";

/// Invalid configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_PORT '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub cors_origin: Option<String>,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            cors_origin: None,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Read settings from environment variables
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match non_empty_var("SERVER_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            database_url: non_empty_var("DATABASE_URL"),
            cors_origin: non_empty_var("CORS_ORIGIN"),
            static_dir: non_empty_var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    /// Address to bind on all interfaces
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Connect to PostgreSQL and apply migrations
///
/// Returns `None` when no URL is configured or the connection fails; the
/// server then runs without database features.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Database features will be disabled.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
