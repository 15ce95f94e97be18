/// Configuration management for the API server
///
/// Configuration comes from environment variables, with a `.env` file
/// loaded first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `APP_ENV`: `production` marks the session cookie `Secure` (default: development)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `STATIC_DIR`: Built front-end served for non-API paths (optional)
/// - `SNAPSHOT_MAX_BYTES`: Body limit of `POST /api/snapshot` (default: 64 MiB)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `AUTH_SECRET`: Session signing key, at least 32 bytes (required)
/// - `SESSION_TTL`: Session lifetime such as `7d` or `12 hours` (default: 7d)
///
/// # Example
///
/// ```no_run
/// use overview_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::{env, path::PathBuf};

use chrono::Duration;
use overview_shared::{
    auth::session::{parse_ttl, SessionSecret, DEFAULT_SESSION_TTL},
    db::pool::DatabaseConfig,
};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database pool configuration
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode (Secure cookies)
    pub production: bool,

    /// Allowed CORS origins; `*` means permissive
    pub cors_origins: Vec<String>,

    /// Directory of static front-end assets
    pub static_dir: Option<PathBuf>,

    /// Largest accepted snapshot import body, in bytes
    pub snapshot_max_bytes: usize,
}

/// Default snapshot import limit
pub const DEFAULT_SNAPSHOT_MAX_BYTES: usize = 64 * 1024 * 1024;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Signing secret
    pub secret: SessionSecret,

    /// Token and cookie lifetime
    pub ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value does not
    /// parse, or `AUTH_SECRET` is shorter than 32 bytes.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_port = var_or("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let production = var_or("APP_ENV", "development").eq_ignore_ascii_case("production");

        let cors_origins = var_or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let snapshot_max_bytes = match lookup("SNAPSHOT_MAX_BYTES") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or_else(|| anyhow::anyhow!("SNAPSHOT_MAX_BYTES is invalid: '{}'", value))?,
            None => DEFAULT_SNAPSHOT_MAX_BYTES,
        };

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let secret = lookup("AUTH_SECRET")
            .ok_or_else(|| anyhow::anyhow!("AUTH_SECRET environment variable is required"))?;
        let secret = SessionSecret::new(secret)?;

        let ttl = parse_ttl(&var_or("SESSION_TTL", DEFAULT_SESSION_TTL))?;

        Ok(Self {
            api: ApiConfig {
                host: var_or("API_HOST", "0.0.0.0"),
                port: api_port,
                production,
                cors_origins,
                static_dir,
                snapshot_max_bytes,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                ..Default::default()
            },
            session: SessionConfig { secret, ttl },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
