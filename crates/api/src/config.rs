use storyreel_client::config::{optional_var, parse_var, ClientConfig};
use storyreel_client::error::ConfigError;

/// Gateway configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Without
/// `API_BASE_URL` the gateway serves an in-memory backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upstream backend to proxy to; `None` serves the in-memory backend.
    pub upstream: Option<ClientConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `API_BASE_URL`         | unset (in-memory backend)  |
    /// | `ADMIN_API_TOKEN`      | unset                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = optional_var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", 3000, "a valid u16")?;

        let cors_origins = parse_origins(
            &optional_var("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", 30, "a valid u64")?;

        let upstream = match optional_var("API_BASE_URL") {
            Some(_) => Some(ClientConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upstream,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
