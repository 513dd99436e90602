//! Environment-driven configuration shared by the client and the gateway.

use std::str::FromStr;

use crate::error::ConfigError;

/// Connection settings for the upstream story backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Bearer token sent on every request when set.
    pub admin_token: Option<String>,
    /// Per-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default  |
    /// |------------------------|----------|
    /// | `API_BASE_URL`         | required |
    /// | `ADMIN_API_TOKEN`      | unset    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`     |
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = optional_var("API_BASE_URL").ok_or(ConfigError::Missing {
            name: "API_BASE_URL",
        })?;

        Ok(Self {
            base_url,
            admin_token: optional_var("ADMIN_API_TOKEN"),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 30, "a valid u64")?,
        })
    }
}

/// Read a variable, treating empty values as unset.
pub fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable, falling back to `default` when unset.
pub fn parse_var<T: FromStr>(
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match optional_var(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_uses_default() {
        let value: u64 = parse_var("STORYREEL_TEST_UNSET_VARIABLE", 7, "a valid u64").unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn invalid_error_names_variable_and_value() {
        let err = ConfigError::Invalid {
            name: "PORT",
            expected: "a valid u16",
            value: "abc".into(),
        };
        assert_eq!(err.to_string(), "PORT must be a valid u16, got 'abc'");
    }
}
