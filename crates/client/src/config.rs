//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FAMIGO_API_BASE_URL` - Base URL of the Famigo backend (the `/api`
//!   prefix is appended by the client)
//!
//! ## Optional
//! - `FAMIGO_API_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `FAMIGO_DATA_DIR` - Directory for durable local state (default: `.famigo`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default HTTP timeout, matching the original client's 30-second limit.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Famigo client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Remote API configuration.
    pub api: ApiConfig,
    /// Directory holding durable local state.
    pub data_dir: PathBuf,
}

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend base URL, without the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("FAMIGO_API_BASE_URL")?;
        let timeout_secs = get_env_or_default(
            "FAMIGO_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("FAMIGO_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        let data_dir = PathBuf::from(get_env_or_default("FAMIGO_DATA_DIR", ".famigo"));

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            data_dir,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ApiConfig {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        assert_eq!(config.timeout.as_secs(), 30);
    }

    #[test]
    fn test_missing_env_var_error_display() {
        let err = ConfigError::MissingEnvVar("FAMIGO_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: FAMIGO_API_BASE_URL"
        );
    }
}
