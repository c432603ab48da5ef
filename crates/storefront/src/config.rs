//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ISHOP_API_ORIGIN` - Origin of the backend, e.g. `https://ishop.ir`
//!
//! ## Optional
//! - `ISHOP_API_BASE` - Path prefix of the REST API (default: `/api/v1`)
//! - `ISHOP_DATA_DIR` - Directory holding the cart and auth token (default: `.ishop`)
//! - `ISHOP_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE: &str = "/api/v1";
const DEFAULT_DATA_DIR: &str = ".ishop";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "15";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend origin (scheme, host and optional port)
    pub api_origin: Url,
    /// Path prefix of the REST API
    pub api_base: String,
    /// Directory for persisted state
    pub data_dir: PathBuf,
    /// Timeout applied to every HTTP request
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or any value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_origin = parse_origin("ISHOP_API_ORIGIN", &get_required_env("ISHOP_API_ORIGIN")?)?;
        let api_base = normalize_base(&get_env_or_default("ISHOP_API_BASE", DEFAULT_API_BASE));
        let data_dir = PathBuf::from(get_env_or_default("ISHOP_DATA_DIR", DEFAULT_DATA_DIR));
        let http_timeout = get_env_or_default("ISHOP_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ISHOP_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_origin,
            api_base,
            data_dir,
            http_timeout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at `origin` with every other setting defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `origin` is not an absolute
    /// http(s) URL.
    pub fn for_origin(origin: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_origin: parse_origin("ISHOP_API_ORIGIN", origin)?,
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: Duration::from_secs(15),
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    /// Full base URL of the REST API, without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!(
            "{}{}",
            self.api_origin.as_str().trim_end_matches('/'),
            self.api_base
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an http(s) origin.
fn parse_origin(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "missing host".to_string(),
        ));
    }

    Ok(url)
}

/// Ensure the API base starts with `/` and has no trailing slash.
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("/api/v1"), "/api/v1");
        assert_eq!(normalize_base("api/v1/"), "/api/v1");
        assert_eq!(normalize_base("/"), "");
        assert_eq!(normalize_base(""), "");
    }

    #[test]
    fn test_parse_origin_rejects_other_schemes() {
        let err = parse_origin("ISHOP_API_ORIGIN", "ftp://ishop.ir").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(parse_origin("ISHOP_API_ORIGIN", "not a url").is_err());
    }

    #[test]
    fn test_api_url() {
        let config = StorefrontConfig::for_origin("https://ishop.ir/").unwrap();
        assert_eq!(config.api_url(), "https://ishop.ir/api/v1");

        let mut config = StorefrontConfig::for_origin("http://127.0.0.1:8000").unwrap();
        config.api_base = normalize_base("");
        assert_eq!(config.api_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::for_origin("http://localhost:8000").unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".ishop"));
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert!(config.sentry_dsn.is_none());
    }
}
