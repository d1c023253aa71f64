//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STUDY_HELPER_HOST` - Bind address (default: 127.0.0.1)
//! - `STUDY_HELPER_PORT` - Listen port (default: 5000)
//! - `STUDY_HELPER_SEED_DEMO` - Load demo accounts and questions at startup (default: true)
//! - `STUDY_HELPER_ALLOW_DEMO_IDENTITY` - Act as the first account when a request
//!   carries no `x-identity-uid` header (default: true)
//! - `STUDY_HELPER_CORS_ORIGINS` - Comma-separated list of allowed browser origins
//! - `STUDY_HELPER_STATIC_DIR` - Directory of built client assets to serve
//! - `STUDY_HELPER_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (default: development)
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Seed the store with demo data at startup
    pub seed_demo: bool,
    /// Fall back to the first account when no identity header is sent
    pub allow_demo_identity: bool,
    /// Browser origins allowed by CORS; empty disables the CORS layer
    pub cors_origins: Vec<String>,
    /// Built client assets, served for any path the API does not handle
    pub static_dir: Option<PathBuf>,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry DSN; `None` disables reporting
    pub dsn: Option<String>,
    /// Environment tag attached to events
    pub environment: String,
    /// Fraction of errors sent
    pub sample_rate: f32,
    /// Fraction of transactions traced
    pub traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            seed_demo: true,
            allow_demo_identity: true,
            cors_origins: Vec::new(),
            static_dir: None,
            log_format: LogFormat::Text,
            sentry: SentryConfig::default(),
        }
    }
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: "development".to_string(),
            sample_rate: 1.0,
            traces_sample_rate: 0.1,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that does not
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that does not
    /// parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);
        let defaults = Self::default();

        Ok(Self {
            host: env.parse_or("STUDY_HELPER_HOST", defaults.host)?,
            port: env.parse_or("STUDY_HELPER_PORT", defaults.port)?,
            seed_demo: env.flag_or("STUDY_HELPER_SEED_DEMO", defaults.seed_demo)?,
            allow_demo_identity: env
                .flag_or("STUDY_HELPER_ALLOW_DEMO_IDENTITY", defaults.allow_demo_identity)?,
            cors_origins: env
                .get("STUDY_HELPER_CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            static_dir: env.get("STUDY_HELPER_STATIC_DIR").map(PathBuf::from),
            log_format: env.parse_or("STUDY_HELPER_LOG_FORMAT", defaults.log_format)?,
            sentry: SentryConfig {
                dsn: env.get("SENTRY_DSN"),
                environment: env
                    .get("SENTRY_ENVIRONMENT")
                    .unwrap_or(defaults.sentry.environment),
                sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", defaults.sentry.sample_rate)?,
                traces_sample_rate: env
                    .parse_or("SENTRY_TRACES_SAMPLE_RATE", defaults.sentry.traces_sample_rate)?,
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a variable, treating blank values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        self.get(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).
    fn flag_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{raw}'"),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert!(config.seed_demo);
        assert!(config.allow_demo_identity);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.static_dir, None);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.sentry.dsn, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STUDY_HELPER_HOST", "0.0.0.0"),
            ("STUDY_HELPER_PORT", "8080"),
            ("STUDY_HELPER_SEED_DEMO", "no"),
            ("STUDY_HELPER_ALLOW_DEMO_IDENTITY", "0"),
            ("STUDY_HELPER_CORS_ORIGINS", "http://localhost:5173, https://app.example.com,"),
            ("STUDY_HELPER_STATIC_DIR", "dist/public"),
            ("STUDY_HELPER_LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(!config.seed_demo);
        assert!(!config.allow_demo_identity);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
        assert_eq!(config.static_dir, Some(PathBuf::from("dist/public")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STUDY_HELPER_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("STUDY_HELPER_PORT"));
    }

    #[test]
    fn test_invalid_flag() {
        assert!(load(&[("STUDY_HELPER_SEED_DEMO", "maybe")]).is_err());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[("SENTRY_DSN", "  "), ("STUDY_HELPER_PORT", "")]).unwrap();
        assert_eq!(config.sentry.dsn, None);
        assert_eq!(config.port, 5000);
    }
}
