//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with defaults that
//! suit local development. A `.env` file in the working directory is read
//! first if present.
//!
//! | Variable                | Default             | Meaning                                  |
//! |-------------------------|---------------------|------------------------------------------|
//! | `HOST`                  | `0.0.0.0`           | Bind address                             |
//! | `PORT`                  | `3000`              | Bind port                                |
//! | `API_KEY`               | `change-me-api-key` | Key required on every `/api` route       |
//! | `APP_ENV`               | `development`       | `production` hides stack traces          |
//! | `CORS_ALLOWED_ORIGINS`  | `*`                 | Comma-separated origins                  |
//! | `MAX_REQUEST_BODY_SIZE` | `1048576`           | Body limit in bytes                      |
//! | `SEED_SAMPLE_DATA`      | `true`              | Start with three demo products           |
//! | `METRICS_PORT`          | `0`                 | Prometheus listener port, `0` = disabled |
//! | `RUST_LOG`              | `info`              | Log filter                               |

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Placeholder API key used when `API_KEY` is not set.
pub const DEFAULT_API_KEY: &str = "change-me-api-key";

/// Log filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the log filter from `RUST_LOG`, reading `.env` first.
///
/// Called before the subscriber is installed, so it cannot depend on a loaded
/// [`Config`].
pub fn log_filter() -> EnvFilter {
    let _ = dotenvy::dotenv();
    log_filter_from(env::var("RUST_LOG").ok().as_deref())
}

fn log_filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Errors raised while loading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ConfigError {
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Error bodies include diagnostic traces.
    #[default]
    Development,
    /// Error bodies carry only the message.
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => Err(format!(
                "expected 'production' or 'development', got '{other}'"
            )),
        }
    }
}

/// Application configuration.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    /// Maximum request body size in bytes (default: 1MB)
    pub max_request_body_size: usize,

    /// Comma-separated list of allowed CORS origins, `*` for any
    pub cors_allowed_origins: Vec<String>,

    // =========================================================================
    // Security Configuration
    // =========================================================================
    /// Shared secret expected in `x-api-key` (or `authorization`) on `/api` routes
    pub api_key: String,

    /// Deployment mode; controls stack traces in error bodies
    pub environment: Environment,

    // =========================================================================
    // Data & Observability Configuration
    // =========================================================================
    /// Whether to start with the demo catalog
    pub seed_sample_data: bool,

    /// Port for Prometheus metrics endpoint (0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,
            max_request_body_size: Self::parse_env("MAX_REQUEST_BODY_SIZE", 1024 * 1024)?,
            cors_allowed_origins: Self::parse_cors_origins(),

            api_key: env::var("API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string()),
            environment: Self::parse_env("APP_ENV", Environment::Development)?,

            seed_sample_data: Self::parse_env("SEED_SAMPLE_DATA", true)?,
            metrics_port: Self::parse_env("METRICS_PORT", 0)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API key is blank or the body limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::invalid("API_KEY", "must not be empty"));
        }

        if self.max_request_body_size == 0 {
            return Err(ConfigError::invalid(
                "MAX_REQUEST_BODY_SIZE",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Whether the API key is still the built-in placeholder.
    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address, `None` when disabled.
    pub fn metrics_addr(&self) -> Option<std::net::SocketAddr> {
        self.metrics_enabled()
            .then(|| std::net::SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(name, e.to_string())),
            Err(_) => Ok(default),
        }
    }

    /// Parse CORS allowed origins from environment variable.
    fn parse_cors_origins() -> Vec<String> {
        env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_body_size: 1024 * 1024,
            cors_allowed_origins: vec!["*".to_string()],
            api_key: DEFAULT_API_KEY.to_string(),
            environment: Environment::Development,
            seed_sample_data: true,
            metrics_port: 0,
        }
    }
}
