//! Configuration types and loading
//!
//! Layering order: built-in defaults, then an optional TOML file, then
//! `ISSUETRACK_*` environment variables. The merged result is validated before
//! it is handed out.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::{ItError, ValidationErrors};

/// Main client configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ClientConfig {
    /// REST API configuration
    #[validate]
    pub api: ApiConfig,

    /// Session storage configuration
    pub session: SessionConfig,

    /// Terminal display configuration
    pub display: DisplayConfig,
}

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct ApiConfig {
    /// Base URL of the tracker API (e.g., "https://tracker.example.com")
    #[validate(url(message = "is not a valid URL"))]
    pub base_url: String,
    /// Per-request timeout
    #[validate(range(min = 1, max = 600, message = "must be between 1 and 600 seconds"))]
    pub timeout_seconds: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// API token; overrides the stored session when set
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Where the login session is persisted
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Emit ANSI colors for badges
    pub color: bool,
    /// chrono format string for timestamps
    pub timestamp_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                timeout_seconds: 30,
                user_agent: format!("issuetrack/{}", env!("CARGO_PKG_VERSION")),
                token: None,
            },
            session: SessionConfig {
                path: default_session_path(),
            },
            display: DisplayConfig {
                color: true,
                timestamp_format: "%d %b %H:%M".to_string(),
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Config file error: {0}")]
    FileError(String),
    #[error("Invalid configuration: {0}")]
    Invalid(ValidationErrors),
}

impl From<ConfigError> for ItError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(errors) => ItError::Validation(errors),
            other => ItError::Config(other.to_string()),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from an optional TOML file, then the environment
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = ::config::Config::try_from(&Self::default())
            .map_err(|e| ConfigError::FileError(e.to_string()))?;

        let mut builder = ::config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }

        let mut config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::FileError(e.to_string()))?;

        config.apply_env()?;
        config.check()?;
        Ok(config)
    }

    /// Apply `ISSUETRACK_*` environment overrides
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var("ISSUETRACK_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(token) = std::env::var("ISSUETRACK_API_TOKEN") {
            if !token.trim().is_empty() {
                self.api.token = Some(token.trim().to_string());
            }
        }
        if let Ok(timeout) = std::env::var("ISSUETRACK_TIMEOUT_SECONDS") {
            self.api.timeout_seconds =
                timeout.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ISSUETRACK_TIMEOUT_SECONDS".to_string(),
                    message: format!("expected a number of seconds, got {:?}", timeout),
                })?;
        }
        if let Ok(path) = std::env::var("ISSUETRACK_SESSION_FILE") {
            self.session.path = PathBuf::from(path);
        }
        if let Ok(v) = std::env::var("ISSUETRACK_COLOR") {
            self.display.color = parse_bool(&v);
        }
        if std::env::var_os("NO_COLOR").is_some() {
            self.display.color = false;
        }
        Ok(())
    }

    /// Validate the merged configuration
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(ValidationErrors::from(e)))
    }

    /// Parsed API base URL
    pub fn base_url(&self) -> Result<url::Url, ItError> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| ItError::Config(format!("invalid base URL {}: {}", self.api.base_url, e)))
    }

    /// Request timeout as a std duration
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.timeout_seconds)
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// `$HOME/.issuetrack/session.json`, or a relative path when HOME is unset
fn default_session_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".issuetrack")
        .join("session.json")
}
