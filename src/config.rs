//! Service configuration.
//!
//! Settings live in a TOML file at:
//! - Linux: ~/.config/codesentry/config.toml
//! - macOS: ~/Library/Application Support/codesentry/config.toml
//! - Windows: %APPDATA%\codesentry\config.toml
//!
//! A missing file yields the defaults. The generative API credential is not
//! stored here; see [`crate::credentials`].

use crate::error::{CodeSentryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Service name presented in the relay handshake
pub const SERVICE_NAME: &str = "AIAnalyzer";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SentryConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,

    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// WebSocket URL of the relay
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// Serve the front end from this directory instead of the embedded copy
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_gateway_host() -> String {
    "0.0.0.0".to_string()
}

fn default_gateway_port() -> u16 {
    8081
}

fn default_relay_url() -> String {
    "ws://127.0.0.1:1099".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            relay_url: default_relay_url(),
            static_dir: None,
        }
    }
}

/// Relay daemon settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_host")]
    pub host: String,

    #[serde(default = "default_relay_port")]
    pub port: u16,

    /// Property file holding `google.ai.api.key`
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

fn default_relay_host() -> String {
    "127.0.0.1".to_string()
}

fn default_relay_port() -> u16 {
    1099
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("config.properties")
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_relay_host(),
            port: default_relay_port(),
            credentials_file: default_credentials_file(),
        }
    }
}

/// Generative API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout; unset means the HTTP client default (none)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SentryConfig {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("codesentry").join("config.toml"))
    }

    /// Load configuration from an explicit path, or the default path when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) => Self::load_from(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| CodeSentryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| CodeSentryError::ConfigError {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !["error", "warn", "info", "debug", "trace"].contains(&self.logging.level.as_str()) {
            return Err(CodeSentryError::ConfigError {
                message: format!(
                    "Invalid log level: {}. Must be one of: error, warn, info, debug, trace",
                    self.logging.level
                ),
            });
        }
        validate_relay_url(&self.gateway.relay_url)
    }
}

/// Relay URLs come from the config file or a flag; both must be WebSocket URLs.
pub fn validate_relay_url(url: &str) -> Result<()> {
    if !url.starts_with("ws://") && !url.starts_with("wss://") {
        return Err(CodeSentryError::ConfigError {
            message: format!("Relay URL must use ws:// or wss://: {}", url),
        });
    }
    Ok(())
}
