#![deny(unsafe_code)]

//! Configuration loading and validation for FrostLink.
//!
//! Loads TOML configuration files and validates them against expected
//! schemas. Provides the [`AppConfig`] type as the central configuration
//! structure: connection parameters for the appliance, credential source,
//! and logging sinks.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Appliance connection parameters.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Credential source configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection parameters for the control appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Hostname or IP address of the appliance.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTPS port of the appliance API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Session capability mode: "admin", "operator", "lead", "follow",
    /// or "unauthenticated".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Number of measurement channels the device exposes.
    #[serde(default = "default_geometry")]
    pub num_channels: u16,

    /// Number of heaters the device exposes.
    #[serde(default = "default_geometry")]
    pub num_heaters: u16,

    /// Optional per-request timeout in seconds (0 = block indefinitely).
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mode: default_mode(),
            num_channels: default_geometry(),
            num_heaters: default_geometry(),
            timeout_secs: 0,
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    49098
}

fn default_mode() -> String {
    "unauthenticated".to_string()
}

fn default_geometry() -> u16 {
    12
}

/// Credential source configuration.
///
/// The API key can be defined inline, loaded from an environment
/// variable, or loaded from a file. `source = "none"` requests an
/// unauthenticated session.
///
/// ## TOML Example
///
/// ```toml
/// [auth]
/// source = "env"
/// env_var = "FROSTLINK_API_KEY"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Source of the API key: "inline", "env", "file", or "none".
    #[serde(default = "default_auth_source")]
    pub source: String,

    /// Inline key value (when source = "inline"). Avoid in production.
    #[serde(default)]
    pub value: Option<String>,

    /// Environment variable to read from (when source = "env").
    /// Defaults to `FROSTLINK_API_KEY`.
    #[serde(default)]
    pub env_var: Option<String>,

    /// File path to read from (when source = "file").
    #[serde(default)]
    pub file_path: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            source: default_auth_source(),
            value: None,
            env_var: None,
            file_path: None,
        }
    }
}

fn default_auth_source() -> String {
    "none".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rotated log files.
    #[serde(default = "default_log_dir")]
    pub dir: String,

    /// File rotation cadence: "daily", "hourly", or "never".
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "connection.host must not be blank".to_string(),
            ));
        }
        if self.connection.port == 0 {
            return Err(ConfigError::Validation(
                "connection.port must be non-zero".to_string(),
            ));
        }
        let valid_modes = ["admin", "operator", "lead", "follow", "unauthenticated"];
        if !valid_modes.contains(&self.connection.mode.as_str()) {
            return Err(ConfigError::Validation(format!(
                "connection.mode must be one of {:?}, got {:?}",
                valid_modes, self.connection.mode
            )));
        }
        if self.connection.num_channels == 0 {
            return Err(ConfigError::Validation(
                "connection.num_channels must be at least 1".to_string(),
            ));
        }
        if self.connection.num_heaters == 0 {
            return Err(ConfigError::Validation(
                "connection.num_heaters must be at least 1".to_string(),
            ));
        }

        let valid_sources = ["inline", "env", "file", "none"];
        if !valid_sources.contains(&self.auth.source.as_str()) {
            return Err(ConfigError::Validation(format!(
                "auth.source must be one of {:?}, got {:?}",
                valid_sources, self.auth.source
            )));
        }
        if self.auth.source == "inline" && self.auth.value.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Validation(
                "auth.value is required when auth.source is \"inline\"".to_string(),
            ));
        }
        if self.auth.source == "file" && self.auth.file_path.is_none() {
            return Err(ConfigError::Validation(
                "auth.file_path is required when auth.source is \"file\"".to_string(),
            ));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.logging.rotation.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.rotation must be one of {:?}, got {:?}",
                valid_rotations, self.logging.rotation
            )));
        }

        Ok(())
    }
}
