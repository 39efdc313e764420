//! Configuration file model.
//!
//! ```toml
//! [connection]
//! instance_url = "https://example.church.tools/"
//! user_id = 42
//! token = "..."
//!
//! [runtime]
//! refresh_interval_ms = 5000
//!
//! [logging]
//! level = "info"
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The TOML did not parse.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value failed validation.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote service credentials.
    pub connection: ConnectionConfig,
    /// Runtime loop tuning.
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads, parses and validates a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parses and validates a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()?;
        self.runtime.validate()
    }
}

/// ChurchTools instance and login token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the instance, e.g. `https://example.church.tools/`.
    pub instance_url: String,
    /// Id of the user owning the login token.
    pub user_id: i64,
    /// Personal login token.
    pub token: String,
    /// Per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl ConnectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.instance_url.trim();
        if url.is_empty() {
            return Err(invalid("connection.instance_url", "must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid("connection.instance_url", "must start with http:// or https://"));
        }
        if self.user_id <= 0 {
            return Err(invalid("connection.user_id", "must be a positive user id"));
        }
        if self.token.trim().is_empty() {
            return Err(invalid("connection.token", "must not be empty"));
        }
        Ok(())
    }

    /// Instance URL trimmed and guaranteed to end with `/`.
    pub fn normalized_instance_url(&self) -> String {
        let url = self.instance_url.trim();
        if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        }
    }
}

/// Tuning of the single-writer runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Re-fetch the live position this often; `0` disables polling.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Pending command capacity.
    #[serde(default = "default_command_queue_bound")]
    pub command_queue_bound: usize,
    /// Broadcast buffer for emitted events.
    #[serde(default = "default_event_queue_bound")]
    pub event_queue_bound: usize,
    /// Connect and reload before accepting the first command.
    #[serde(default = "default_reload_on_start")]
    pub reload_on_start: bool,
}

fn default_refresh_interval_ms() -> u64 {
    0
}
fn default_command_queue_bound() -> usize {
    64
}
fn default_event_queue_bound() -> usize {
    256
}
fn default_reload_on_start() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            command_queue_bound: default_command_queue_bound(),
            event_queue_bound: default_event_queue_bound(),
            reload_on_start: default_reload_on_start(),
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_queue_bound == 0 {
            return Err(invalid("runtime.command_queue_bound", "must be at least 1"));
        }
        if self.event_queue_bound == 0 {
            return Err(invalid("runtime.event_queue_bound", "must be at least 1"));
        }
        Ok(())
    }
}

/// Log filter and format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `agendalive=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of compact text.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
