//! Server and match settings.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tiktag_rules::{DEFAULT_NAME_LIMIT, OccupiedPolicy};
use tracing::{debug, info, instrument};

/// Settings for a tiktag process, loaded from TOML.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Settings {
    /// Address the TCP server binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the TCP server binds to.
    #[serde(default = "default_port")]
    port: u16,

    /// Capacity of each session's notification mailbox (minimum 1).
    #[serde(default = "default_channel_capacity")]
    channel_capacity: usize,

    /// Whether a move on an occupied cell flips it or is refused.
    #[serde(default)]
    occupied_policy: OccupiedPolicy,

    /// Whether a disconnecting player's seat becomes free again.
    #[serde(default = "default_release_slot")]
    release_slot_on_disconnect: bool,

    /// Maximum display-name length in characters.
    #[serde(default = "default_name_limit")]
    name_limit: usize,

    /// Close connections idle for this many seconds. `None` disables it.
    #[serde(default)]
    idle_timeout_secs: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    2323
}

fn default_channel_capacity() -> usize {
    1
}

fn default_release_slot() -> bool {
    true
}

fn default_name_limit() -> usize {
    DEFAULT_NAME_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            channel_capacity: default_channel_capacity(),
            occupied_policy: OccupiedPolicy::default(),
            release_slot_on_disconnect: default_release_slot(),
            name_limit: default_name_limit(),
            idle_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading settings from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let settings = Self::from_toml(&content)?;
        info!(host = %settings.host, port = settings.port, "Settings loaded");
        Ok(settings)
    }

    /// Parses settings from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if settings.channel_capacity == 0 {
            return Err(ConfigError::new("channel_capacity must be at least 1"));
        }
        Ok(settings)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the bind address.
    pub fn with_address(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Replaces the mailbox capacity, clamped to at least 1.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Replaces the occupied-cell policy.
    pub fn with_occupied_policy(mut self, policy: OccupiedPolicy) -> Self {
        self.occupied_policy = policy;
        self
    }

    /// Replaces the seat release behavior.
    pub fn with_release_slot_on_disconnect(mut self, release: bool) -> Self {
        self.release_slot_on_disconnect = release;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
