//! Hub configuration.
//!
//! A host process usually builds a [`ChatConfig`] in code; the standalone
//! daemon and deployments that want a file can load the same structure
//! from TOML. All scalars default to the stock debug-IRC identity so an
//! empty document is a valid configuration.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

fn default_server_name() -> String {
    "debugirc".to_string()
}

fn default_motd_start() -> String {
    "DebugIRC".to_string()
}

fn default_motd() -> String {
    "This is debug irc interface for logging and similar tasks".to_string()
}

fn default_registration_timeout() -> u64 {
    5
}

fn default_ping_interval() -> u64 {
    300
}

fn default_ping_grace() -> u64 {
    30
}

/// Server-wide configuration consumed by [`crate::state::Chat::new`].
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Name used as the server prefix of every server-origin line.
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Short MOTD caption (375 reply).
    #[serde(default = "default_motd_start")]
    pub motd_start: String,

    /// MOTD body (372 reply).
    #[serde(default = "default_motd")]
    pub motd: String,

    /// Channel every session joins automatically on registration.
    #[serde(default)]
    pub auto_join: Option<String>,

    /// Channels created at startup.
    #[serde(default)]
    pub channels: Vec<ChannelBlock>,

    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

/// One `[[channels]]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelBlock {
    pub name: String,
    #[serde(default)]
    pub title: String,
}

/// Session timer configuration, in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutsConfig {
    /// How long an unregistered connection may linger.
    #[serde(default = "default_registration_timeout")]
    pub registration: u64,

    /// Idle period before the server probes the client with PING.
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,

    /// Grace window for the PONG answer to a probe.
    #[serde(default = "default_ping_grace")]
    pub ping_grace: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            registration: default_registration_timeout(),
            ping_interval: default_ping_interval(),
            ping_grace: default_ping_grace(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            motd_start: default_motd_start(),
            motd: default_motd(),
            auto_join: None,
            channels: Vec::new(),
            timeouts: TimeoutsConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Check the startup invariants: channel names begin with `#` and are
    /// unique, and `auto_join` refers to a configured channel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for block in &self.channels {
            if !block.name.starts_with('#') {
                return Err(ConfigError::BadChannelName(block.name.clone()));
            }
            if !seen.insert(block.name.as_str()) {
                return Err(ConfigError::DuplicateChannel(block.name.clone()));
            }
        }
        if let Some(auto_join) = &self.auto_join {
            if !seen.contains(auto_join.as_str()) {
                return Err(ConfigError::UnknownAutoJoin(auto_join.clone()));
            }
        }
        Ok(())
    }
}
