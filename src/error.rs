//! Error types.
//!
//! Per-connection faults deliberately have no public error enum: every
//! session-level failure resolves to cleanup inside the session task, and
//! hub operations are infallible from the caller's perspective (unknown
//! channels are silent no-ops or booleans).

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("channel name {0:?} must begin with '#'")]
    BadChannelName(String),

    #[error("duplicate channel {0:?}")]
    DuplicateChannel(String),

    #[error("auto_join channel {0:?} is not configured")]
    UnknownAutoJoin(String),
}
