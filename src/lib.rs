//! debugirc - operator-facing IRC-subset debug channel.
//!
//! Embeds a minimal multi-user chat server into a host process.
//! Operators connect with a standard IRC client, authenticate cheaply,
//! and observe broadcast traffic the host produces; designated channels
//! can carry operator commands, interpreted by a host-supplied
//! [`state::MessageHandler`].
//!
//! ```no_run
//! use debugirc::config::{ChannelBlock, ChatConfig};
//! use debugirc::network::Gateway;
//! use debugirc::state::Chat;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ChatConfig {
//!     auto_join: Some("#system".to_string()),
//!     channels: vec![ChannelBlock {
//!         name: "#system".to_string(),
//!         title: "System channel".to_string(),
//!     }],
//!     ..ChatConfig::default()
//! };
//! config.validate()?;
//!
//! let chat = Arc::new(Chat::new(config));
//! let gateway = Gateway::bind(([0, 0, 0, 0], 6667).into(), Arc::clone(&chat)).await?;
//! tokio::spawn(gateway.run());
//!
//! chat.deliver_channel("#system", "host started");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;
