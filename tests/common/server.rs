//! In-process test server.
//!
//! Spawns the gateway on an ephemeral port through the library API, the
//! same way a host process embeds debugirc.

#![allow(dead_code)]

use debugirc::config::{ChannelBlock, ChatConfig, TimeoutsConfig};
use debugirc::network::Gateway;
use debugirc::state::{Chat, MessageHandler};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A running in-process server instance.
pub struct TestServer {
    chat: Arc<Chat>,
    addr: SocketAddr,
    gateway_task: JoinHandle<()>,
}

/// The deployment the end-to-end scenarios assume: server `debugirc`,
/// `#system` ("System channel") and `#debug` ("DEBUG"), auto-join
/// `#system`. The registration timeout is shortened so timeout tests
/// stay fast.
pub fn scenario_config() -> ChatConfig {
    ChatConfig {
        auto_join: Some("#system".to_string()),
        channels: vec![
            ChannelBlock {
                name: "#system".to_string(),
                title: "System channel".to_string(),
            },
            ChannelBlock {
                name: "#debug".to_string(),
                title: "DEBUG".to_string(),
            },
        ],
        timeouts: TimeoutsConfig {
            registration: 1,
            ping_interval: 300,
            ping_grace: 30,
        },
        ..ChatConfig::default()
    }
}

impl TestServer {
    /// Spawn the scenario deployment.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(scenario_config(), None).await
    }

    /// Spawn with custom configuration and an optional host message
    /// handler.
    pub async fn spawn_with(
        config: ChatConfig,
        handler: Option<Arc<dyn MessageHandler>>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let mut chat = Chat::new(config);
        if let Some(handler) = handler {
            chat.set_message_handler(handler);
        }
        let chat = Arc::new(chat);

        let gateway = Gateway::bind(([127, 0, 0, 1], 0).into(), Arc::clone(&chat)).await?;
        let addr = gateway.local_addr()?;
        let gateway_task = tokio::spawn(async move {
            let _ = gateway.run().await;
        });

        Ok(Self {
            chat,
            addr,
            gateway_task,
        })
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// The hub, for driving host-side broadcasts from tests.
    pub fn chat(&self) -> &Arc<Chat> {
        &self.chat
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.gateway_task.abort();
    }
}
