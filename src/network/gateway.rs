//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds to a socket and spawns a session task for each
//! incoming client.

use crate::handlers::Registry;
use crate::network::Session;
use crate::state::Chat;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// Accepts incoming TCP connections and spawns a session per client.
pub struct Gateway {
    listener: TcpListener,
    chat: Arc<Chat>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(addr: SocketAddr, chat: Arc<Chat>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let registry = Arc::new(Registry::new());
        info!(%addr, "gateway listening");
        Ok(Self {
            listener,
            chat,
            registry,
        })
    }

    /// The bound address; useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever. A failed accept is logged and the
    /// loop continues.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> std::io::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let chat = Arc::clone(&self.chat);
                    let registry = Arc::clone(&self.registry);
                    let id = chat.next_id();
                    info!(%id, %addr, "connection accepted");

                    tokio::spawn(async move {
                        Session::new(id, stream, addr, chat, registry).run().await;
                    });
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }
    }
}
