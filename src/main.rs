//! debugircd - standalone debug IRC daemon.
//!
//! Serves the stock deployment: server `debugirc` with `#system` and
//! `#debug`, auto-joining every operator into `#system`.

use anyhow::Context as _;
use debugirc::config::{ChannelBlock, ChatConfig};
use debugirc::network::Gateway;
use debugirc::state::Chat;
use std::sync::Arc;
use tracing::info;

/// Resolve the listen port from CLI arguments: exactly one positional
/// `<port>`.
fn resolve_port() -> anyhow::Result<u16> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 1 {
        eprintln!("Usage: debugircd <port>");
        std::process::exit(1);
    }
    args[0]
        .parse()
        .with_context(|| format!("invalid port {:?}", args[0]))
}

async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => info!("received SIGINT - initiating graceful shutdown"),
        _ = sigterm.recv() => info!("received SIGTERM - initiating graceful shutdown"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let port = resolve_port()?;

    let config = ChatConfig {
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
        ..ChatConfig::default()
    };
    config.validate()?;

    let chat = Arc::new(Chat::new(config));
    info!(server = %chat.server_name(), port, "starting debugircd");

    let gateway = Gateway::bind(([0, 0, 0, 0], port).into(), Arc::clone(&chat)).await?;

    tokio::select! {
        result = gateway.run() => result?,
        _ = shutdown_signal() => {}
    }

    Ok(())
}
