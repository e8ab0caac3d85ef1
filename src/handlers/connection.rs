//! Registration and liveness commands.

use super::{Context, Flow, Handler, numeric, server_line, user_echo};
use async_trait::async_trait;
use tokio::time::Duration;
use tracing::{debug, info};

/// `NICK <name>` — store the nick for the pending registration.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, data: &str) -> Flow {
        ctx.state.nick = data.to_string();
        Flow::Continue
    }
}

/// `PASS <password>` — store the password for the pending registration.
pub struct PassHandler;

#[async_trait]
impl Handler for PassHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, data: &str) -> Flow {
        ctx.state.password = data.to_string();
        Flow::Continue
    }
}

/// `USER <...>` — run the auth policy; on success emit the welcome
/// banner (001–004, 375, 372) and the auto-join echo as one chunk.
///
/// A rejected session is torn down without any reply.
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, _data: &str) -> Flow {
        if !ctx.chat.authorize(&ctx.state.nick, &ctx.state.password) {
            debug!(nick = %ctx.state.nick, "authorization rejected");
            return Flow::Quit;
        }
        ctx.state.authorized = true;

        let server = ctx.chat.server_name();
        let nick = ctx.state.nick.clone();
        let mut banner = String::new();
        banner.push_str(&numeric(server, "001", &nick, &format!(":Hi {nick}")));
        banner.push_str(&numeric(
            server,
            "002",
            &nick,
            &format!(":Your host is {server}, running version 0.0.0"),
        ));
        banner.push_str(&numeric(server, "003", &nick, ":This server was created 0"));
        banner.push_str(&numeric(server, "004", &nick, &format!(":{server} 0.0.0 - n")));
        banner.push_str(&numeric(
            server,
            "375",
            &nick,
            &format!(":- {server} {} -", ctx.chat.motd_start()),
        ));
        banner.push_str(&numeric(server, "372", &nick, &format!(":- {}", ctx.chat.motd())));

        if let Some(auto_join) = ctx.chat.auto_join() {
            if ctx.chat.join_channel(auto_join, ctx.outbox.clone()) {
                ctx.state.active_channels.insert(auto_join.to_string());
                banner.push_str(&user_echo(&nick, "JOIN", &format!("{auto_join} :{auto_join}")));
            }
        }

        info!(nick = %nick, "session registered");
        ctx.reply(banner);
        Flow::Continue
    }
}

/// `QUIT` — immediate teardown.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, _data: &str) -> Flow {
        info!(nick = %ctx.state.nick, "client quit");
        Flow::Quit
    }
}

/// `PING <token>` — answer with PONG; when no liveness probe is
/// outstanding this also counts as activity and re-arms the idle
/// deadline.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, data: &str) -> Flow {
        let server = ctx.chat.server_name();
        ctx.reply(server_line(server, "PONG", &format!("{server} :{data}")));
        if !ctx.state.ping_sent {
            let interval = ctx.chat.config().timeouts.ping_interval;
            ctx.state.refresh_liveness(Duration::from_secs(interval));
        }
        Flow::Continue
    }
}

/// `PONG` — clears an outstanding liveness probe.
pub struct PongHandler;

#[async_trait]
impl Handler for PongHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, _data: &str) -> Flow {
        if ctx.state.ping_sent {
            ctx.state.ping_sent = false;
            let interval = ctx.chat.config().timeouts.ping_interval;
            ctx.state.refresh_liveness(Duration::from_secs(interval));
        }
        Flow::Continue
    }
}

/// Commands accepted and silently ignored (MODE, NOTICE).
pub struct IgnoreHandler;

#[async_trait]
impl Handler for IgnoreHandler {
    async fn handle(&self, _ctx: &mut Context<'_>, _command: &str, _data: &str) -> Flow {
        Flow::Continue
    }
}
