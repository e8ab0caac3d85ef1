//! JOIN, PART and LIST.

use super::{Context, Flow, Handler, numeric, split_channel_message, user_echo};
use async_trait::async_trait;
use tracing::debug;

/// The sender prefix here is the client's nick, not the server name —
/// preserved wire-format quirk.
fn err_no_such_channel(nick: &str, target: &str) -> String {
    format!(":{nick} 403 {target} :No such channel\n")
}

/// `JOIN <channel>` — join and echo. Joining a channel the session is
/// already in re-echoes the same line; anything else draws a 403.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, data: &str) -> Flow {
        if data.len() > 1 && data.starts_with('#') && ctx.chat.join_channel(data, ctx.outbox.clone())
        {
            ctx.state.active_channels.insert(data.to_string());
            ctx.reply(user_echo(&ctx.state.nick, "JOIN", &format!("{data} :{data}")));
        } else if ctx.state.active_channels.contains(data) {
            ctx.reply(user_echo(&ctx.state.nick, "JOIN", &format!("{data} :{data}")));
        } else {
            debug!(nick = %ctx.state.nick, target = %data, "join refused");
            ctx.reply(err_no_such_channel(&ctx.state.nick, data));
        }
        Flow::Continue
    }
}

/// `PART <channel> [:reason]` — echo and leave. Leaving an unknown
/// channel is a hub-level no-op but still echoes.
pub struct PartHandler;

#[async_trait]
impl Handler for PartHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, data: &str) -> Flow {
        let (channel, reason) = split_channel_message(data);
        if channel.is_empty() {
            ctx.reply(err_no_such_channel(&ctx.state.nick, data));
            return Flow::Continue;
        }

        let rest = if reason.is_empty() {
            channel.to_string()
        } else {
            format!("{channel} :{reason}")
        };
        ctx.reply(user_echo(&ctx.state.nick, "PART", &rest));
        ctx.chat.leave_channel(channel, ctx.outbox.id());
        ctx.state.active_channels.remove(channel);
        Flow::Continue
    }
}

/// `LIST` — 321 header, one 322 per channel, 323 footer, one chunk.
/// The member count is reported as the literal `999` — preserved
/// wire-format quirk.
pub struct ListHandler;

#[async_trait]
impl Handler for ListHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, _data: &str) -> Flow {
        let server = ctx.chat.server_name();
        let nick = ctx.state.nick.clone();

        let mut out = numeric(server, "321", &nick, "Channel :Users  Name");
        ctx.chat.visit_channels(|channel| {
            out.push_str(&numeric(
                server,
                "322",
                &nick,
                &format!("{} 999 :{}", channel.name(), channel.title()),
            ));
        });
        out.push_str(&numeric(server, "323", &nick, ":End of /LIST"));
        ctx.reply(out);
        Flow::Continue
    }
}
