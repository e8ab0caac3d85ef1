//! PRIVMSG delegation to the host message handler.

use super::{Context, Flow, Handler, server_line, split_channel_message};
use crate::state::Message;
use async_trait::async_trait;

/// `PRIVMSG <channel> :<text>` — hand the text to the host's message
/// handler. Without a handler, or with a malformed target, the line is
/// dropped silently. Every reply the handler produces is queued on the
/// issuing session as a server-originated PRIVMSG.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, data: &str) -> Flow {
        if data.is_empty() {
            return Flow::Continue;
        }
        let Some(handler) = ctx.chat.message_handler() else {
            return Flow::Continue;
        };
        let (channel, text) = split_channel_message(data);
        if channel.is_empty() || text.is_empty() {
            return Flow::Continue;
        }

        let server = ctx.chat.server_name();
        let outbox = ctx.outbox;
        handler.handle(&ctx.state.nick, channel, text, &mut |reply| {
            let line = server_line(server, "PRIVMSG", &format!("{channel} :{reply}"));
            outbox.deliver(&Message::from(line));
        });
        Flow::Continue
    }
}
