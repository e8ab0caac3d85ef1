//! Command dispatch.
//!
//! Two flat tables map uppercase command names to handler objects: one
//! for the registration phase (NICK/PASS/USER) and one for authorized
//! sessions. A command absent from the active table draws a 421 reply.
//! Commands are matched case-sensitively, as uppercase — an intentional
//! simplification over RFC 1459.

mod channel;
mod connection;
mod messaging;
mod user_query;

use crate::state::{Chat, Message, Participant, SessionState};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use channel::{JoinHandler, ListHandler, PartHandler};
use connection::{
    IgnoreHandler, NickHandler, PassHandler, PingHandler, PongHandler, QuitHandler, UserHandler,
};
use messaging::PrivmsgHandler;
use user_query::WhoHandler;

/// Everything a command handler may touch: the hub, the session's mutable
/// state, and the session's own delivery capability (also the handle the
/// hub and channels hold for it).
pub struct Context<'a> {
    pub chat: &'a Arc<Chat>,
    pub state: &'a mut SessionState,
    pub outbox: &'a Arc<dyn Participant>,
}

impl Context<'_> {
    /// Queue framed reply text on this session.
    pub fn reply(&self, text: String) {
        self.outbox.deliver(&Message::from(text));
    }
}

/// What the session loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Tear the session down immediately (QUIT, failed authorization).
    Quit,
}

/// A single wire command.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, command: &str, data: &str) -> Flow;
}

/// Registry of command handlers, one table per session phase.
pub struct Registry {
    registration: HashMap<&'static str, Box<dyn Handler>>,
    authorized: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registration: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        registration.insert("NICK", Box::new(NickHandler));
        registration.insert("PASS", Box::new(PassHandler));
        registration.insert("USER", Box::new(UserHandler));

        let mut authorized: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        authorized.insert("MODE", Box::new(IgnoreHandler));
        authorized.insert("NOTICE", Box::new(IgnoreHandler));
        authorized.insert("QUIT", Box::new(QuitHandler));
        authorized.insert("PING", Box::new(PingHandler));
        authorized.insert("PONG", Box::new(PongHandler));
        authorized.insert("JOIN", Box::new(JoinHandler));
        authorized.insert("PART", Box::new(PartHandler));
        authorized.insert("LIST", Box::new(ListHandler));
        authorized.insert("WHO", Box::new(WhoHandler));
        authorized.insert("PRIVMSG", Box::new(PrivmsgHandler));

        Self {
            registration,
            authorized,
        }
    }

    /// Dispatch one input line against the table for the session's
    /// current phase. Empty lines are ignored.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, line: &str) -> Flow {
        if line.is_empty() {
            return Flow::Continue;
        }
        let (command, data) = split_command(line);
        let table = if ctx.state.authorized {
            &self.authorized
        } else {
            &self.registration
        };
        match table.get(command) {
            Some(handler) => handler.handle(ctx, command, data).await,
            None => {
                ctx.reply(err_unknown_command(
                    ctx.chat.server_name(),
                    &ctx.state.nick,
                    command,
                ));
                Flow::Continue
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a line at the first space into `(command, data)`.
fn split_command(line: &str) -> (&str, &str) {
    match line.find(' ') {
        Some(pos) => (&line[..pos], &line[pos + 1..]),
        None => (line, ""),
    }
}

/// Split `#channel ... :text` into the channel token and the trailing
/// text. Both come back empty when the shape is not recognized: the
/// target must start with `#`, and the text is whatever follows the
/// first `:` after the first space.
pub(crate) fn split_channel_message(data: &str) -> (&str, &str) {
    if !data.starts_with('#') {
        return ("", "");
    }
    match data.find(' ') {
        None => (data, ""),
        Some(space) => {
            let channel = &data[..space];
            match data[space + 1..].find(':') {
                Some(colon) => (channel, &data[space + 1 + colon + 1..]),
                None => (channel, ""),
            }
        }
    }
}

/// `:<server> <code> <nick> <rest>` — the server-origin numeric shape.
pub(crate) fn numeric(server: &str, code: &str, nick: &str, rest: &str) -> String {
    format!(":{server} {code} {nick} {rest}\n")
}

/// `:<server> <command> <rest>` — server-origin lines without the nick
/// slot (PONG, PRIVMSG).
pub(crate) fn server_line(server: &str, command: &str, rest: &str) -> String {
    format!(":{server} {command} {rest}\n")
}

/// `:<nick>!<nick> <command> <rest>` — echoes of the client's own
/// actions.
pub(crate) fn user_echo(nick: &str, command: &str, rest: &str) -> String {
    format!(":{nick}!{nick} {command} {rest}\n")
}

pub(crate) fn err_unknown_command(server: &str, nick: &str, command: &str) -> String {
    numeric(
        server,
        "421",
        nick,
        &format!("{command} :Command {command} is unknown or unsupported"),
    )
}
