//! WHO.

use super::{Context, Flow, Handler, numeric};
use async_trait::async_trait;

/// `WHO <target>` — only the 315 terminator is implemented.
pub struct WhoHandler;

#[async_trait]
impl Handler for WhoHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _command: &str, data: &str) -> Flow {
        ctx.reply(numeric(
            ctx.chat.server_name(),
            "315",
            &ctx.state.nick,
            &format!("{data} :End of /WHO list."),
        ));
        Flow::Continue
    }
}
