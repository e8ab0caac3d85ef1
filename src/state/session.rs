//! Per-connection protocol state.

use super::{Chat, ParticipantId};
use std::collections::HashSet;
use tokio::time::{Duration, Instant};

/// Mutable registration and liveness state of one connection.
///
/// Owned by the session task; command handlers mutate it through the
/// dispatch context. Everything here is single-task state — the only
/// cross-task surface of a session is its outbound queue.
#[derive(Debug)]
pub struct SessionState {
    pub nick: String,
    pub password: String,
    /// True between session start and cleanup.
    pub initialized: bool,
    /// Becomes true once USER passes the auth policy.
    pub authorized: bool,
    /// Channels this session has joined; used for JOIN re-echo and
    /// cleanup.
    pub active_channels: HashSet<String>,
    /// Drain the write queue, then close.
    pub closing: bool,
    /// A server-initiated liveness probe is outstanding.
    pub ping_sent: bool,
    /// Next liveness deadline; re-armed by the PING/PONG handlers.
    pub liveness_deadline: Instant,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            nick: String::new(),
            password: String::new(),
            initialized: false,
            authorized: false,
            active_channels: HashSet::new(),
            closing: false,
            ping_sent: false,
            liveness_deadline: Instant::now(),
        }
    }

    pub fn refresh_liveness(&mut self, interval: Duration) {
        self.liveness_deadline = Instant::now() + interval;
    }

    /// Leave every joined channel and the hub's global set. Idempotent:
    /// only the first call after session start does anything.
    pub fn cleanup(&mut self, chat: &Chat, id: ParticipantId) {
        if !self.initialized {
            return;
        }
        for name in self.active_channels.drain() {
            chat.leave_channel(&name, id);
        }
        chat.leave(id);
        self.initialized = false;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
