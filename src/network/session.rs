//! Per-connection session: read loop, dispatch, timers, serialized
//! writes.
//!
//! Each session runs in its own Tokio task:
//!
//! ```text
//! Phase 1: registration loop (NICK/PASS/USER under a deadline)
//!    ↓ USER accepted
//! Phase 2: authorized loop (command dispatch + two-phase liveness)
//!
//! both phases: tokio::select! over
//!    - framed line reads      → Registry dispatch
//!    - the outbound queue     → one socket write at a time
//!    - the phase timer        → timeout handling
//! ```
//!
//! The outbound queue is the only cross-task surface: the hub and
//! channels hold an `Arc` of the session's delivery handle and push onto
//! the queue; this task pops and writes, so writes are strictly FIFO with
//! a single write outstanding. When the `closing` flag is set the task
//! drains the queue and tears down.

use crate::handlers::{Context, Flow, Registry};
use crate::state::{Chat, Message, Participant, ParticipantId, SessionState};
use futures_util::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep_until};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, instrument};

/// Upper bound on one inbound line; longer input is a fatal read error.
const MAX_LINE_LEN: usize = 8192;

/// Network-backed participant: the capability handle the hub and
/// channels hold for a session. Delivery enqueues on the session's FIFO
/// write queue and never blocks; once the session task is gone the queue
/// is closed and delivery becomes a silent no-op.
struct SessionHandle {
    id: ParticipantId,
    queue: mpsc::UnboundedSender<Message>,
}

impl Participant for SessionHandle {
    fn id(&self) -> ParticipantId {
        self.id
    }

    fn deliver(&self, msg: &Message) {
        if msg.is_empty() {
            return;
        }
        let _ = self.queue.send(msg.clone());
    }
}

/// A connected client's protocol state machine.
pub struct Session {
    id: ParticipantId,
    stream: TcpStream,
    addr: SocketAddr,
    chat: Arc<Chat>,
    registry: Arc<Registry>,
}

impl Session {
    pub fn new(
        id: ParticipantId,
        stream: TcpStream,
        addr: SocketAddr,
        chat: Arc<Chat>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            id,
            stream,
            addr,
            chat,
            registry,
        }
    }

    /// Run the connection to completion. Every fault path funnels into
    /// cleanup; nothing propagates to the caller.
    #[instrument(skip(self), fields(id = %self.id, addr = %self.addr), name = "session")]
    pub async fn run(self) {
        let Session {
            id,
            stream,
            addr: _,
            chat,
            registry,
        } = self;

        let (read_half, write_half) = stream.into_split();
        let mut reader = FramedRead::new(read_half, LinesCodec::new_with_max_length(MAX_LINE_LEN));
        let mut writer = write_half;
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        let handle: Arc<dyn Participant> = Arc::new(SessionHandle { id, queue: tx });

        let mut state = SessionState::new();
        state.initialized = true;
        chat.join(handle.clone());

        let timeouts = chat.config().timeouts.clone();

        // Phase 1: the client has until the deadline to complete
        // NICK/PASS/USER.
        let register_deadline = Instant::now() + Duration::from_secs(timeouts.registration);
        let registered = 'registration: loop {
            tokio::select! {
                line = reader.next() => match line {
                    Some(Ok(line)) => {
                        let line = line.strip_suffix('\r').unwrap_or(line.as_str());
                        let mut ctx = Context {
                            chat: &chat,
                            state: &mut state,
                            outbox: &handle,
                        };
                        match registry.dispatch(&mut ctx, line).await {
                            Flow::Quit => break 'registration false,
                            Flow::Continue => {
                                if state.authorized {
                                    break 'registration true;
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "read failed");
                        break 'registration false;
                    }
                    None => {
                        debug!("peer closed the connection");
                        break 'registration false;
                    }
                },
                Some(msg) = rx.recv() => {
                    if let Err(e) = writer.write_all(msg.as_bytes()).await {
                        debug!(error = %e, "write failed");
                        break 'registration false;
                    }
                }
                _ = sleep_until(register_deadline), if !state.closing => {
                    debug!("registration timeout");
                    state.closing = true;
                    handle.deliver(&Message::from("ERROR: registration timeout\n"));
                }
            }
            if state.closing && rx.is_empty() {
                break 'registration false;
            }
        };

        // Phase 2: command dispatch plus the two-phase liveness check.
        if registered {
            state.refresh_liveness(Duration::from_secs(timeouts.ping_interval));
            'main: loop {
                let deadline = state.liveness_deadline;
                tokio::select! {
                    line = reader.next() => match line {
                        Some(Ok(line)) => {
                            let line = line.strip_suffix('\r').unwrap_or(line.as_str());
                            let mut ctx = Context {
                                chat: &chat,
                                state: &mut state,
                                outbox: &handle,
                            };
                            if registry.dispatch(&mut ctx, line).await == Flow::Quit {
                                break 'main;
                            }
                        }
                        Some(Err(e)) => {
                            debug!(error = %e, "read failed");
                            break 'main;
                        }
                        None => {
                            debug!("peer closed the connection");
                            break 'main;
                        }
                    },
                    Some(msg) = rx.recv() => {
                        if let Err(e) = writer.write_all(msg.as_bytes()).await {
                            debug!(error = %e, "write failed");
                            break 'main;
                        }
                    }
                    _ = sleep_until(deadline), if !state.closing => {
                        if state.ping_sent {
                            debug!("liveness probe unanswered");
                            state.closing = true;
                            handle.deliver(&Message::from("ERROR: connection timeout\n"));
                        } else {
                            state.ping_sent = true;
                            state.refresh_liveness(Duration::from_secs(timeouts.ping_grace));
                            handle.deliver(&Message::from(format!("PING :{}\n", chat.server_name())));
                        }
                    }
                }
                if state.closing && rx.is_empty() {
                    break 'main;
                }
            }
        }

        let _ = writer.shutdown().await;
        state.cleanup(&chat, id);
        info!("session closed");
    }
}
