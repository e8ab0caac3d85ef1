//! State management: the hub, its channels, participants and the shared
//! message payloads that flow between them.

mod channel;
mod chat;
mod message;
mod participant;
mod session;

pub use channel::Channel;
pub use chat::{Chat, MessageHandler};
pub use message::Message;
pub use participant::{IdGenerator, Participant, ParticipantId};
pub use session::SessionState;
