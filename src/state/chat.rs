//! The chat hub: channel registry, global participant set, server-wide
//! configuration.

use super::{Channel, IdGenerator, Message, Participant, ParticipantId};
use crate::auth::{AuthPolicy, NickLengthPolicy};
use crate::config::ChatConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Host-supplied interpreter for PRIVMSG text on channels.
///
/// Invoked concurrently from multiple sessions; implementations must not
/// block. Every call to `reply` queues one
/// `:<server> PRIVMSG <channel> :<text>` line on the issuing session.
pub trait MessageHandler: Send + Sync {
    fn handle(&self, nick: &str, channel: &str, text: &str, reply: &mut dyn FnMut(&str));
}

/// Central registry of channels, participants and server-wide
/// configuration.
///
/// Two independent reader/writer locks guard the mutable collections, one
/// for the channel map and one for the global participant set; no
/// operation holds both at once, and no hub lock is held across I/O.
///
/// Configuration is frozen by ownership: the setters take `&mut self`, so
/// once the hub is wrapped in an `Arc` and handed to the gateway nothing
/// can mutate it and reads need no synchronization.
pub struct Chat {
    config: ChatConfig,
    auth: Box<dyn AuthPolicy>,
    handler: Option<Arc<dyn MessageHandler>>,
    channels: RwLock<HashMap<String, Arc<Channel>>>,
    participants: RwLock<HashMap<ParticipantId, Arc<dyn Participant>>>,
    ids: IdGenerator,
}

impl Chat {
    /// Build a hub from configuration; the configured channels are
    /// created up front.
    pub fn new(config: ChatConfig) -> Self {
        let channels = config
            .channels
            .iter()
            .map(|block| {
                let channel = Channel::new(block.name.clone(), block.title.clone());
                (block.name.clone(), Arc::new(channel))
            })
            .collect();

        Self {
            config,
            auth: Box::new(NickLengthPolicy),
            handler: None,
            channels: RwLock::new(channels),
            participants: RwLock::new(HashMap::new()),
            ids: IdGenerator::new(),
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn server_name(&self) -> &str {
        &self.config.server_name
    }

    pub fn motd_start(&self) -> &str {
        &self.config.motd_start
    }

    pub fn motd(&self) -> &str {
        &self.config.motd
    }

    pub fn auto_join(&self) -> Option<&str> {
        self.config.auto_join.as_deref()
    }

    /// Replace the authentication policy. Only reachable before the hub is
    /// shared with the gateway.
    pub fn set_auth_policy(&mut self, auth: Box<dyn AuthPolicy>) {
        self.auth = auth;
    }

    /// Install the host's PRIVMSG interpreter. Only reachable before the
    /// hub is shared with the gateway.
    pub fn set_message_handler(&mut self, handler: Arc<dyn MessageHandler>) {
        self.handler = Some(handler);
    }

    pub fn next_id(&self) -> ParticipantId {
        self.ids.next()
    }

    pub fn add_channel(&self, name: impl Into<String>, title: impl Into<String>) {
        let name = name.into();
        let channel = Arc::new(Channel::new(name.clone(), title));
        self.channels.write().insert(name, channel);
    }

    pub fn remove_channel(&self, name: &str) {
        self.channels.write().remove(name);
    }

    /// Visit every channel under the shared lock. The visitor must not
    /// mutate the hub.
    pub fn visit_channels<F>(&self, mut visit: F)
    where
        F: FnMut(&Arc<Channel>),
    {
        for channel in self.channels.read().values() {
            visit(channel);
        }
    }

    /// Add a participant to the global set.
    pub fn join(&self, participant: Arc<dyn Participant>) {
        self.participants
            .write()
            .insert(participant.id(), participant);
    }

    /// Remove a participant from the global set. Idempotent.
    pub fn leave(&self, id: ParticipantId) {
        self.participants.write().remove(&id);
    }

    /// Add a participant to a channel. Returns false when the channel is
    /// unknown or the participant was already a member.
    pub fn join_channel(&self, name: &str, participant: Arc<dyn Participant>) -> bool {
        let channel = self.channels.read().get(name).cloned();
        match channel {
            Some(channel) => channel.join(participant),
            None => false,
        }
    }

    /// Remove a participant from a channel. No-op when the channel is
    /// unknown.
    pub fn leave_channel(&self, name: &str, id: ParticipantId) {
        let channel = self.channels.read().get(name).cloned();
        if let Some(channel) = channel {
            channel.leave(id);
        }
    }

    /// Fan a raw, already-framed payload out to every participant in the
    /// global set.
    pub fn deliver_all(&self, text: &str) {
        let msg = Message::from(text);
        if msg.is_empty() {
            return;
        }
        for participant in self.participants.read().values() {
            participant.deliver(&msg);
        }
    }

    /// Broadcast `text` to a channel as a server-originated PRIVMSG.
    pub fn deliver_channel(&self, name: &str, text: &str) {
        let channel = self.channels.read().get(name).cloned();
        if let Some(channel) = channel {
            let line = format!(":{} PRIVMSG {} :{}\n", self.server_name(), name, text);
            channel.deliver(&Message::from(line));
        }
    }

    /// Run the configured authentication policy.
    pub fn authorize(&self, username: &str, password: &str) -> bool {
        self.auth.authorize(username, password)
    }

    pub fn message_handler(&self) -> Option<Arc<dyn MessageHandler>> {
        self.handler.clone()
    }
}
