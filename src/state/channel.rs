//! Named membership group with broadcast semantics.

use super::{Message, Participant, ParticipantId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A `#`-prefixed channel: a membership set plus broadcast-to-members.
///
/// `join`/`leave` take the member lock exclusively; `deliver` takes it
/// shared. Holding the shared lock across the fan-out is bounded because
/// participant delivery only enqueues.
pub struct Channel {
    name: String,
    title: String,
    members: RwLock<HashMap<ParticipantId, Arc<dyn Participant>>>,
}

impl Channel {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            members: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Insert a member. Returns true iff it was not already present.
    pub fn join(&self, participant: Arc<dyn Participant>) -> bool {
        self.members
            .write()
            .insert(participant.id(), participant)
            .is_none()
    }

    /// Remove a member. Idempotent.
    pub fn leave(&self, id: ParticipantId) {
        self.members.write().remove(&id);
    }

    /// Broadcast a message to the current membership.
    pub fn deliver(&self, msg: &Message) {
        if msg.is_empty() {
            return;
        }
        for member in self.members.read().values() {
            member.deliver(msg);
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.read().len()
    }
}
