//! Shared outbound message payloads.

use bytes::Bytes;

/// An immutable blob of already-framed protocol bytes.
///
/// A message carries one or more `\n`-terminated lines and is shared by
/// cheap clone across every write queue it is routed to; the backing
/// buffer is released once the last queued clone has been written.
#[derive(Debug, Clone)]
pub struct Message(Bytes);

impl Message {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(Bytes::from(text))
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self(Bytes::copy_from_slice(text.as_bytes()))
    }
}
