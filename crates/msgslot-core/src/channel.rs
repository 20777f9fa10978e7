use std::sync::{PoisonError, RwLock};

use bytes::Bytes;

/// A single-message channel within a slot.
///
/// Holds at most one message at a time. Writers construct the complete
/// replacement buffer before calling [`Channel::store`], so readers
/// observe either the old message or the new one, never a mix.
pub struct Channel {
    id: u32,
    payload: RwLock<Option<Bytes>>,
}

impl Channel {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            payload: RwLock::new(None),
        }
    }

    /// The channel id, non-zero and unique within the owning slot.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Replace the stored message wholesale. The previous message, if
    /// any, is discarded.
    pub fn store(&self, payload: Bytes) {
        let mut guard = self
            .payload
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(payload);
    }

    /// The currently stored message, or `None` if never written.
    ///
    /// `Bytes` is reference-counted, so this never copies the payload
    /// and never disturbs the stored content.
    pub fn load(&self) -> Option<Bytes> {
        self.payload
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.load().map(|p| p.len());
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("payload_len", &len)
            .finish()
    }
}
