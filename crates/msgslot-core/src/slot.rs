use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::channel::Channel;

/// A named container of channels, shared by every handle bound to the
/// same identity.
///
/// The channel map is guarded per-slot: two handles racing to write the
/// same previously-unset channel id resolve to a single `Channel`
/// instance. Channels are never removed individually; they live until
/// the slot is dropped at service shutdown.
pub struct Slot {
    identity: u8,
    channels: Mutex<HashMap<u32, Arc<Channel>>>,
}

impl Slot {
    pub(crate) fn new(identity: u8) -> Self {
        Self {
            identity,
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// The registry index this slot was created under.
    pub fn identity(&self) -> u8 {
        self.identity
    }

    /// Look up an existing channel by id.
    pub fn channel(&self, id: u32) -> Option<Arc<Channel>> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Look up a channel, creating it empty if absent.
    ///
    /// Only the write path calls this; selecting a channel or reading
    /// from one never allocates.
    pub fn channel_or_create(&self, id: u32) -> Arc<Channel> {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(channels.entry(id).or_insert_with(|| {
            debug!(slot = self.identity, channel = id, "created channel");
            Arc::new(Channel::new(id))
        }))
    }

    /// Number of channels created so far.
    pub fn channel_count(&self) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("identity", &self.identity)
            .field("channels", &self.channel_count())
            .finish()
    }
}
