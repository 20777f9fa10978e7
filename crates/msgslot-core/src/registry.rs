use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::handle::SlotHandle;
use crate::slot::Slot;
use crate::MAX_SLOTS;

/// Process-wide table of slots, indexed by identity.
///
/// The table is fixed-size and lazily populated: a slot comes into
/// existence on the first open addressed to its identity and lives until
/// the registry is dropped at service shutdown. The identity type is
/// `u8`, so every representable identity is in range; callers that
/// resolve identities from external input validate against
/// [`MAX_SLOTS`](crate::MAX_SLOTS) before getting here.
pub struct SlotRegistry {
    slots: Mutex<[Option<Arc<Slot>>; MAX_SLOTS]>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(std::array::from_fn(|_| None)),
        }
    }

    /// The slot at `identity`, created empty if this is the first open.
    pub fn get_or_create(&self, identity: u8) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots[usize::from(identity)].get_or_insert_with(|| {
            info!(slot = identity, "created slot");
            Arc::new(Slot::new(identity))
        }))
    }

    /// Open a new handle bound to `identity`, with no channel selected
    /// and censorship disabled.
    pub fn open(&self, identity: u8) -> SlotHandle {
        SlotHandle::new(self.get_or_create(identity))
    }

    /// Number of slots created so far.
    pub fn slot_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SlotRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotRegistry")
            .field("slots", &self.slot_count())
            .finish()
    }
}
