use std::num::NonZeroU32;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{Result, SlotError};
use crate::slot::Slot;
use crate::{CENSOR_MARKER, MAX_MSG_LEN};

/// A control request applied to a handle before reading or writing.
///
/// The two requests are orthogonal and repeatable; the latest value
/// wins. Both carry the raw caller-supplied value so validation happens
/// here, in one place, regardless of how the request arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Select the channel for subsequent reads and writes.
    SelectChannel(u32),
    /// Enable (1) or disable (0) the censorship transform for writes.
    SetCensorship(u32),
}

/// Per-connection state: the selected channel and censorship flag are
/// private to this handle, while the slot behind it is shared.
///
/// Dropping a handle releases only its own state; the slot and its
/// channels stay behind for future handles.
pub struct SlotHandle {
    slot: Arc<Slot>,
    selected: Option<NonZeroU32>,
    censorship: bool,
}

impl SlotHandle {
    pub(crate) fn new(slot: Arc<Slot>) -> Self {
        Self {
            slot,
            selected: None,
            censorship: false,
        }
    }

    /// The currently selected channel, if any.
    pub fn selected_channel(&self) -> Option<u32> {
        self.selected.map(NonZeroU32::get)
    }

    /// Whether writes through this handle apply the censorship transform.
    pub fn censorship_enabled(&self) -> bool {
        self.censorship
    }

    /// The slot this handle is bound to.
    pub fn slot(&self) -> &Arc<Slot> {
        &self.slot
    }

    /// Apply a control request to this handle.
    pub fn control(&mut self, request: ControlRequest) -> Result<()> {
        match request {
            ControlRequest::SelectChannel(id) => self.select_channel(id),
            ControlRequest::SetCensorship(mode) => self.set_censorship(mode),
        }
    }

    /// Select `channel` for subsequent reads and writes.
    ///
    /// The channel does not have to exist yet; it is allocated lazily by
    /// the first write addressed to it, never by selection.
    pub fn select_channel(&mut self, channel: u32) -> Result<()> {
        let channel = NonZeroU32::new(channel).ok_or(SlotError::ReservedChannelId)?;
        self.selected = Some(channel);
        trace!(
            slot = self.slot.identity(),
            channel = channel.get(),
            "selected channel"
        );
        Ok(())
    }

    /// Set the censorship mode from its raw wire value: 0 disables,
    /// 1 enables, anything else is rejected.
    pub fn set_censorship(&mut self, mode: u32) -> Result<()> {
        self.censorship = match mode {
            0 => false,
            1 => true,
            other => return Err(SlotError::InvalidCensorshipMode(other)),
        };
        trace!(
            slot = self.slot.identity(),
            enabled = self.censorship,
            "set censorship mode"
        );
        Ok(())
    }

    /// Store `message` on the selected channel, replacing any previous
    /// message there, and return the number of bytes stored.
    ///
    /// The replacement buffer is built in full (censored if enabled)
    /// before it is swapped in, so a failure at any point leaves the
    /// channel holding exactly what it held before.
    pub fn write(&self, message: &[u8]) -> Result<usize> {
        let selected = self.selected.ok_or(SlotError::NoChannelSelected)?;
        if message.is_empty() || message.len() > MAX_MSG_LEN {
            return Err(SlotError::MessageSize {
                len: message.len(),
                max: MAX_MSG_LEN,
            });
        }

        let payload = if self.censorship {
            censor(message)
        } else {
            Bytes::copy_from_slice(message)
        };

        let channel = self.slot.channel_or_create(selected.get());
        channel.store(payload);

        trace!(
            slot = self.slot.identity(),
            channel = selected.get(),
            len = message.len(),
            "stored message"
        );
        Ok(message.len())
    }

    /// Copy the selected channel's current message into `dest` and
    /// return its length.
    ///
    /// The stored message is returned verbatim: censorship is baked in
    /// at write time and never applied or re-applied on read. Reading
    /// neither clears nor alters the stored message.
    pub fn read(&self, dest: &mut [u8]) -> Result<usize> {
        let selected = self.selected.ok_or(SlotError::NoChannelSelected)?;
        let channel = self
            .slot
            .channel(selected.get())
            .ok_or(SlotError::ChannelNotFound(selected.get()))?;
        let payload = channel.load().ok_or(SlotError::NoMessage(selected.get()))?;

        if dest.len() < payload.len() {
            return Err(SlotError::InsufficientCapacity {
                needed: payload.len(),
                capacity: dest.len(),
            });
        }

        dest[..payload.len()].copy_from_slice(&payload);
        trace!(
            slot = self.slot.identity(),
            channel = selected.get(),
            len = payload.len(),
            "read message"
        );
        Ok(payload.len())
    }
}

impl std::fmt::Debug for SlotHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotHandle")
            .field("slot", &self.slot.identity())
            .field("selected", &self.selected_channel())
            .field("censorship", &self.censorship)
            .finish()
    }
}

/// Write-time censorship: every third byte (1-indexed positions 3, 6,
/// 9, ...) becomes the marker, the rest copy through unchanged.
fn censor(src: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(src.len());
    for (i, byte) in src.iter().enumerate() {
        if (i + 1) % 3 == 0 {
            out.put_u8(CENSOR_MARKER);
        } else {
            out.put_u8(*byte);
        }
    }
    out.freeze()
}
