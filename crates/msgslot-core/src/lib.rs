//! Multi-channel, single-message-per-channel slot exchange.
//!
//! A [`SlotRegistry`] owns up to [`MAX_SLOTS`] independent slots, each a
//! namespace of numbered channels. Every channel retains exactly one
//! message: the most recent write, up to [`MAX_MSG_LEN`] bytes. Callers
//! interact through a [`SlotHandle`], which carries the per-connection
//! channel selection and censorship flag while the slot itself is shared.
//!
//! This crate is pure state machine; transport and framing live in
//! `msgslot-wire` and `msgslot-service`.

pub mod channel;
pub mod error;
pub mod handle;
pub mod registry;
pub mod slot;

pub use channel::Channel;
pub use error::{Result, SlotError};
pub use handle::{ControlRequest, SlotHandle};
pub use registry::SlotRegistry;
pub use slot::Slot;

/// Maximum message length in bytes, inclusive.
pub const MAX_MSG_LEN: usize = 128;

/// Number of slot identities; valid identities are `0..MAX_SLOTS`.
pub const MAX_SLOTS: usize = 256;

/// Marker byte substituted by the censorship transform.
pub const CENSOR_MARKER: u8 = b'#';
