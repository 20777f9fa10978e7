/// Errors produced by handle operations on slots and channels.
///
/// Every failing operation leaves the slot, the channel, and the handle
/// exactly as they were before the call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SlotError {
    /// Channel id 0 is the "unset" sentinel and can never be selected.
    #[error("channel id 0 is reserved")]
    ReservedChannelId,

    /// The censorship mode must be exactly 0 or 1.
    #[error("censorship mode must be 0 or 1, got {0}")]
    InvalidCensorshipMode(u32),

    /// Read or write was attempted before a channel was selected.
    #[error("no channel selected on this handle")]
    NoChannelSelected,

    /// Read addressed a channel that has never been written.
    #[error("channel {0} does not exist")]
    ChannelNotFound(u32),

    /// Write length outside the permitted `1..=max` range.
    #[error("message length {len} outside 1..={max}")]
    MessageSize { len: usize, max: usize },

    /// Read destination too small for the stored message; nothing copied.
    #[error("destination holds {capacity} bytes, message needs {needed}")]
    InsufficientCapacity { needed: usize, capacity: usize },

    /// The channel exists but currently holds no message.
    #[error("no message pending on channel {0}")]
    NoMessage(u32),
}

pub type Result<T> = std::result::Result<T, SlotError>;
