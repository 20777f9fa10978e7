/// Errors that can occur while encoding or decoding protocol frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame header does not start with the protocol magic.
    #[error("invalid frame magic (expected 0x6D53 \"mS\")")]
    InvalidMagic,

    /// The frame payload exceeds the protocol bound.
    #[error("frame payload too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The request tag byte is not a known opcode.
    ///
    /// The offending frame has been consumed, so the stream stays in
    /// sync and a server can answer with an error status.
    #[error("unrecognized request opcode {0:#04x}")]
    UnknownOpcode(u8),

    /// A numeric request field has the wrong width. The frame has been
    /// consumed, as with [`WireError::UnknownOpcode`].
    #[error("malformed {field} field ({got} bytes, expected {expected})")]
    MalformedField {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    /// The response tag byte is not a known status.
    #[error("unrecognized response status {0:#04x}")]
    UnknownStatus(u8),

    /// An I/O error occurred on the underlying stream.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection.
    #[error("connection closed")]
    ConnectionClosed,
}

impl WireError {
    /// True when the stream is still framed after this error, so a
    /// server may answer it and keep the session alive.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WireError::UnknownOpcode(_) | WireError::MalformedField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
