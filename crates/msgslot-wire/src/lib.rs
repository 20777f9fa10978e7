//! Wire protocol for the msgslot service.
//!
//! Every message is a small frame: a 2-byte magic (`"mS"`), one tag
//! byte, and a 2-byte little-endian payload length. The tag byte is an
//! opcode on the request side and a status on the response side.
//! Numeric arguments travel as 4-byte little-endian values so the
//! server-side core sees the caller's raw input and owns validation.

pub mod codec;
pub mod error;
pub mod stream;

pub use codec::{
    decode_request, decode_response, encode_request, encode_response, Request, Response, Status,
    HEADER_SIZE, MAX_FRAME_PAYLOAD,
};
pub use error::{Result, WireError};
pub use stream::WireStream;
