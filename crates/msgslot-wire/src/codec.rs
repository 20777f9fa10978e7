use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};

/// Frame header: magic (2) + tag (1) + length (2) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Magic bytes: "mS" (0x6D 0x53).
pub const MAGIC: [u8; 2] = [0x6D, 0x53];

/// Maximum frame payload. Messages themselves are at most 128 bytes;
/// this bound only guards buffer growth against garbage input.
pub const MAX_FRAME_PAYLOAD: usize = 4096;

const OP_OPEN: u8 = 0x01;
const OP_SELECT: u8 = 0x02;
const OP_CENSOR: u8 = 0x03;
const OP_WRITE: u8 = 0x04;
const OP_READ: u8 = 0x05;

/// A client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Bind this session to a slot identity. Must be the first request.
    Open { slot: u32 },
    /// Select the channel for subsequent reads and writes.
    SelectChannel { channel: u32 },
    /// Set the censorship mode; the raw value is validated server-side.
    SetCensorship { mode: u32 },
    /// Store a message on the selected channel.
    Write { message: Bytes },
    /// Retrieve the selected channel's message into a buffer of the
    /// given capacity.
    Read { capacity: u32 },
}

impl Request {
    fn opcode(&self) -> u8 {
        match self {
            Request::Open { .. } => OP_OPEN,
            Request::SelectChannel { .. } => OP_SELECT,
            Request::SetCensorship { .. } => OP_CENSOR,
            Request::Write { .. } => OP_WRITE,
            Request::Read { .. } => OP_READ,
        }
    }
}

/// Outcome classes reported by the server, mirroring the core error
/// taxonomy one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    /// Bad control parameter: zero channel id, non-boolean censorship
    /// mode, out-of-range slot identity, or an unrecognized request.
    InvalidArgument = 1,
    /// No channel selected, or the channel does not exist on read.
    InvalidOperation = 2,
    /// Write length out of bounds, or read capacity below message size.
    SizeViolation = 3,
    /// The channel exists but holds no message.
    NoData = 4,
    /// Transferring the message bytes to or from the caller failed.
    Fault = 5,
    /// The server could not allocate a slot, channel, or buffer.
    Exhausted = 6,
}

impl TryFrom<u8> for Status {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Status::Ok),
            1 => Ok(Status::InvalidArgument),
            2 => Ok(Status::InvalidOperation),
            3 => Ok(Status::SizeViolation),
            4 => Ok(Status::NoData),
            5 => Ok(Status::Fault),
            6 => Ok(Status::Exhausted),
            other => Err(WireError::UnknownStatus(other)),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Ok => "ok",
            Status::InvalidArgument => "invalid argument",
            Status::InvalidOperation => "invalid operation",
            Status::SizeViolation => "size violation",
            Status::NoData => "no data",
            Status::Fault => "fault",
            Status::Exhausted => "resource exhaustion",
        };
        f.write_str(name)
    }
}

/// A server response: a status plus an optional payload (message bytes
/// for a successful read, the stored length for a successful write).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub payload: Bytes,
}

impl Response {
    /// A bare success with no payload.
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            payload: Bytes::new(),
        }
    }

    /// A successful read carrying the message bytes.
    pub fn message(payload: impl Into<Bytes>) -> Self {
        Self {
            status: Status::Ok,
            payload: payload.into(),
        }
    }

    /// A successful write reporting the stored length.
    pub fn written(len: u32) -> Self {
        Self {
            status: Status::Ok,
            payload: Bytes::copy_from_slice(&len.to_le_bytes()),
        }
    }

    /// An error response with the given status.
    pub fn error(status: Status) -> Self {
        Self {
            status,
            payload: Bytes::new(),
        }
    }

    /// Parse the stored-length payload of a successful write.
    pub fn written_len(&self) -> Result<u32> {
        let bytes: [u8; 4] =
            self.payload
                .as_ref()
                .try_into()
                .map_err(|_| WireError::MalformedField {
                    field: "written length",
                    expected: 4,
                    got: self.payload.len(),
                })?;
        Ok(u32::from_le_bytes(bytes))
    }
}

/// Encode a request into the wire format.
pub fn encode_request(request: &Request, dst: &mut BytesMut) -> Result<()> {
    match request {
        Request::Open { slot } => put_frame(dst, OP_OPEN, &slot.to_le_bytes()),
        Request::SelectChannel { channel } => put_frame(dst, OP_SELECT, &channel.to_le_bytes()),
        Request::SetCensorship { mode } => put_frame(dst, OP_CENSOR, &mode.to_le_bytes()),
        Request::Write { message } => put_frame(dst, OP_WRITE, message),
        Request::Read { capacity } => put_frame(dst, OP_READ, &capacity.to_le_bytes()),
    }
}

/// Encode a response into the wire format.
pub fn encode_response(response: &Response, dst: &mut BytesMut) -> Result<()> {
    put_frame(dst, response.status as u8, &response.payload)
}

fn put_frame(dst: &mut BytesMut, tag: u8, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(WireError::FrameTooLarge {
            size: payload.len(),
            max: MAX_FRAME_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u8(tag);
    dst.put_u16_le(payload.len() as u16);
    dst.put_slice(payload);
    Ok(())
}

/// Split one complete frame off the buffer, or `None` if more bytes are
/// needed. The frame is consumed even when the tag later turns out to
/// be unknown, keeping the stream in sync.
fn take_frame(src: &mut BytesMut) -> Result<Option<(u8, Bytes)>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    if src[0..2] != MAGIC {
        return Err(WireError::InvalidMagic);
    }

    let tag = src[2];
    let payload_len = usize::from(u16::from_le_bytes([src[3], src[4]]));
    if payload_len > MAX_FRAME_PAYLOAD {
        return Err(WireError::FrameTooLarge {
            size: payload_len,
            max: MAX_FRAME_PAYLOAD,
        });
    }

    if src.len() < HEADER_SIZE + payload_len {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();
    Ok(Some((tag, payload)))
}

fn u32_field(payload: &Bytes, field: &'static str) -> Result<u32> {
    let bytes: [u8; 4] = payload
        .as_ref()
        .try_into()
        .map_err(|_| WireError::MalformedField {
            field,
            expected: 4,
            got: payload.len(),
        })?;
    Ok(u32::from_le_bytes(bytes))
}

/// Decode a request from the buffer.
///
/// Returns `Ok(None)` when the buffer does not yet hold a complete
/// frame. [`WireError::UnknownOpcode`] and [`WireError::MalformedField`]
/// consume the frame first, so callers can report them and continue.
pub fn decode_request(src: &mut BytesMut) -> Result<Option<Request>> {
    let Some((opcode, payload)) = take_frame(src)? else {
        return Ok(None);
    };

    let request = match opcode {
        OP_OPEN => Request::Open {
            slot: u32_field(&payload, "slot identity")?,
        },
        OP_SELECT => Request::SelectChannel {
            channel: u32_field(&payload, "channel id")?,
        },
        OP_CENSOR => Request::SetCensorship {
            mode: u32_field(&payload, "censorship mode")?,
        },
        OP_WRITE => Request::Write { message: payload },
        OP_READ => Request::Read {
            capacity: u32_field(&payload, "capacity")?,
        },
        other => return Err(WireError::UnknownOpcode(other)),
    };
    Ok(Some(request))
}

/// Decode a response from the buffer. `Ok(None)` means more bytes are
/// needed.
pub fn decode_response(src: &mut BytesMut) -> Result<Option<Response>> {
    let Some((tag, payload)) = take_frame(src)? else {
        return Ok(None);
    };
    Ok(Some(Response {
        status: Status::try_from(tag)?,
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(request: Request) -> Request {
        let mut buf = BytesMut::new();
        encode_request(&request, &mut buf).unwrap();
        let decoded = decode_request(&mut buf).unwrap().unwrap();
        assert!(buf.is_empty());
        decoded
    }

    #[test]
    fn request_roundtrips() {
        assert_eq!(roundtrip(Request::Open { slot: 200 }), Request::Open { slot: 200 });
        assert_eq!(
            roundtrip(Request::SelectChannel { channel: 7 }),
            Request::SelectChannel { channel: 7 }
        );
        assert_eq!(
            roundtrip(Request::SetCensorship { mode: 1 }),
            Request::SetCensorship { mode: 1 }
        );
        assert_eq!(
            roundtrip(Request::Write {
                message: Bytes::from_static(b"hello")
            }),
            Request::Write {
                message: Bytes::from_static(b"hello")
            }
        );
        assert_eq!(
            roundtrip(Request::Read { capacity: 128 }),
            Request::Read { capacity: 128 }
        );
    }

    #[test]
    fn response_roundtrips() {
        let mut buf = BytesMut::new();
        encode_response(&Response::message(&b"he#lo"[..]), &mut buf).unwrap();
        encode_response(&Response::error(Status::NoData), &mut buf).unwrap();

        let first = decode_response(&mut buf).unwrap().unwrap();
        assert_eq!(first.status, Status::Ok);
        assert_eq!(first.payload.as_ref(), b"he#lo");

        let second = decode_response(&mut buf).unwrap().unwrap();
        assert_eq!(second.status, Status::NoData);
        assert!(second.payload.is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn written_len_helper() {
        let resp = Response::written(5);
        assert_eq!(resp.written_len().unwrap(), 5);

        let garbage = Response::message(&b"xyz"[..]);
        assert!(matches!(
            garbage.written_len(),
            Err(WireError::MalformedField { .. })
        ));
    }

    #[test]
    fn incomplete_frames_need_more_data() {
        let mut buf = BytesMut::from(&MAGIC[..]);
        assert!(decode_request(&mut buf).unwrap().is_none());

        let mut buf = BytesMut::new();
        encode_request(
            &Request::Write {
                message: Bytes::from_static(b"partial"),
            },
            &mut buf,
        )
        .unwrap();
        buf.truncate(HEADER_SIZE + 3);
        assert!(decode_request(&mut buf).unwrap().is_none());
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut buf = BytesMut::from(&[0xFF, 0xFF, 0x01, 0x00, 0x00][..]);
        assert!(matches!(
            decode_request(&mut buf),
            Err(WireError::InvalidMagic)
        ));
    }

    #[test]
    fn unknown_opcode_consumes_the_frame() {
        let mut buf = BytesMut::new();
        put_frame(&mut buf, 0x7F, b"junk").unwrap();
        encode_request(&Request::Read { capacity: 16 }, &mut buf).unwrap();

        let err = decode_request(&mut buf).unwrap_err();
        assert!(matches!(err, WireError::UnknownOpcode(0x7F)));
        assert!(err.is_recoverable());

        // The stream stays framed; the next request decodes normally.
        let next = decode_request(&mut buf).unwrap().unwrap();
        assert_eq!(next, Request::Read { capacity: 16 });
    }

    #[test]
    fn malformed_numeric_field_is_recoverable() {
        let mut buf = BytesMut::new();
        put_frame(&mut buf, 0x02, b"xx").unwrap();

        let err = decode_request(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            WireError::MalformedField {
                field: "channel id",
                expected: 4,
                got: 2
            }
        ));
        assert!(err.is_recoverable());
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_frame_rejected_both_ways() {
        let big = vec![0u8; MAX_FRAME_PAYLOAD + 1];
        let mut buf = BytesMut::new();
        assert!(matches!(
            encode_request(
                &Request::Write {
                    message: Bytes::from(big)
                },
                &mut buf
            ),
            Err(WireError::FrameTooLarge { .. })
        ));

        let mut wire = BytesMut::new();
        wire.put_slice(&MAGIC);
        wire.put_u8(0x04);
        wire.put_u16_le(u16::MAX);
        assert!(matches!(
            decode_request(&mut wire),
            Err(WireError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn unknown_status_rejected() {
        let mut buf = BytesMut::new();
        put_frame(&mut buf, 0x2A, b"").unwrap();
        assert!(matches!(
            decode_response(&mut buf),
            Err(WireError::UnknownStatus(0x2A))
        ));
    }
}
