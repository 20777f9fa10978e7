use std::io::{ErrorKind, Read, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{
    decode_request, decode_response, encode_request, encode_response, Request, Response,
};
use crate::error::{Result, WireError};

const INITIAL_BUFFER_CAPACITY: usize = 512;
const READ_CHUNK_SIZE: usize = 512;

/// A blocking framed stream speaking the msgslot protocol.
///
/// Both sides of the connection use the same type: clients send
/// requests and receive responses, the server does the reverse. Partial
/// reads and interrupted syscalls are handled internally, so callers
/// always see complete frames.
#[derive(Debug)]
pub struct WireStream<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Read + Write> WireStream<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Send one request (blocking).
    pub fn send_request(&mut self, request: &Request) -> Result<()> {
        let mut out = BytesMut::new();
        encode_request(request, &mut out)?;
        self.inner.write_all(&out)?;
        self.inner.flush()?;
        Ok(())
    }

    /// Send one response (blocking).
    pub fn send_response(&mut self, response: &Response) -> Result<()> {
        let mut out = BytesMut::new();
        encode_response(response, &mut out)?;
        self.inner.write_all(&out)?;
        self.inner.flush()?;
        Ok(())
    }

    /// Receive the next request (blocking). EOF between frames yields
    /// [`WireError::ConnectionClosed`].
    pub fn recv_request(&mut self) -> Result<Request> {
        loop {
            match decode_request(&mut self.buf)? {
                Some(request) => return Ok(request),
                None => self.fill()?,
            }
        }
    }

    /// Receive the next response (blocking).
    pub fn recv_response(&mut self) -> Result<Response> {
        loop {
            match decode_response(&mut self.buf)? {
                Some(response) => return Ok(response),
                None => self.fill()?,
            }
        }
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => return Err(WireError::ConnectionClosed),
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    trace!(bytes = n, buffered = self.buf.len(), "filled frame buffer");
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Consume the stream and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Borrow the inner transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}
