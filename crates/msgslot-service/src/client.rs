use std::os::unix::net::UnixStream;
use std::path::Path;

use bytes::Bytes;
use msgslot_wire::{Request, Response, Status, WireStream};
use tracing::debug;

use crate::error::{Result, ServiceError};

/// Client side of the slot service: one connection, one handle.
///
/// Opening never fails because the slot is absent; the service creates
/// it lazily. Dropping the client closes the connection, which releases
/// the server-side handle and nothing else.
#[derive(Debug)]
pub struct SlotClient {
    stream: WireStream<UnixStream>,
}

impl SlotClient {
    /// Connect to the service at `path` and open a handle on `slot`.
    pub fn open(path: impl AsRef<Path>, slot: u32) -> Result<Self> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|e| ServiceError::Connect {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(?path, slot, "connected to slot service");

        let mut client = Self {
            stream: WireStream::new(stream),
        };
        client.call(Request::Open { slot })?;
        Ok(client)
    }

    /// Select the channel for subsequent reads and writes.
    pub fn select_channel(&mut self, channel: u32) -> Result<()> {
        self.call(Request::SelectChannel { channel })?;
        Ok(())
    }

    /// Set the censorship mode (0 disables, 1 enables; validated by the
    /// service).
    pub fn set_censorship(&mut self, mode: u32) -> Result<()> {
        self.call(Request::SetCensorship { mode })?;
        Ok(())
    }

    /// Store a message on the selected channel; returns the stored
    /// length.
    pub fn write(&mut self, message: &[u8]) -> Result<usize> {
        let response = self.call(Request::Write {
            message: Bytes::copy_from_slice(message),
        })?;
        Ok(response.written_len()? as usize)
    }

    /// Retrieve the selected channel's message, offering a destination
    /// of `capacity` bytes.
    pub fn read(&mut self, capacity: u32) -> Result<Bytes> {
        let response = self.call(Request::Read { capacity })?;
        Ok(response.payload)
    }

    fn call(&mut self, request: Request) -> Result<Response> {
        self.stream.send_request(&request)?;
        let response = self.stream.recv_response()?;
        if response.status == Status::Ok {
            Ok(response)
        } else {
            Err(ServiceError::Rejected(response.status))
        }
    }
}
