use std::os::unix::net::UnixStream;
use std::sync::Arc;

use bytes::Bytes;
use msgslot_core::{SlotError, SlotHandle, SlotRegistry, MAX_MSG_LEN, MAX_SLOTS};
use msgslot_wire::{Request, Response, Status, WireError, WireStream};
use tracing::{debug, warn};

use crate::error::Result;

/// One accepted connection: a wire stream plus, once the client has
/// opened a slot, the connection handle.
///
/// The handle is created by the first `Open` request and dropped with
/// the session, which releases only per-connection state; the slot and
/// its channels stay in the registry.
pub struct Session {
    stream: WireStream<UnixStream>,
    registry: Arc<SlotRegistry>,
    id: u64,
    handle: Option<SlotHandle>,
}

impl Session {
    pub(crate) fn new(stream: UnixStream, registry: Arc<SlotRegistry>, id: u64) -> Self {
        Self {
            stream: WireStream::new(stream),
            registry,
            id,
            handle: None,
        }
    }

    /// The listener-assigned session id, for diagnostics.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Serve requests until the client disconnects.
    ///
    /// Recoverable decode failures (unknown opcode, malformed field)
    /// are answered with an invalid-argument status and the session
    /// continues; anything else ends it.
    pub fn serve(&mut self) -> Result<()> {
        loop {
            let request = match self.stream.recv_request() {
                Ok(request) => request,
                Err(WireError::ConnectionClosed) => {
                    debug!(session = self.id, "client disconnected");
                    return Ok(());
                }
                Err(err) if err.is_recoverable() => {
                    warn!(session = self.id, error = %err, "rejecting unrecognized request");
                    self.stream
                        .send_response(&Response::error(Status::InvalidArgument))?;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let response = self.dispatch(request);
            self.stream.send_response(&response)?;
        }
    }

    fn dispatch(&mut self, request: Request) -> Response {
        if let Request::Open { slot } = request {
            return self.open(slot);
        }

        // Everything else needs an open handle first.
        let Some(handle) = self.handle.as_mut() else {
            warn!(session = self.id, "request before open");
            return Response::error(Status::InvalidOperation);
        };

        match request {
            Request::Open { .. } => unreachable!("handled above"),
            Request::SelectChannel { channel } => reply_unit(handle.select_channel(channel)),
            Request::SetCensorship { mode } => reply_unit(handle.set_censorship(mode)),
            Request::Write { message } => match handle.write(&message) {
                Ok(stored) => Response::written(stored as u32),
                Err(err) => Response::error(status_for(&err)),
            },
            Request::Read { capacity } => {
                // Messages never exceed MAX_MSG_LEN, so a larger caller
                // capacity buys nothing; clamping bounds the allocation.
                let mut buf = vec![0u8; (capacity as usize).min(MAX_MSG_LEN)];
                match handle.read(&mut buf) {
                    Ok(len) => Response::message(Bytes::copy_from_slice(&buf[..len])),
                    Err(err) => Response::error(status_for(&err)),
                }
            }
        }
    }

    /// Resolve the slot identity and bind this session to the slot,
    /// creating it on first open. This is the layer that enforces the
    /// identity range; the registry itself never sees an out-of-range
    /// value.
    fn open(&mut self, slot: u32) -> Response {
        if slot >= MAX_SLOTS as u32 {
            warn!(session = self.id, slot, "slot identity out of range");
            return Response::error(Status::InvalidArgument);
        }
        self.handle = Some(self.registry.open(slot as u8));
        debug!(session = self.id, slot, "session opened slot");
        Response::ok()
    }
}

fn reply_unit(result: msgslot_core::Result<()>) -> Response {
    match result {
        Ok(()) => Response::ok(),
        Err(err) => Response::error(status_for(&err)),
    }
}

fn status_for(err: &SlotError) -> Status {
    match err {
        SlotError::ReservedChannelId | SlotError::InvalidCensorshipMode(_) => {
            Status::InvalidArgument
        }
        SlotError::NoChannelSelected | SlotError::ChannelNotFound(_) => Status::InvalidOperation,
        SlotError::MessageSize { .. } | SlotError::InsufficientCapacity { .. } => {
            Status::SizeViolation
        }
        SlotError::NoMessage(_) => Status::NoData,
    }
}
