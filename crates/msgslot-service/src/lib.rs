//! Unix-socket hosting for the slot registry.
//!
//! [`SlotListener`] owns the process-wide [`SlotRegistry`] and binds a
//! Unix domain socket; each accepted connection becomes a [`Session`]
//! holding one connection handle. [`SlotClient`] is the other side of
//! the wire: the boundary contract used by the `send` and `recv`
//! command-line collaborators.
//!
//! Unix only, mirroring the device-file addressing model this service
//! replaces.

pub mod client;
pub mod error;
pub mod listener;
pub mod session;

pub use client::SlotClient;
pub use error::{Result, ServiceError};
pub use listener::SlotListener;
pub use session::Session;
