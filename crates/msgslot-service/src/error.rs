use std::path::PathBuf;

use msgslot_wire::Status;

/// Errors that can occur hosting or calling the slot service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Failed to bind the service socket.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to the service socket.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// The socket path is too long for `sockaddr_un`.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// Protocol-level failure on the connection.
    #[error("wire error: {0}")]
    Wire(#[from] msgslot_wire::WireError),

    /// The server answered with a non-ok status.
    #[error("request rejected: {0}")]
    Rejected(Status),
}

impl ServiceError {
    /// The server status behind this error, if it is a rejection.
    pub fn status(&self) -> Option<Status> {
        match self {
            ServiceError::Rejected(status) => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
