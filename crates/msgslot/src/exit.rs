use std::fmt;
use std::io;

use msgslot_service::ServiceError;
use msgslot_wire::{Status, WireError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
/// The channel exists but holds no message; scriptable polling relies
/// on this being distinct from other failures.
pub const NO_MESSAGE: i32 = 61;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn service_error(context: &str, err: ServiceError) -> CliError {
    match err {
        ServiceError::Bind { source, .. }
        | ServiceError::Connect { source, .. }
        | ServiceError::Accept(source) => io_error(context, source),
        ServiceError::PathTooLong { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        ServiceError::Wire(WireError::Io(source)) => io_error(context, source),
        ServiceError::Wire(other) => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
        ServiceError::Rejected(status) => {
            CliError::new(status_code(status), format!("{context}: {err}"))
        }
    }
}

fn status_code(status: Status) -> i32 {
    match status {
        Status::Ok => SUCCESS,
        Status::InvalidArgument => USAGE,
        Status::InvalidOperation | Status::SizeViolation => DATA_INVALID,
        Status::NoData => NO_MESSAGE,
        Status::Fault | Status::Exhausted => INTERNAL,
    }
}
