use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod recv;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Host the slot registry on a Unix socket.
    Serve(ServeArgs),
    /// Write one message to a channel and exit.
    Send(SendArgs),
    /// Read the pending message from a channel and exit.
    Recv(RecvArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Send(args) => send::run(args),
        Command::Recv(args) => recv::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Socket path to bind.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Slot identity (0-255).
    #[arg(long, short = 's')]
    pub slot: u32,
    /// Channel to write to (non-zero).
    #[arg(long, short = 'c')]
    pub channel: u32,
    /// Censorship mode: 0 off, 1 on (validated by the service).
    #[arg(long, default_value = "0")]
    pub censor: u32,
    /// Message text.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read the message from a file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RecvArgs {
    /// Socket path to connect to.
    pub path: PathBuf,
    /// Slot identity (0-255).
    #[arg(long, short = 's')]
    pub slot: u32,
    /// Channel to read from (non-zero).
    #[arg(long, short = 'c')]
    pub channel: u32,
    /// Destination buffer capacity offered for the read.
    #[arg(long, default_value_t = msgslot_core::MAX_MSG_LEN as u32)]
    pub capacity: u32,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
