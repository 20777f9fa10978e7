use std::fs;

use msgslot_service::SlotClient;

use crate::cmd::SendArgs;
use crate::exit::{service_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let message = resolve_message(&args)?;

    let mut client =
        SlotClient::open(&args.path, args.slot).map_err(|err| service_error("open failed", err))?;
    // Same order as the sender always used: censorship first, then the
    // channel, then one write.
    client
        .set_censorship(args.censor)
        .map_err(|err| service_error("set censorship failed", err))?;
    client
        .select_channel(args.channel)
        .map_err(|err| service_error("select channel failed", err))?;
    let stored = client
        .write(&message)
        .map_err(|err| service_error("write failed", err))?;

    tracing::info!(
        slot = args.slot,
        channel = args.channel,
        bytes = stored,
        "message sent"
    );
    Ok(SUCCESS)
}

fn resolve_message(args: &SendArgs) -> CliResult<Vec<u8>> {
    let message = if let Some(data) = &args.data {
        data.as_bytes().to_vec()
    } else if let Some(path) = &args.file {
        fs::read(path).map_err(|err| {
            crate::exit::io_error(&format!("failed reading {}", path.display()), err)
        })?
    } else {
        return Err(CliError::new(USAGE, "one of --data or --file is required"));
    };

    if message.is_empty() {
        return Err(CliError::new(USAGE, "message must not be empty"));
    }
    Ok(message)
}
