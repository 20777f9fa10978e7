use msgslot_service::SlotClient;

use crate::cmd::RecvArgs;
use crate::exit::{service_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: RecvArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client =
        SlotClient::open(&args.path, args.slot).map_err(|err| service_error("open failed", err))?;
    client
        .select_channel(args.channel)
        .map_err(|err| service_error("select channel failed", err))?;
    let message = client
        .read(args.capacity)
        .map_err(|err| service_error("read failed", err))?;

    print_message(args.slot, args.channel, message.as_ref(), format);
    Ok(SUCCESS)
}
