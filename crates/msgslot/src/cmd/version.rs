use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("msgslot {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: msgslot");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("MSGSLOT_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("max_message_len: {}", msgslot_core::MAX_MSG_LEN);
    println!("max_slots: {}", msgslot_core::MAX_SLOTS);

    Ok(SUCCESS)
}
