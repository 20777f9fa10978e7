use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use msgslot_service::SlotListener;

use crate::cmd::ServeArgs;
use crate::exit::{service_error, CliError, CliResult, SUCCESS};

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let listener =
        SlotListener::bind(&args.path).map_err(|err| service_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    while running.load(Ordering::SeqCst) {
        let mut session = match listener.accept() {
            Ok(session) => session,
            Err(err) => return Err(service_error("accept failed", err)),
        };

        std::thread::spawn(move || {
            let id = session.id();
            if let Err(err) = session.serve() {
                tracing::warn!(session = id, error = %err, "session ended with error");
            }
        });
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
