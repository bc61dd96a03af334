use anyhow::{bail, Result};
use crossbeam_channel::tick;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use volume_protect::{log_debug, prompt};

/// Flag set by the SIGINT/SIGTERM handler.
static TERMINATION_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Only flips an atomic (async-signal-safe); the main thread shows the notice.
extern "C" fn handle_termination(_: libc::c_int) {
    TERMINATION_REQUESTED.store(true, Ordering::SeqCst);
}

/// The process dies as soon as this handler returns, so the notice has to be
/// shown from inside it.
extern "C" fn handle_abort(_: libc::c_int) {
    prompt::show_exit_notice();
}

fn install(signal: libc::c_int, handler: extern "C" fn(libc::c_int)) -> Result<()> {
    // SAFETY: both handlers are extern "C" functions that live for the whole process.
    let previous = unsafe { libc::signal(signal, handler as *const () as libc::sighandler_t) };
    if previous == libc::SIG_ERR {
        log_debug(&format!("failed to install handler for signal {signal}"));
        bail!("failed to install handler for signal {signal}");
    }
    Ok(())
}

pub(crate) fn install_termination_handlers() -> Result<()> {
    install(libc::SIGINT, handle_termination)?;
    install(libc::SIGTERM, handle_termination)?;
    install(libc::SIGABRT, handle_abort)?;
    Ok(())
}

pub(crate) fn termination_requested() -> bool {
    TERMINATION_REQUESTED.load(Ordering::SeqCst)
}

/// Park the main thread until a termination signal arrives.
pub(crate) fn wait_for_termination(poll: Duration) {
    let ticker = tick(poll);
    while !termination_requested() {
        if ticker.recv().is_err() {
            break;
        }
    }
    log_debug("termination requested");
}
