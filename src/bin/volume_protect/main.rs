//! Volume Level Protector entrypoint.
//!
//! # Threads
//!
//! - Main thread: installs signal handlers, then waits for termination
//! - Listener thread: opens the default endpoint and keeps the volume
//!   subscription alive
//! - Platform callback threads: run the guard for every volume change
//! - Confirmation workers: one short-lived thread per clamp, at most one shows a dialog

mod probe;
mod signals;

use anyhow::Result;
use std::time::Duration;
use volume_protect::config::AppConfig;
use volume_protect::{
    init_logging, init_tracing, install_panic_hook, log_debug, prompt, spawn_listener,
};

/// How often the main thread checks for a termination request.
const SIGNAL_POLL_MS: u64 = 200;

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    init_tracing(&config);
    install_panic_hook();

    if config.probe {
        return probe::run_probe();
    }

    log_debug("=== Volume Level Protector Started ===");
    log_debug(&format!("Log file: {:?}", config.log_file_path()));

    signals::install_termination_handlers()?;
    let _listener = spawn_listener(prompt::platform_prompt())?;

    signals::wait_for_termination(Duration::from_millis(SIGNAL_POLL_MS));
    prompt::show_exit_notice();
    log_debug("=== Volume Level Protector Exiting ===");
    Ok(())
}
