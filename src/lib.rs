//! Volume Level Protector.
//!
//! Watches the default audio output and pulls the master volume back to a safe
//! ceiling whenever headphones are plugged in, until the user explicitly agrees
//! to go louder for the rest of the session.

pub mod config;
pub mod endpoint;
pub mod guard;
mod lock;
mod logging;
pub mod monitor;
pub mod notify;
pub mod prompt;
mod telemetry;

pub(crate) use lock::lock_or_recover;
pub use guard::gate::{ConfirmationGate, ConfirmationOutcome};
pub use guard::{ConfirmationTask, Evaluation, VolumeEvent, VolumeGuard, VOLUME_CEILING};
pub use logging::{
    crash_log_path, default_log_file_path, init_logging, install_panic_hook, log_debug, log_panic,
};
pub use monitor::{spawn_listener, Monitor};
pub use telemetry::init_tracing;
