//! Command-line parsing and validation helpers.
//!
//! None of these options touch the protection policy: the ceiling is a
//! compile-time constant and the override never survives a restart.

mod defaults;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{DEFAULT_LOG_FILE_NAME, MAX_LOG_PATH_BYTES};

/// CLI options for the volume monitor.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "volume-protect",
    about = "Volume Level Protector: keeps headphone volume under a safe ceiling",
    author,
    version
)]
pub struct AppConfig {
    /// Enable file logging (debug log plus JSON trace)
    #[arg(long = "logs", env = "VOLUME_PROTECT_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOLUME_PROTECT_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Debug log location (defaults to a file in the temp directory)
    #[arg(long = "log-file", env = "VOLUME_PROTECT_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the default output endpoint's volume and jack state, then exit
    #[arg(long = "probe", default_value_t = false)]
    pub probe: bool,
}

impl AppConfig {
    /// True when file logging should be active after flag precedence is applied.
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }

    /// Resolved debug log path.
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(crate::logging::default_log_file_path)
    }
}
