/// File name of the debug log inside the temp directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "volume_protect.log";

/// Upper bound on a user-supplied log path.
pub const MAX_LOG_PATH_BYTES: usize = 1024;
