//! Opt-in debug log and crash log.
//!
//! The monitor normally runs without a console, so diagnostics go to files in the
//! temp directory. Both files are size-capped and truncated instead of growing
//! forever across long sessions.

use crate::config::AppConfig;
use std::{
    env, fs,
    io::Write,
    panic,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_MAX_BYTES: u64 = 2 * 1024 * 1024;
const CRASH_LOG_MAX_BYTES: u64 = 128 * 1024;
static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static CRASH_LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_STATE: OnceLock<Mutex<LogState>> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Default location of the debug log.
pub fn default_log_file_path() -> PathBuf {
    env::temp_dir().join(crate::config::DEFAULT_LOG_FILE_NAME)
}

/// Path to the crash log file (panic location and message only).
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("volume_protect_crash.log")
}

struct LogWriter {
    path: PathBuf,
    file: fs::File,
    max_bytes: u64,
    bytes_written: u64,
}

impl LogWriter {
    fn new(path: PathBuf, max_bytes: u64) -> Option<Self> {
        let mut bytes_written = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if bytes_written > max_bytes {
            let _ = fs::remove_file(&path);
            bytes_written = 0;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        Some(Self {
            path,
            file,
            max_bytes,
            bytes_written,
        })
    }

    fn rotate_if_needed(&mut self, next_len: usize) {
        if self.bytes_written.saturating_add(next_len as u64) <= self.max_bytes {
            return;
        }
        if let Ok(file) = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
        {
            self.file = file;
            self.bytes_written = 0;
        }
    }

    fn write_line(&mut self, line: &str) {
        self.rotate_if_needed(line.len());
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.bytes_written = self.bytes_written.saturating_add(line.len() as u64);
        }
    }
}

#[derive(Default)]
struct LogState {
    writer: Option<LogWriter>,
}

fn log_state() -> &'static Mutex<LogState> {
    LOG_STATE.get_or_init(|| Mutex::new(LogState::default()))
}

fn open_writer(enabled: bool, path: &Path, max_bytes: u64) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    CRASH_LOG_ENABLED.store(enabled, Ordering::Relaxed);
    let mut state = log_state()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    state.writer = if enabled {
        LogWriter::new(path.to_path_buf(), max_bytes)
    } else {
        None
    };
}

/// Configure file logging from CLI flags or environment.
pub fn init_logging(config: &AppConfig) {
    open_writer(config.logging_enabled(), &config.log_file_path(), LOG_MAX_BYTES);
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Append a line to the debug log when logging is enabled.
pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = format!("[{}] {msg}\n", timestamp());
    let mut state = log_state()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(writer) = state.writer.as_mut() {
        writer.write_line(&line);
    }
}

/// Write a crash log entry for a panic.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !CRASH_LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    let payload = if let Some(text) = info.payload().downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = info.payload().downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    };
    let thread = std::thread::current()
        .name()
        .unwrap_or("unnamed")
        .to_string();

    let line = format!(
        "[{}] panic in thread '{thread}' at {location}: {payload} (v{})\n",
        timestamp(),
        env!("CARGO_PKG_VERSION")
    );
    let path = crash_log_path();
    let existing = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    let truncate = existing.saturating_add(line.len() as u64) > CRASH_LOG_MAX_BYTES;
    let mut options = fs::OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    if let Ok(mut file) = options.open(&path) {
        let _ = file.write_all(line.as_bytes());
    }
}

/// Chain a hook that records panics from any thread (notification callbacks,
/// the confirmation worker) before the default handler runs.
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            log_panic(info);
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            log_debug(&format!("panic at {location}"));
            previous(info);
        }));
    });
}

#[cfg(test)]
pub(crate) fn set_logging_for_tests(enabled: bool, path: &Path) {
    open_writer(enabled, path, LOG_MAX_BYTES);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_truncates_when_budget_is_exceeded() {
        let path = env::temp_dir().join(format!(
            "volume_protect_writer_test_{}.log",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        let mut writer = LogWriter::new(path.clone(), 16).expect("open log writer");
        writer.write_line("0123456789\n");
        writer.write_line("abcdefghij\n");
        let contents = fs::read_to_string(&path).expect("read log");
        assert_eq!(contents, "abcdefghij\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn log_debug_writes_only_when_enabled() {
        let path = env::temp_dir().join(format!(
            "volume_protect_debug_test_{}.log",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        set_logging_for_tests(true, &path);
        log_debug("clamp applied");
        set_logging_for_tests(false, &path);
        log_debug("should not appear");

        let contents = fs::read_to_string(&path).expect("read log");
        assert!(contents.contains("clamp applied"));
        assert!(!contents.contains("should not appear"));
        let _ = fs::remove_file(&path);
    }
}
