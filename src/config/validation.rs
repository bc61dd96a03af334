use super::{AppConfig, MAX_LOG_PATH_BYTES};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::Path;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize the log path.
    pub fn validate(&mut self) -> Result<()> {
        if let Some(path) = self.log_file.take() {
            let normalized = validate_log_path(&path)?;
            self.log_file = Some(normalized);
        }

        Ok(())
    }
}

/// The log file may not exist yet, but its directory must.
pub(super) fn validate_log_path(path: &Path) -> Result<std::path::PathBuf> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        bail!("--log-file cannot be empty");
    }
    if raw.len() > MAX_LOG_PATH_BYTES {
        bail!("--log-file must be at most {MAX_LOG_PATH_BYTES} bytes");
    }
    if path.is_dir() {
        bail!("--log-file '{}' is a directory", path.display());
    }

    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file '{}' has no file name", path.display()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = parent.canonicalize().with_context(|| {
        format!(
            "--log-file directory '{}' does not exist",
            parent.display()
        )
    })?;
    Ok(parent.join(file_name))
}
