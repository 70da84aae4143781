//! Tracing setup: human-readable stdout plus a rotating JSON log file.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Default log file when `LOG_FILE` is not set.
pub const DEFAULT_LOG_FILE: &str = "vnote.log";

/// Rotated files kept next to the active one.
pub const MAX_LOG_FILES: usize = 7;

/// Daily-rotated appender for `log_file_path`: `logs/vnote.log` writes `logs/vnote.<date>.log`
/// and keeps at most [`MAX_LOG_FILES`] files.
pub fn rolling_appender(log_file_path: impl AsRef<Path>) -> anyhow::Result<RollingFileAppender> {
    let path = log_file_path.as_ref();
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let prefix = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("vnote");
    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(MAX_LOG_FILES);
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        builder = builder.filename_suffix(ext);
    }
    builder
        .build(&dir)
        .with_context(|| format!("failed to open log file in {}", dir.display()))
}

/// Installs the global subscriber: stdout fmt layer and a JSON layer on [`rolling_appender`].
/// Level comes from RUST_LOG, `info` when unset. Call after `.env` is loaded.
pub fn init_tracing(log_file_path: impl AsRef<Path>) -> anyhow::Result<()> {
    let appender = rolling_appender(log_file_path)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(io::stdout)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false);

    let file_layer = fmt::layer().json().with_writer(appender).with_ansi(false);

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}
