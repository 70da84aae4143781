//! MP3 → Opus-in-Ogg conversion.
//!
//! [`AudioConverter`] owns the filesystem rules (skip when the output exists, create the output
//! directory, bound the call in time) and delegates encoding to an [`Encoder`]. The production
//! encoder is [`FfmpegEncoder`]. Encoders write to a `.part` sibling that is renamed onto the
//! output only after success, so an existing output is always complete.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Default encoder time limit.
pub const DEFAULT_ENCODER_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("failed to launch encoder '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("encoder exited with code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("encoder timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to prepare output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConversionError> for vnote_core::VnoteError {
    fn from(e: ConversionError) -> Self {
        vnote_core::VnoteError::Conversion(e.to_string())
    }
}

/// Result of [`AudioConverter::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertStatus {
    Converted,
    /// Output already existed; the encoder was not invoked.
    Skipped,
}

/// Transcodes one file into Opus-in-Ogg.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ConversionError>;
}

/// Runs `ffmpeg` as a child process. The child is killed if the encode future is dropped.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Argument list for one conversion.
    pub fn args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            "-c:a".into(),
            "libopus".into(),
            "-f".into(),
            "ogg".into(),
            output.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode(&self, input: &Path, output: &Path) -> Result<(), ConversionError> {
        let program = self.program.display().to_string();
        debug!(program = %program, input = %input.display(), output = %output.display(), "Spawning encoder");

        let child = Command::new(&self.program)
            .args(Self::args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ConversionError::Spawn {
                program: program.clone(),
                source,
            })?;

        let out = child
            .wait_with_output()
            .await
            .map_err(|source| ConversionError::Spawn { program, source })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            return Err(ConversionError::Failed {
                code: out.status.code(),
                stderr,
            });
        }
        Ok(())
    }
}

/// Encoder program and time limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub program: PathBuf,
    pub timeout: Duration,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            timeout: DEFAULT_ENCODER_TIMEOUT,
        }
    }
}

/// Idempotent, time-bounded converter.
#[derive(Clone)]
pub struct AudioConverter {
    encoder: Arc<dyn Encoder>,
    timeout: Duration,
}

impl AudioConverter {
    pub fn new(encoder: Arc<dyn Encoder>, timeout: Duration) -> Self {
        Self { encoder, timeout }
    }

    /// Converter backed by [`FfmpegEncoder`].
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(
            Arc::new(FfmpegEncoder::new(config.program.clone())),
            config.timeout,
        )
    }

    /// Converts `input` to `output`. A non-empty existing `output` is left untouched.
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub async fn convert(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<ConvertStatus, ConversionError> {
        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => {
                info!("Output already exists, skipping conversion");
                return Ok(ConvertStatus::Skipped);
            }
            Ok(_) => warn!("Output exists but is empty, converting again"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ConversionError::Output {
                    path: output.to_path_buf(),
                    source,
                })
            }
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConversionError::Output {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let partial = partial_path(output);
        let encoded = match tokio::time::timeout(self.timeout, self.encoder.encode(input, &partial)).await {
            Ok(result) => result,
            Err(_) => Err(ConversionError::Timeout(self.timeout)),
        };
        if let Err(e) = encoded {
            discard(&partial).await;
            return Err(e);
        }

        if let Err(source) = tokio::fs::rename(&partial, output).await {
            discard(&partial).await;
            return Err(ConversionError::Output {
                path: output.to_path_buf(),
                source,
            });
        }

        info!("Conversion finished");
        Ok(ConvertStatus::Converted)
    }
}

/// `a.ogg` → `a.ogg.part` in the same directory, so the final rename stays on one filesystem.
fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    output.with_file_name(name)
}

async fn discard(partial: &Path) {
    match tokio::fs::remove_file(partial).await {
        Ok(()) => debug!(path = %partial.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %partial.display(), error = %e, "Failed to remove partial output"),
    }
}
