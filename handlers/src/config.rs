//! Pipeline settings: artifact directories, encoder, retention.
//! Loaded from DOWNLOADS_DIR, OGG_DIR, FFMPEG_PATH, FFMPEG_TIMEOUT_SECS, ARTIFACT_RETENTION.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use audio_converter::{
    ArtifactStore, ConverterConfig, RetentionPolicy, DEFAULT_DOWNLOADS_DIR, DEFAULT_ENCODER_TIMEOUT,
    DEFAULT_OGG_DIR,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub downloads_dir: PathBuf,
    pub ogg_dir: PathBuf,
    pub converter: ConverterConfig,
    pub retention: RetentionPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from(DEFAULT_DOWNLOADS_DIR),
            ogg_dir: PathBuf::from(DEFAULT_OGG_DIR),
            converter: ConverterConfig::default(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads the process environment; every variable is optional.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let timeout = match non_empty("FFMPEG_TIMEOUT_SECS") {
            Some(v) => {
                let secs: u64 = v
                    .trim()
                    .parse()
                    .with_context(|| format!("FFMPEG_TIMEOUT_SECS must be a number of seconds, got '{}'", v))?;
                anyhow::ensure!(secs > 0, "FFMPEG_TIMEOUT_SECS must be greater than zero");
                Duration::from_secs(secs)
            }
            None => DEFAULT_ENCODER_TIMEOUT,
        };

        let retention = match non_empty("ARTIFACT_RETENTION") {
            Some(v) => v.parse::<RetentionPolicy>().map_err(anyhow::Error::msg)?,
            None => RetentionPolicy::default(),
        };

        Ok(Self {
            downloads_dir: non_empty("DOWNLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOADS_DIR)),
            ogg_dir: non_empty("OGG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OGG_DIR)),
            converter: ConverterConfig {
                program: non_empty("FFMPEG_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("ffmpeg")),
                timeout,
            },
            retention,
        })
    }

    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(self.downloads_dir.clone(), self.ogg_dir.clone(), self.retention)
    }
}
