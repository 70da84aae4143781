//! Local artifact layout (`downloads/{id}.mp3`, `ogg_files/{id}.ogg`) and retention after send.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};
use vnote_core::AudioFormat;

pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";
pub const DEFAULT_OGG_DIR: &str = "ogg_files";

/// What happens to artifacts once the voice message was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Leave files on disk; a re-delivered document skips conversion.
    #[default]
    Keep,
    /// Remove both artifacts of the document after a successful send.
    DeleteAfterSend,
}

impl FromStr for RetentionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(RetentionPolicy::Keep),
            "delete" | "delete-after-send" => Ok(RetentionPolicy::DeleteAfterSend),
            other => Err(format!(
                "unknown retention policy '{}', expected 'keep' or 'delete'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    downloads_dir: PathBuf,
    ogg_dir: PathBuf,
    retention: RetentionPolicy,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOADS_DIR, DEFAULT_OGG_DIR, RetentionPolicy::Keep)
    }
}

impl ArtifactStore {
    pub fn new(
        downloads_dir: impl Into<PathBuf>,
        ogg_dir: impl Into<PathBuf>,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            ogg_dir: ogg_dir.into(),
            retention,
        }
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn mp3_path(&self, document_id: &str) -> PathBuf {
        self.downloads_dir.join(format!("{}.mp3", document_id))
    }

    pub fn ogg_path(&self, document_id: &str) -> PathBuf {
        self.ogg_dir.join(format!("{}.ogg", document_id))
    }

    /// Where a downloaded document of `format` lands. OGG goes straight to the ogg directory.
    pub fn download_path(&self, document_id: &str, format: AudioFormat) -> PathBuf {
        match format {
            AudioFormat::Mp3 => self.mp3_path(document_id),
            AudioFormat::Ogg => self.ogg_path(document_id),
        }
    }

    /// Applies the retention policy after a successful send. Returns the removed paths.
    pub async fn release(&self, document_id: &str) -> Vec<PathBuf> {
        if self.retention == RetentionPolicy::Keep {
            return Vec::new();
        }
        let mut removed = Vec::new();
        for path in [self.mp3_path(document_id), self.ogg_path(document_id)] {
            if remove_if_exists(&path).await {
                removed.push(path);
            }
        }
        removed
    }
}

async fn remove_if_exists(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed artifact");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove artifact");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let store = ArtifactStore::default();
        assert_eq!(store.mp3_path("42"), PathBuf::from("downloads/42.mp3"));
        assert_eq!(store.ogg_path("42"), PathBuf::from("ogg_files/42.ogg"));
        assert_eq!(
            store.download_path("42", AudioFormat::Ogg),
            PathBuf::from("ogg_files/42.ogg")
        );
        assert_eq!(store.retention(), RetentionPolicy::Keep);
    }

    #[test]
    fn test_retention_from_str() {
        assert_eq!("keep".parse::<RetentionPolicy>(), Ok(RetentionPolicy::Keep));
        assert_eq!(" Delete ".parse::<RetentionPolicy>(), Ok(RetentionPolicy::DeleteAfterSend));
        assert!("forever".parse::<RetentionPolicy>().is_err());
    }

    #[tokio::test]
    async fn test_release_keep_leaves_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path(), dir.path(), RetentionPolicy::Keep);
        tokio::fs::write(store.ogg_path("7"), b"x").await.unwrap();

        assert!(store.release("7").await.is_empty());
        assert!(store.ogg_path("7").exists());
    }

    #[tokio::test]
    async fn test_release_delete_removes_existing_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(
            dir.path().join("downloads"),
            dir.path().join("ogg"),
            RetentionPolicy::DeleteAfterSend,
        );
        tokio::fs::create_dir_all(dir.path().join("ogg")).await.unwrap();
        tokio::fs::write(store.ogg_path("7"), b"x").await.unwrap();

        let removed = store.release("7").await;

        assert_eq!(removed, vec![store.ogg_path("7")]);
        assert!(!store.ogg_path("7").exists());
    }
}
