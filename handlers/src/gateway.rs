//! Transfer gateway: local filesystem side of downloads and uploads; bytes go through [`Transport`].

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use vnote_core::{
    Document, FormattingSpan, RemoteErrorKind, Result, Transport, VnoteError,
};

/// Moves documents between the target chat and local disk.
#[derive(Clone)]
pub struct TransferGateway {
    target_chat: i64,
    transport: Arc<dyn Transport>,
}

impl TransferGateway {
    pub fn new(target_chat: i64, transport: Arc<dyn Transport>) -> Self {
        Self {
            target_chat,
            transport,
        }
    }

    /// Creates the parent directory of `path` and streams `doc` into it.
    #[instrument(skip(self, doc), fields(document_id = %doc.id, path = %path.display()))]
    pub async fn download_file(&self, doc: &Document, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                VnoteError::download(
                    RemoteErrorKind::Other,
                    format!("failed to create download directory {}: {}", parent.display(), e),
                )
            })?;
        }
        self.transport.download(doc, path).await?;
        info!("Downloaded document");
        Ok(())
    }

    /// Opens a local OGG file and sends it to the target chat as a voice note.
    #[instrument(skip(self), fields(chat_id = self.target_chat, path = %path.display()))]
    pub async fn upload_voice(&self, path: &Path) -> Result<()> {
        let open_failed = |e: std::io::Error| {
            VnoteError::upload(
                RemoteErrorKind::Other,
                format!("cannot open {}: {}", path.display(), e),
            )
        };
        let file = tokio::fs::File::open(path).await.map_err(open_failed)?;
        let meta = file.metadata().await.map_err(open_failed)?;
        drop(file);
        if !meta.is_file() {
            return Err(VnoteError::upload(
                RemoteErrorKind::Other,
                format!("{} is not a regular file", path.display()),
            ));
        }
        debug!(size = meta.len(), "Uploading voice");
        self.transport.send_voice_file(self.target_chat, path).await?;
        info!("Voice sent");
        Ok(())
    }

    /// Re-sends an already-remote document with a caption; nothing touches the local disk.
    #[instrument(skip(self, doc, caption, spans), fields(chat_id = self.target_chat, document_id = %doc.id))]
    pub async fn resend_with_caption(
        &self,
        doc: &Document,
        caption: &str,
        spans: &[FormattingSpan],
    ) -> Result<()> {
        self.transport
            .send_voice_document(self.target_chat, doc, caption, spans)
            .await?;
        info!(caption_len = caption.len(), spans = spans.len(), "Voice re-sent with caption");
        Ok(())
    }
}
