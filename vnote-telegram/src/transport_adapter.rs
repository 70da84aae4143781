//! Wraps teloxide::Bot and implements [`vnote_core::Transport`]. Production code talks to Telegram;
//! tests can substitute another Transport impl.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::payloads::SendVoiceSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, FileId, InputFile};
use teloxide::RequestError;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use vnote_core::{
    Document, FormattingSpan, IncomingMessage, RemoteErrorKind, Result, Transport, VnoteError,
};

use crate::recent_messages::RecentMessages;

/// teloxide-backed transport. Message lookups are served from [`RecentMessages`].
pub struct TelegramTransport {
    bot: teloxide::Bot,
    recent: Arc<RecentMessages>,
}

impl TelegramTransport {
    pub fn new(bot: teloxide::Bot, recent: Arc<RecentMessages>) -> Self {
        Self { bot, recent }
    }
}

/// Maps a Bot API error description to a coarse kind.
pub fn classify_api_description(description: &str) -> RemoteErrorKind {
    let d = description.to_lowercase();
    if d.contains("not found")
        || d.contains("wrong file")
        || d.contains("file is temporarily unavailable")
        || d.contains("invalid file")
    {
        RemoteErrorKind::NotFound
    } else if d.contains("forbidden")
        || d.contains("not enough rights")
        || d.contains("have no rights")
        || d.contains("kicked")
        || d.contains("blocked")
        || d.contains("not a member")
    {
        RemoteErrorKind::Permission
    } else {
        RemoteErrorKind::Other
    }
}

pub fn classify_request_error(err: &RequestError) -> RemoteErrorKind {
    match err {
        RequestError::Network(_) | RequestError::Io(_) | RequestError::RetryAfter(_) => {
            RemoteErrorKind::Network
        }
        RequestError::Api(api) => classify_api_description(&api.to_string()),
        _ => RemoteErrorKind::Other,
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn download(&self, document: &Document, path: &Path) -> Result<()> {
        let file = self
            .bot
            .get_file(FileId(document.file_id.clone()))
            .await
            .map_err(|e| VnoteError::download(classify_request_error(&e), e.to_string()))?;
        debug!(document_id = %document.id, size = file.size, "Resolved remote file");

        let mut dst = tokio::fs::File::create(path).await.map_err(|e| {
            VnoteError::download(
                RemoteErrorKind::Other,
                format!("cannot create {}: {}", path.display(), e),
            )
        })?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| VnoteError::download(RemoteErrorKind::Network, e.to_string()))?;
        dst.flush()
            .await
            .map_err(|e| VnoteError::download(RemoteErrorKind::Other, e.to_string()))?;
        Ok(())
    }

    async fn send_voice_file(&self, chat_id: i64, path: &Path) -> Result<()> {
        self.bot
            .send_voice(ChatId(chat_id), InputFile::file(path.to_path_buf()))
            .await
            .map_err(|e| VnoteError::upload(classify_request_error(&e), e.to_string()))?;
        Ok(())
    }

    async fn send_voice_document(
        &self,
        chat_id: i64,
        document: &Document,
        caption: &str,
        entities: &[FormattingSpan],
    ) -> Result<()> {
        self.bot
            .send_voice(
                ChatId(chat_id),
                InputFile::file_id(FileId(document.file_id.clone())),
            )
            .caption(caption.to_string())
            .caption_entities(entities.to_vec())
            .await
            .map_err(|e| VnoteError::send(classify_request_error(&e), e.to_string()))?;
        Ok(())
    }

    async fn fetch_message(&self, chat_id: i64, message_id: i32) -> Result<Option<IncomingMessage>> {
        Ok(self.recent.get(chat_id, message_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_api_description() {
        assert_eq!(
            classify_api_description("Bad Request: wrong file_id or the file is temporarily unavailable"),
            RemoteErrorKind::NotFound
        );
        assert_eq!(
            classify_api_description("Bad Request: chat not found"),
            RemoteErrorKind::NotFound
        );
        assert_eq!(
            classify_api_description("Forbidden: bot was kicked from the channel chat"),
            RemoteErrorKind::Permission
        );
        assert_eq!(
            classify_api_description("Bad Request: not enough rights to send voice messages to the chat"),
            RemoteErrorKind::Permission
        );
        assert_eq!(
            classify_api_description("Bad Request: VOICE_MESSAGES_FORBIDDEN"),
            RemoteErrorKind::Permission
        );
        assert_eq!(
            classify_api_description("Bad Request: message is too long"),
            RemoteErrorKind::Other
        );
    }

    #[tokio::test]
    async fn test_fetch_message_reads_cache() {
        let recent = Arc::new(RecentMessages::default());
        let transport = TelegramTransport::new(teloxide::Bot::new("dummy_token"), recent.clone());

        assert!(transport.fetch_message(-100, 1).await.unwrap().is_none());

        recent.remember(IncomingMessage {
            id: 1,
            chat: vnote_core::Chat {
                id: -100,
                chat_type: "channel".to_string(),
            },
            sender: None,
            text: Some("hi".to_string()),
            entities: Vec::new(),
            document: None,
            reply_to_message_id: None,
            created_at: chrono::Utc::now(),
        });
        assert_eq!(
            transport.fetch_message(-100, 1).await.unwrap().unwrap().text.as_deref(),
            Some("hi")
        );
    }
}
