//! Messaging-platform abstraction used by the pipeline.
//!
//! [`Transport`] is platform-agnostic; `vnote-telegram` implements it via teloxide. Tests substitute
//! a recording implementation.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Document, FormattingSpan, IncomingMessage};

/// Byte transport and message RPCs of the messaging platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Streams the remote document to `path`. The parent directory already exists.
    async fn download(&self, document: &Document, path: &Path) -> Result<()>;

    /// Uploads a local Opus-in-Ogg file and sends it to `chat_id` as a voice note.
    async fn send_voice_file(&self, chat_id: i64, path: &Path) -> Result<()>;

    /// Sends an already-remote document as a voice note with a caption and its entities.
    async fn send_voice_document(
        &self,
        chat_id: i64,
        document: &Document,
        caption: &str,
        entities: &[FormattingSpan],
    ) -> Result<()>;

    /// Looks up a message by id in `chat_id`. `Ok(None)` when the platform does not know it.
    async fn fetch_message(&self, chat_id: i64, message_id: i32) -> Result<Option<IncomingMessage>>;
}
