//! Core types: user, chat, document, incoming message, handler response, and Handler / Middleware traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A text entity (bold, link, mention, ...) attached to message text. Kept in the platform's own
/// representation so captions can be re-sent verbatim.
pub type FormattingSpan = teloxide::types::MessageEntity;

/// Sender identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Chat (channel, group or private) identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// One typed attribute of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentAttribute {
    /// Display filename as uploaded.
    Filename(String),
    /// Audio marker; `voice` distinguishes a voice note from a music file.
    Audio {
        voice: bool,
        duration_secs: Option<u32>,
        title: Option<String>,
        performer: Option<String>,
    },
    /// Anything else the inspector does not care about (e.g. a non-audio MIME type).
    Other(String),
}

impl DocumentAttribute {
    /// Plain audio marker with no metadata.
    pub fn audio(voice: bool) -> Self {
        DocumentAttribute::Audio {
            voice,
            duration_secs: None,
            title: None,
            performer: None,
        }
    }
}

/// Remote file handle attached to a message.
///
/// `id` is stable across re-deliveries and keys local artifacts; `file_id` is the credential
/// used to download or re-send the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub file_id: String,
    pub attributes: Vec<DocumentAttribute>,
}

/// A message as seen by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub id: i32,
    pub chat: Chat,
    /// `None` for channel posts.
    pub sender: Option<User>,
    pub text: Option<String>,
    pub entities: Vec<FormattingSpan>,
    pub document: Option<Document>,
    pub reply_to_message_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl IncomingMessage {
    /// Text body if present and non-empty.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; the message was fully handled.
    Stop,
    /// Not for this handler, try next.
    Ignore,
}

/// Converts a transport-specific message type to core [`IncomingMessage`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> IncomingMessage;
}

/// Processes a message. Return Stop to end the handle phase.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, message: &IncomingMessage) -> crate::error::Result<HandlerResponse>;
}

/// Runs around the handlers: `before` in order (false stops the chain), `after` in reverse order.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn before(&self, _message: &IncomingMessage) -> crate::error::Result<bool> {
        Ok(true)
    }

    async fn after(
        &self,
        _message: &IncomingMessage,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
