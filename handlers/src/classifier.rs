//! Decides what to do with one incoming message.

use std::sync::Arc;

use tracing::{debug, instrument};
use vnote_core::{
    file_name, is_audio_file, is_voice_message, AudioFormat, Document, FormattingSpan,
    IncomingMessage, Result, StageExt, Transport, VnoteError,
};

/// Classification result. Produced fresh per message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ignore,
    /// Audio attachment in the target chat: download, convert if needed, send as voice.
    ConvertAndSend { source: Document, format: AudioFormat },
    /// Text reply to a voice message: re-send that voice with the reply as caption.
    ReplyVoiceResend {
        target: Document,
        caption: String,
        spans: Vec<FormattingSpan>,
    },
}

/// Rules, first match wins: foreign chat → Ignore; audio attachment named `.mp3`/`.ogg` →
/// ConvertAndSend; non-empty text reply to a voice message → ReplyVoiceResend; else Ignore.
#[derive(Clone)]
pub struct Classifier {
    target_chat: i64,
    transport: Arc<dyn Transport>,
}

impl Classifier {
    pub fn new(target_chat: i64, transport: Arc<dyn Transport>) -> Self {
        Self {
            target_chat,
            transport,
        }
    }

    #[instrument(skip(self, msg), fields(chat_id = msg.chat.id, message_id = msg.id))]
    pub async fn classify(&self, msg: &IncomingMessage) -> Result<Outcome> {
        if msg.chat.id != self.target_chat {
            debug!("Not the target chat");
            return Ok(Outcome::Ignore);
        }

        if let Some(outcome) = classify_attachment(msg) {
            return Ok(outcome);
        }

        if let (Some(reply_id), Some(text)) = (msg.reply_to_message_id, msg.non_empty_text()) {
            let replied = self
                .transport
                .fetch_message(self.target_chat, reply_id)
                .await
                .and_then(|found| {
                    found.ok_or_else(|| {
                        VnoteError::Lookup(format!(
                            "message {} not found in chat {}",
                            reply_id, self.target_chat
                        ))
                    })
                })
                .stage("get replied message")?;

            if let Some(doc) = replied.document.filter(is_voice_message) {
                return Ok(Outcome::ReplyVoiceResend {
                    target: doc,
                    caption: text.to_string(),
                    spans: msg.entities.clone(),
                });
            }
            debug!(reply_to = reply_id, "Replied message is not a voice message");
        }

        Ok(Outcome::Ignore)
    }
}

fn classify_attachment(msg: &IncomingMessage) -> Option<Outcome> {
    let doc = msg.document.as_ref().filter(|d| is_audio_file(d))?;
    let name = file_name(doc);
    let format = AudioFormat::from_file_name(&name);
    debug!(file_name = %name, format = ?format, "Audio attachment");
    format.map(|format| Outcome::ConvertAndSend {
        source: doc.clone(),
        format,
    })
}
