//! Adapters from Telegram (teloxide) types to vnote_core types.
//! Depends only on teloxide and vnote_core type definitions.

use vnote_core::{Chat, Document, DocumentAttribute, IncomingMessage, ToCoreMessage, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl TelegramUserWrapper<'_> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`IncomingMessage`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl ToCoreMessage for TelegramMessageWrapper<'_> {
    fn to_core(&self) -> IncomingMessage {
        let msg = self.0;
        IncomingMessage {
            id: msg.id.0,
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: chat_type(&msg.chat).to_string(),
            },
            sender: msg.from.as_ref().map(|u| TelegramUserWrapper(u).to_core()),
            text: msg.text().map(str::to_string),
            entities: msg.entities().map(<[_]>::to_vec).unwrap_or_default(),
            document: self.document(),
            reply_to_message_id: msg.reply_to_message().map(|m| m.id.0),
            created_at: msg.date,
        }
    }
}

impl TelegramMessageWrapper<'_> {
    /// The replied-to message embedded in the update, converted.
    pub fn replied(&self) -> Option<IncomingMessage> {
        self.0
            .reply_to_message()
            .map(|m| TelegramMessageWrapper(m).to_core())
    }

    /// Audio, voice and generic document attachments as a core [`Document`].
    fn document(&self) -> Option<Document> {
        let msg = self.0;
        if let Some(audio) = msg.audio() {
            let mut attributes = vec![DocumentAttribute::Audio {
                voice: false,
                duration_secs: Some(audio.duration.seconds()),
                title: audio.title.clone(),
                performer: audio.performer.clone(),
            }];
            if let Some(name) = &audio.file_name {
                attributes.push(DocumentAttribute::Filename(name.clone()));
            }
            return Some(Document {
                id: audio.file.unique_id.0.clone(),
                file_id: audio.file.id.0.clone(),
                attributes,
            });
        }
        if let Some(voice) = msg.voice() {
            return Some(Document {
                id: voice.file.unique_id.0.clone(),
                file_id: voice.file.id.0.clone(),
                attributes: vec![DocumentAttribute::Audio {
                    voice: true,
                    duration_secs: Some(voice.duration.seconds()),
                    title: None,
                    performer: None,
                }],
            });
        }
        if let Some(doc) = msg.document() {
            let mut attributes = Vec::new();
            if let Some(name) = &doc.file_name {
                attributes.push(DocumentAttribute::Filename(name.clone()));
            }
            match doc.mime_type.as_ref().map(|m| m.essence_str()) {
                Some(mime) if mime.starts_with("audio/") => {
                    attributes.push(DocumentAttribute::audio(false))
                }
                Some(mime) => attributes.push(DocumentAttribute::Other(mime.to_string())),
                None => {}
            }
            return Some(Document {
                id: doc.file.unique_id.0.clone(),
                file_id: doc.file.id.0.clone(),
                attributes,
            });
        }
        None
    }
}

fn chat_type(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_channel() {
        "channel"
    } else if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else {
        "private"
    }
}
