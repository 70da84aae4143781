//! Attribute inspection: audio / voice detection and display filename of a [`Document`].

use crate::types::{Document, DocumentAttribute};

/// Audio container the pipeline knows how to turn into a voice message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Ogg,
}

impl AudioFormat {
    /// Case-insensitive suffix match on a filename.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".mp3") {
            Some(AudioFormat::Mp3)
        } else if lower.ends_with(".ogg") {
            Some(AudioFormat::Ogg)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
        }
    }
}

/// True if any attribute is an audio marker, voice or not.
pub fn is_audio_file(doc: &Document) -> bool {
    doc.attributes
        .iter()
        .any(|attr| matches!(attr, DocumentAttribute::Audio { .. }))
}

/// True if any audio marker has the voice flag set.
pub fn is_voice_message(doc: &Document) -> bool {
    doc.attributes
        .iter()
        .any(|attr| matches!(attr, DocumentAttribute::Audio { voice: true, .. }))
}

/// First filename attribute, or the document id when there is none.
pub fn file_name(doc: &Document) -> String {
    doc.attributes
        .iter()
        .find_map(|attr| match attr {
            DocumentAttribute::Filename(name) => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_else(|| doc.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(attributes: Vec<DocumentAttribute>) -> Document {
        Document {
            id: "AgADkQ4AAm".to_string(),
            file_id: "CQACAgIAAxkBAAIB".to_string(),
            attributes,
        }
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(&doc(vec![DocumentAttribute::audio(false)])));
        assert!(is_audio_file(&doc(vec![
            DocumentAttribute::Filename("a.mp3".into()),
            DocumentAttribute::audio(true),
        ])));
        assert!(!is_audio_file(&doc(vec![])));
        assert!(!is_audio_file(&doc(vec![
            DocumentAttribute::Filename("a.mp3".into()),
            DocumentAttribute::Other("image/png".into()),
        ])));
    }

    #[test]
    fn test_is_voice_message_requires_voice_flag() {
        assert!(!is_voice_message(&doc(vec![
            DocumentAttribute::audio(false),
            DocumentAttribute::Filename("note.ogg".into()),
            DocumentAttribute::Other("audio/ogg".into()),
        ])));
        assert!(is_voice_message(&doc(vec![
            DocumentAttribute::audio(false),
            DocumentAttribute::audio(true),
        ])));
        assert!(!is_voice_message(&doc(vec![])));
    }

    #[test]
    fn test_file_name_first_match() {
        let d = doc(vec![
            DocumentAttribute::audio(false),
            DocumentAttribute::Filename("first.mp3".into()),
            DocumentAttribute::Filename("second.ogg".into()),
        ]);
        assert_eq!(file_name(&d), "first.mp3");
    }

    #[test]
    fn test_file_name_falls_back_to_id() {
        let d = doc(vec![DocumentAttribute::audio(true)]);
        assert_eq!(file_name(&d), "AgADkQ4AAm");
        assert_eq!(file_name(&d), file_name(&d));
    }

    #[test]
    fn test_audio_format_from_file_name() {
        assert_eq!(AudioFormat::from_file_name("song.MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_file_name("voice.Ogg"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_file_name("track.flac"), None);
        assert_eq!(AudioFormat::from_file_name("mp3"), None);
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
    }
}
