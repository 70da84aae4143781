//! Unit tests for [`Classifier`]: rule order and each outcome.

use std::sync::Arc;

use teloxide::types::MessageEntity;
use vnote_core::{AudioFormat, Document, DocumentAttribute, VnoteError};

use super::mock_transport::{
    audio_document, message, reply, with_document, MockTransport, TransportCall, TARGET_CHAT,
};
use crate::{Classifier, Outcome};

fn classifier(transport: MockTransport) -> (Classifier, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    (Classifier::new(TARGET_CHAT, transport.clone()), transport)
}

/// **Test: a message from any other chat is ignored even when it carries an mp3.**
#[tokio::test]
async fn test_foreign_chat_is_ignored_regardless_of_media() {
    let (classifier, transport) = classifier(MockTransport::new());
    let msg = with_document(message(-100999, 1), audio_document("u1", Some("song.mp3"), false));

    assert_eq!(classifier.classify(&msg).await.unwrap(), Outcome::Ignore);

    let msg = reply(message(-100999, 2), 1, "nice", Vec::new());
    assert_eq!(classifier.classify(&msg).await.unwrap(), Outcome::Ignore);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_mp3_attachment_converts() {
    let (classifier, _) = classifier(MockTransport::new());
    let doc = audio_document("u1", Some("song.MP3"), false);
    let msg = with_document(message(TARGET_CHAT, 1), doc.clone());

    assert_eq!(
        classifier.classify(&msg).await.unwrap(),
        Outcome::ConvertAndSend {
            source: doc,
            format: AudioFormat::Mp3
        }
    );
}

#[tokio::test]
async fn test_ogg_attachment_skips_conversion() {
    let (classifier, _) = classifier(MockTransport::new());
    let doc = audio_document("u2", Some("memo.ogg"), false);
    let msg = with_document(message(TARGET_CHAT, 1), doc.clone());

    assert_eq!(
        classifier.classify(&msg).await.unwrap(),
        Outcome::ConvertAndSend {
            source: doc,
            format: AudioFormat::Ogg
        }
    );
}

#[tokio::test]
async fn test_other_suffix_and_missing_name_are_ignored() {
    let (classifier, _) = classifier(MockTransport::new());

    let flac = with_document(message(TARGET_CHAT, 1), audio_document("u3", Some("a.flac"), false));
    assert_eq!(classifier.classify(&flac).await.unwrap(), Outcome::Ignore);

    // No filename: the id is used and has no audio suffix.
    let unnamed = with_document(message(TARGET_CHAT, 2), audio_document("u4", None, true));
    assert_eq!(classifier.classify(&unnamed).await.unwrap(), Outcome::Ignore);
}

#[tokio::test]
async fn test_non_audio_document_named_mp3_is_ignored() {
    let (classifier, _) = classifier(MockTransport::new());
    let doc = Document {
        id: "u5".to_string(),
        file_id: "file-u5".to_string(),
        attributes: vec![
            DocumentAttribute::Filename("fake.mp3".to_string()),
            DocumentAttribute::Other("application/octet-stream".to_string()),
        ],
    };
    let msg = with_document(message(TARGET_CHAT, 1), doc);
    assert_eq!(classifier.classify(&msg).await.unwrap(), Outcome::Ignore);
}

/// **Test: reply "nice" to a voice message yields a resend of the same document with the reply text and spans.**
#[tokio::test]
async fn test_reply_to_voice_resends_with_caption() {
    let voice = audio_document("voice-1", None, true);
    let original = with_document(message(TARGET_CHAT, 10), voice.clone());
    let (classifier, transport) = classifier(MockTransport::new().with_message(original));

    let spans = vec![MessageEntity::bold(0, 4)];
    let msg = reply(message(TARGET_CHAT, 11), 10, "nice", spans.clone());

    assert_eq!(
        classifier.classify(&msg).await.unwrap(),
        Outcome::ReplyVoiceResend {
            target: voice,
            caption: "nice".to_string(),
            spans
        }
    );
    assert_eq!(
        transport.calls(),
        vec![TransportCall::FetchMessage {
            chat_id: TARGET_CHAT,
            message_id: 10
        }]
    );
}

#[tokio::test]
async fn test_reply_to_non_voice_audio_is_ignored() {
    let music = audio_document("music-1", Some("track.mp3"), false);
    let original = with_document(message(TARGET_CHAT, 10), music);
    let (classifier, _) = classifier(MockTransport::new().with_message(original));

    let msg = reply(message(TARGET_CHAT, 11), 10, "nice", Vec::new());
    assert_eq!(classifier.classify(&msg).await.unwrap(), Outcome::Ignore);
}

#[tokio::test]
async fn test_reply_with_empty_text_does_not_look_up() {
    let (classifier, transport) = classifier(MockTransport::new());
    let msg = reply(message(TARGET_CHAT, 11), 10, "", Vec::new());

    assert_eq!(classifier.classify(&msg).await.unwrap(), Outcome::Ignore);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_reply_lookup_miss_is_labelled_lookup_error() {
    let (classifier, _) = classifier(MockTransport::new());
    let msg = reply(message(TARGET_CHAT, 11), 404, "nice", Vec::new());

    let err = classifier.classify(&msg).await.unwrap_err();
    assert_eq!(err.stage_label(), Some("get replied message"));
    assert!(matches!(err, VnoteError::Stage { source, .. } if matches!(*source, VnoteError::Lookup(_))));
}

/// **Test: an audio attachment wins over the reply rule on the same message.**
#[tokio::test]
async fn test_attachment_rule_runs_before_reply_rule() {
    let (classifier, transport) = classifier(MockTransport::new());
    let doc = audio_document("u6", Some("song.mp3"), false);
    let msg = reply(with_document(message(TARGET_CHAT, 12), doc.clone()), 10, "nice", Vec::new());

    assert_eq!(
        classifier.classify(&msg).await.unwrap(),
        Outcome::ConvertAndSend {
            source: doc,
            format: AudioFormat::Mp3
        }
    );
    assert!(transport.calls().is_empty());
}
