//! Voice pipeline handler: classifies each message and carries out the outcome.

use async_trait::async_trait;
use audio_converter::{ArtifactStore, AudioConverter, ConvertStatus};
use tracing::{info, instrument, warn};
use vnote_core::{
    AudioFormat, Document, Handler, HandlerResponse, IncomingMessage, Result, StageExt,
};

use crate::classifier::{Classifier, Outcome};
use crate::gateway::TransferGateway;

pub struct VoicePipelineHandler {
    classifier: Classifier,
    gateway: TransferGateway,
    converter: AudioConverter,
    artifacts: ArtifactStore,
}

impl VoicePipelineHandler {
    pub fn new(
        classifier: Classifier,
        gateway: TransferGateway,
        converter: AudioConverter,
        artifacts: ArtifactStore,
    ) -> Self {
        Self {
            classifier,
            gateway,
            converter,
            artifacts,
        }
    }

    /// Carries out one outcome. Any failing step aborts the rest and is returned with its stage label.
    #[instrument(skip_all)]
    pub async fn execute(&self, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Ignore => Ok(()),
            Outcome::ConvertAndSend { source, format } => self.convert_and_send(&source, format).await,
            Outcome::ReplyVoiceResend {
                target,
                caption,
                spans,
            } => self
                .gateway
                .resend_with_caption(&target, &caption, &spans)
                .await
                .stage("send voice with caption"),
        }
    }

    async fn convert_and_send(&self, doc: &Document, format: AudioFormat) -> Result<()> {
        let downloaded = self.artifacts.download_path(&doc.id, format);
        let download_stage = match format {
            AudioFormat::Mp3 => "download mp3",
            AudioFormat::Ogg => "download ogg",
        };
        self.gateway
            .download_file(doc, &downloaded)
            .await
            .stage(download_stage)?;

        let ogg_path = self.artifacts.ogg_path(&doc.id);
        if format == AudioFormat::Mp3 {
            let status = self
                .converter
                .convert(&downloaded, &ogg_path)
                .await
                .stage("convert mp3 to ogg")?;
            if status == ConvertStatus::Skipped {
                info!(document_id = %doc.id, "Reusing existing ogg");
            }
        }

        self.gateway
            .upload_voice(&ogg_path)
            .await
            .stage("send voice")?;

        let removed = self.artifacts.release(&doc.id).await;
        if !removed.is_empty() {
            info!(
                document_id = %doc.id,
                retention = ?self.artifacts.retention(),
                removed = removed.len(),
                "Artifacts released"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl Handler for VoicePipelineHandler {
    async fn handle(&self, message: &IncomingMessage) -> Result<HandlerResponse> {
        let outcome = self.classifier.classify(message).await?;
        if outcome == Outcome::Ignore {
            return Ok(HandlerResponse::Ignore);
        }

        let kind = match &outcome {
            Outcome::ConvertAndSend { format, .. } => format.extension(),
            _ => "reply",
        };
        info!(chat_id = message.chat.id, message_id = message.id, kind = kind, "Handling message");

        if let Err(e) = self.execute(outcome).await {
            warn!(chat_id = message.chat.id, message_id = message.id, error = %e, "Pipeline step failed");
            return Err(e);
        }
        Ok(HandlerResponse::Stop)
    }
}
