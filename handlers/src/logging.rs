//! Middleware that logs each message on the way in and the response on the way out.

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use vnote_core::{HandlerResponse, IncomingMessage, Middleware, Result};

/// Logs each message in before() and the response in after(); always continues.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &IncomingMessage) -> Result<bool> {
        info!(
            chat_id = message.chat.id,
            message_id = message.id,
            sender = %message
                .sender
                .as_ref()
                .and_then(|u| u.username.as_deref())
                .unwrap_or("unknown"),
            has_document = message.document.is_some(),
            reply_to = ?message.reply_to_message_id,
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &IncomingMessage, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = message.id,
            response = ?response,
            "Processed message"
        );
        Ok(())
    }
}
