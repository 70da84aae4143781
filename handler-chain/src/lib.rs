//! # Handler chain
//!
//! Runs a sequence of middleware (before/after) and handlers for each incoming message. Middleware
//! can stop the chain; the first handler that returns Stop ends handler execution; after callbacks
//! run in reverse order.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use vnote_core::{Handler, HandlerResponse, IncomingMessage, Middleware, Result};

/// Chain of middleware and handlers: middleware run in order (before), then handlers; middleware after run in reverse order.
#[derive(Clone, Default)]
pub struct HandlerChain {
    middleware: Vec<Arc<dyn Middleware>>,
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain (no middleware, no handlers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware (runs before handlers, after in reverse).
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a handler (runs in order; first Stop ends handler phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Runs middleware before, then handlers; then middleware after in reverse. Returns Stop if
    /// anything handled or stopped the message, otherwise the last Ignore/Continue.
    ///
    /// A handler error skips the remaining handlers but middleware `after` still runs (with
    /// `Stop`) before the error is returned.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = message.id))]
    pub async fn handle(&self, message: &IncomingMessage) -> Result<HandlerResponse> {
        let mut final_response = HandlerResponse::Continue;

        debug!("step: handler_chain started");

        for mw in &self.middleware {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            let should_continue = mw.before(message).await?;
            if !should_continue {
                info!(middleware = %mw_name, "step: middleware before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
            debug!(middleware = %mw_name, "step: middleware before done");
        }

        let mut failure = None;
        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            debug!(handler = %handler_name, "step: handler processing");

            let response = match handler.handle(message).await {
                Ok(response) => response,
                Err(e) => {
                    failure = Some(e);
                    final_response = HandlerResponse::Stop;
                    break;
                }
            };
            debug!(handler = %handler_name, response = ?response, "step: handler done");

            match response {
                HandlerResponse::Stop => {
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => {
                    final_response = response;
                }
            }
        }

        for mw in self.middleware.iter().rev() {
            mw.after(message, &final_response).await?;
        }

        if let Some(e) = failure {
            return Err(e);
        }

        debug!(response = ?final_response, "step: handler_chain finished");
        Ok(final_response)
    }
}
