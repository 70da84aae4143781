//! # vnote-telegram
//!
//! Telegram binding layer: adapters, [`vnote_core::Transport`] implementation, recent-message cache,
//! config, Dispatcher runner. Owns Telegram connectivity only; the voice pipeline lives in `handlers`.

mod adapters;
mod config;
mod recent_messages;
mod runner;
mod transport_adapter;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use config::TelegramConfig;
pub use recent_messages::{RecentMessages, DEFAULT_CAPACITY};
pub use runner::{run_dispatcher, warm_up_target_chat, DispatchContext};
pub use transport_adapter::{classify_api_description, classify_request_error, TelegramTransport};
