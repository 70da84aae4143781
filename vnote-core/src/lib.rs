//! # vnote-core
//!
//! Core types and traits for the voice-note bot: [`Document`] and its [`DocumentAttribute`]s, the
//! attribute inspector, [`IncomingMessage`], [`Handler`] / [`Middleware`], the [`Transport`] seam
//! to the messaging platform, the error taxonomy and tracing initialization.

pub mod attributes;
pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use attributes::{file_name, is_audio_file, is_voice_message, AudioFormat};
pub use error::{RemoteErrorKind, Result, StageExt, VnoteError};
pub use logger::{init_tracing, rolling_appender, DEFAULT_LOG_FILE, MAX_LOG_FILES};
pub use transport::Transport;
pub use types::{
    Chat, Document, DocumentAttribute, FormattingSpan, Handler, HandlerResponse, IncomingMessage,
    Middleware, ToCoreMessage, User,
};
