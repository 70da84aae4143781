//! # vnote-cli
//!
//! Argument parsing, config loading and wiring of the handler chain.

pub mod cli;

use std::sync::Arc;

use anyhow::Result;
use audio_converter::AudioConverter;
use handler_chain::HandlerChain;
use handlers::{Classifier, LoggingMiddleware, TransferGateway, VoicePipelineHandler};
use tracing::info;
use vnote_core::{init_tracing, Transport, DEFAULT_LOG_FILE};
use vnote_telegram::{run_dispatcher, warm_up_target_chat, RecentMessages, TelegramTransport};

pub use cli::{load_config, AppConfig, Cli};

/// Chain used by the bot: logging middleware around the voice pipeline.
pub fn build_chain(config: &AppConfig, transport: Arc<dyn Transport>) -> HandlerChain {
    let target_chat = config.telegram.work_chat;
    let pipeline = VoicePipelineHandler::new(
        Classifier::new(target_chat, transport.clone()),
        TransferGateway::new(target_chat, transport),
        AudioConverter::from_config(&config.pipeline.converter),
        config.pipeline.artifact_store(),
    );
    HandlerChain::new()
        .add_middleware(Arc::new(LoggingMiddleware))
        .add_handler(Arc::new(pipeline))
}

/// Initializes logging, builds the bot and runs until interrupted.
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let log_file = config
        .telegram
        .log_file
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    init_tracing(&log_file)?;

    info!(
        work_chat = config.telegram.work_chat,
        downloads_dir = %config.pipeline.downloads_dir.display(),
        ogg_dir = %config.pipeline.ogg_dir.display(),
        retention = ?config.pipeline.retention,
        "Starting vnote"
    );

    let bot = config.telegram.build_bot()?;
    let recent = Arc::new(RecentMessages::default());
    let transport: Arc<dyn Transport> = Arc::new(TelegramTransport::new(bot.clone(), recent.clone()));
    let chain = build_chain(&config, transport);

    if cli.fill_peer_storage {
        warm_up_target_chat(&bot, config.telegram.work_chat).await?;
    }

    run_dispatcher(bot, chain, recent, config.telegram.work_chat).await
}
