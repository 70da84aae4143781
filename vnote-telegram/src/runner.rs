//! Dispatcher runner: converts teloxide messages (channel posts included) to core
//! [`IncomingMessage`](vnote_core::IncomingMessage) and hands them to the [`HandlerChain`].

use anyhow::{Context, Result};
use handler_chain::HandlerChain;
use std::sync::Arc;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::{Message, Update};
use tracing::{error, info, instrument, warn};
use vnote_core::ToCoreMessage;

use super::adapters::TelegramMessageWrapper;
use super::recent_messages::RecentMessages;

/// Shared dispatcher dependency: chain, lookup cache and target chat.
pub struct DispatchContext {
    pub chain: HandlerChain,
    pub recent: Arc<RecentMessages>,
    pub target_chat: i64,
}

/// Fetches the target chat once before listening; fails when the bot cannot access it.
#[instrument(skip(bot))]
pub async fn warm_up_target_chat(bot: &teloxide::Bot, target_chat: i64) -> Result<()> {
    bot.get_chat(ChatId(target_chat))
        .await
        .with_context(|| format!("cannot access WORK_CHAT {target_chat}"))?;
    info!(chat_id = target_chat, "Target chat resolved");
    Ok(())
}

/// Caches target-chat messages, then runs the chain in its own task. Failures are only logged.
async fn on_message(msg: Message, ctx: Arc<DispatchContext>) -> ResponseResult<()> {
    let wrapper = TelegramMessageWrapper(&msg);
    let core_msg = wrapper.to_core();

    if core_msg.chat.id == ctx.target_chat {
        if let Some(replied) = wrapper.replied() {
            ctx.recent.remember(replied);
        }
        ctx.recent.remember(core_msg.clone());
    }

    let ctx = ctx.clone();
    tokio::spawn(async move {
        if let Err(e) = ctx.chain.handle(&core_msg).await {
            error!(
                error = %e,
                chat_id = core_msg.chat.id,
                message_id = core_msg.id,
                "Handler chain failed"
            );
        }
    });

    Ok(())
}

/// Runs the Dispatcher until Ctrl+C. Logs the bot identity from get_me() first; messages and
/// channel posts take the same path.
#[instrument(skip(bot, handler_chain, recent))]
pub async fn run_dispatcher(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    recent: Arc<RecentMessages>,
    target_chat: i64,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(
            bot_id = me.user.id.0,
            username = me.user.username.as_deref().unwrap_or_default(),
            first_name = %me.user.first_name,
            "Bot identity"
        ),
        Err(e) => warn!(error = %e, "get_me failed"),
    }

    let ctx = Arc::new(DispatchContext {
        chain: handler_chain,
        recent,
        target_chat,
    });

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_channel_post().endpoint(on_message));

    println!("Listening for updates. Interrupt (Ctrl+C) to stop.");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}
