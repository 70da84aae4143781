//! Telegram settings: token, API URL, log path, target chat.
//! Loaded from BOT_TOKEN, WORK_CHAT, TELEGRAM_API_URL, LOG_FILE.

use anyhow::{Context, Result};
use std::env;

/// Telegram connectivity and logging settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: Option<String>,
    /// Chat that is watched and posted to (channel ids start with -100).
    pub work_chat: i64,
}

impl TelegramConfig {
    /// BOT_TOKEN and WORK_CHAT are required; TELEGRAM_API_URL (or TELOXIDE_API_URL) and LOG_FILE are optional.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN not set"))?;
        let work_chat = env::var("WORK_CHAT").map_err(|_| anyhow::anyhow!("WORK_CHAT not set"))?;
        let work_chat = parse_chat_id(&work_chat)?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").ok();
        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            work_chat,
        })
    }

    /// Token and chat only; everything else unset.
    pub fn new(bot_token: String, work_chat: i64) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: None,
            work_chat,
        }
    }

    /// Builds the teloxide::Bot, pointed at the custom API URL when one is set.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        let bot = teloxide::Bot::new(&self.bot_token);
        match &self.telegram_api_url {
            Some(url) => {
                let url = reqwest::Url::parse(url)
                    .with_context(|| format!("invalid TELEGRAM_API_URL: {url}"))?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}

fn parse_chat_id(raw: &str) -> Result<i64> {
    let id = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("WORK_CHAT must be a numeric chat id, got {raw:?}"))?;
    anyhow::ensure!(id != 0, "WORK_CHAT must not be 0");
    Ok(id)
}
