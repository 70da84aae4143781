//! CLI parser and config loading.

use anyhow::Result;
use clap::Parser;
use handlers::PipelineConfig;
use vnote_telegram::TelegramConfig;

#[derive(Parser, Debug)]
#[command(name = "vnote")]
#[command(about = "Re-posts mp3/ogg audio in a Telegram chat as voice notes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Fetch the target chat once before listening, so a bad WORK_CHAT fails fast.
    #[arg(long)]
    pub fill_peer_storage: bool,
}

/// Both config halves, loaded from the environment.
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub pipeline: PipelineConfig,
}

/// Load config from environment (call after `dotenvy::dotenv()`).
pub fn load_config() -> Result<AppConfig> {
    Ok(AppConfig {
        telegram: TelegramConfig::from_env()?,
        pipeline: PipelineConfig::from_env()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["vnote"]).unwrap();
        assert!(!cli.fill_peer_storage);

        let cli = Cli::try_parse_from(["vnote", "--fill-peer-storage"]).unwrap();
        assert!(cli.fill_peer_storage);

        assert!(Cli::try_parse_from(["vnote", "--unknown"]).is_err());
    }
}
