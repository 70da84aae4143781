//! vnote: watch a Telegram chat and re-post audio as voice notes. Config from env / `.env`.

use std::process::ExitCode;

use clap::Parser;
use vnote_cli::{load_config, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match load_config() {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
