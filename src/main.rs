mod api_client;
mod bot;
mod config;
mod content;
mod handlers;
mod logging;
mod menu;
mod scheduler;
mod updater;

use anyhow::Result;
use api_client::ApiClient;
use config::Config;
use menu::Menu;
use std::process::ExitCode;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info};
use updater::{CommandUpdater, UpdateChecker, VersionRecord};

const BOT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => {
            info!("Bot stopped by user");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Critical error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;

    info!("Starting Telegram bot v{}...", BOT_VERSION);
    info!("Event: {}", config.event.name);

    let checker = match &config.updates.github_repo {
        Some(repo) => {
            let client = ApiClient::new(
                config.updates.github_api_url.clone(),
                repo.clone(),
                config.updates.check_timeout,
            )?;
            info!("Tracking releases of {}", repo);
            let record = VersionRecord::new(config.updates.version_file.clone());
            let flow = CommandUpdater::new(config.updates.update_command.clone(), record.clone());
            Some(Arc::new(UpdateChecker::new(
                client,
                flow,
                record,
                BOT_VERSION,
                config.updates.check_timeout,
            )))
        }
        None => None,
    };

    tokio::select! {
        _ = updater::check_for_updates(checker.as_deref()) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted during startup");
            return Ok(());
        }
    }

    let schedulers = scheduler::setup_schedulers(checker, config.updates.check_interval);

    let menu = Arc::new(Menu::new(config.event, config.links));
    let bot = Bot::new(&config.telegram_token);

    bot::start_bot(bot, menu).await;

    schedulers.shutdown();
    Ok(())
}
