#![warn(missing_docs)]
//! A Telegram bot for tracking channel subscriber counts.
//!
//! Send the bot a channel `@username` and it fetches the channel's current
//! stats, records them in a local SQLite database and replies with a chart
//! of the recorded subscriber history.

/// The main handler for the bot's logic.
pub mod bot_handler;
/// Rendering of subscriber history charts.
pub mod chart;
/// The configuration for the application.
pub mod config;
/// The dispatcher for routing updates to the correct handlers.
pub mod dispatcher;
/// Number and text formatting helpers.
pub mod format;
/// The service for sending messages to the user.
pub mod messaging;
/// The service that fetches and records channel stats.
pub mod stats;
/// The storage layer for persisting data.
pub mod storage;
/// The client for reading channel metadata over MTProto.
pub mod telegram;

use std::sync::Arc;

use teloxide::prelude::*;

use crate::{
    bot_handler::BotHandler, chart::PlottersChartService, config::Config,
    messaging::TelegramMessagingService, stats::DefaultStatsService,
    storage::sqlite::SqliteStorage, telegram::MtprotoChannelClient,
};

/// Runs the bot.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tokio::fs::create_dir_all(&config.session_dir).await?;
    tracing::debug!("Session directory ready: {}", config.session_dir.display());

    let storage = Arc::new(SqliteStorage::new(&config.database_url).await?);
    let bot = Bot::new(config.telegram_bot_token.clone());

    let channel_client = Arc::new(MtprotoChannelClient::new(&config));
    let messaging_service = Arc::new(TelegramMessagingService::new(bot.clone()));
    let stats_service = Arc::new(DefaultStatsService::new(channel_client, storage.clone()));
    let chart_service = Arc::new(PlottersChartService::new(storage, config.history_limit));

    let handler = Arc::new(BotHandler::new(messaging_service, stats_service, chart_service));
    let mut dispatcher = dispatcher::BotDispatcher::new(handler).build(bot);
    tracing::info!("Dispatcher built, waiting for updates");

    dispatcher.dispatch().await;

    Ok(())
}
