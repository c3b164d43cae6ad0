mod commands;
pub mod utils;

use std::sync::Arc;

use teloxide::{
    types::{ChatAction, ChatId},
    utils::command::BotCommands,
};
use thiserror::Error;

use crate::{
    bot_handler::commands::{CommandContext, CommandHandler},
    chart::ChartService,
    messaging::{MessagingError, MessagingService},
    stats::{StatsService, StatsServiceError},
    telegram::{ChannelClientError, ChannelHandle},
};

const INVALID_HANDLE_HINT: &str =
    "Please specify the channel username starting with @ (for example, @durov)";

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and show usage.")]
    Start,
    #[command(description = "Show this help text.")]
    Help,
}

/// Errors reported to the user, plus failures to report them.
#[derive(Debug, Error)]
pub enum BotHandlerError {
    #[error("❌ {0}")]
    InvalidInput(String),
    #[error("❌ Channel {0} not found")]
    ChannelNotFound(String),
    #[error("⚠️ An error occurred: {0}")]
    RequestFailed(String),
    #[error("Failed to send message: {0}")]
    Messaging(#[from] MessagingError),
}

pub type BotHandlerResult<T> = Result<T, BotHandlerError>;

/// Runs channel requests through fetching, charting and replying.
pub struct BotHandler {
    messaging_service: Arc<dyn MessagingService>,
    stats_service: Arc<dyn StatsService>,
    chart_service: Arc<dyn ChartService>,
}

impl BotHandler {
    /// Creates a new `BotHandler` instance.
    pub fn new(
        messaging_service: Arc<dyn MessagingService>,
        stats_service: Arc<dyn StatsService>,
        chart_service: Arc<dyn ChartService>,
    ) -> Self {
        Self { messaging_service, stats_service, chart_service }
    }

    /// Dispatches the incoming command to the appropriate handler.
    pub async fn handle_commands(&self, chat_id: ChatId, cmd: Command) -> BotHandlerResult<()> {
        let ctx = CommandContext { handler: self, chat_id };

        cmd.handle(ctx).await
    }

    /// Handles a free text message as a channel stats request.
    pub async fn handle_channel_request(&self, chat_id: ChatId, text: &str) -> BotHandlerResult<()> {
        let handle = match text.parse::<ChannelHandle>() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!("Rejected channel request {text:?}: {e}");
                self.messaging_service
                    .send_error_msg(chat_id, BotHandlerError::InvalidInput(INVALID_HANDLE_HINT.into()))
                    .await?;
                return Ok(());
            }
        };

        self.messaging_service.send_fetching_msg(chat_id).await?;
        self.messaging_service.send_chat_action(chat_id, ChatAction::Typing).await?;

        let stats = match self.stats_service.fetch_and_record(&handle).await {
            Ok(stats) => stats,
            Err(StatsServiceError::Client(ChannelClientError::NotFound(_))) => {
                self.messaging_service
                    .send_error_msg(chat_id, BotHandlerError::ChannelNotFound(handle.to_string()))
                    .await?;
                return Ok(());
            }
            Err(e) => return self.report_failure(chat_id, &handle, e.to_string()).await,
        };

        let chart =
            match self.chart_service.render_subscribers_chart(stats.id, &stats.username).await {
                Ok(Some(chart)) => chart,
                Ok(None) => {
                    self.messaging_service.send_no_data_msg(chat_id).await?;
                    return Ok(());
                }
                Err(e) => return self.report_failure(chat_id, &handle, e.to_string()).await,
            };

        let caption = utils::format_stats_caption(&stats);
        self.messaging_service.send_chart_msg(chat_id, chart, caption).await?;

        Ok(())
    }

    async fn report_failure(
        &self,
        chat_id: ChatId,
        handle: &ChannelHandle,
        reason: String,
    ) -> BotHandlerResult<()> {
        tracing::error!("Error processing {handle}: {reason}");
        self.messaging_service
            .send_error_msg(chat_id, BotHandlerError::RequestFailed(reason))
            .await?;
        Ok(())
    }
}
