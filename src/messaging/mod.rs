#[cfg(test)]
mod tests;

use async_trait::async_trait;
use mockall::automock;
use teloxide::{
    prelude::*,
    types::{ChatAction, ChatId, InputFile, ParseMode},
    utils::{command::BotCommands, html},
};
use thiserror::Error;

use crate::bot_handler::{BotHandlerError, Command};

const CHART_FILE_NAME: &str = "subscribers_plot.png";

const START_TEXT: &str = "📊 Telegram channel analytics bot\n\n\
    Send me a channel @username (for example, @durov) and I will reply with:\n\
    • a chart of subscriber growth\n\
    • current channel statistics";

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Teloxide API request failed: {0}")]
    TeloxideRequest(#[from] teloxide::RequestError),
}

type Result<T> = std::result::Result<T, MessagingError>;

/// Trait for sending messages to the user.
#[automock]
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Sends an HTML formatted text message to the provided chat.
    async fn send_text_message(&self, chat_id: ChatId, text: String) -> Result<()>;

    /// Sends a chat action such as "typing" to the provided chat.
    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    /// Sends an error message to the provided chat.
    async fn send_error_msg(&self, chat_id: ChatId, error: BotHandlerError) -> Result<()>;

    /// Sends the usage description.
    async fn send_start_msg(&self, chat_id: ChatId) -> Result<()>;

    /// Sends the list of available commands.
    async fn send_help_msg(&self, chat_id: ChatId) -> Result<()>;

    /// Tells the user their request is being processed.
    async fn send_fetching_msg(&self, chat_id: ChatId) -> Result<()>;

    /// Tells the user there is no history to chart yet.
    async fn send_no_data_msg(&self, chat_id: ChatId) -> Result<()>;

    /// Sends the subscriber chart as a photo with an HTML caption.
    async fn send_chart_msg(&self, chat_id: ChatId, chart: Vec<u8>, caption: String)
    -> Result<()>;
}

/// Telegram messaging service.
pub struct TelegramMessagingService {
    bot: Bot,
}

impl TelegramMessagingService {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Formats an error for display, escaping it for HTML parse mode.
    pub fn format_error_text(error: &BotHandlerError) -> String {
        html::escape(&error.to_string())
    }
}

#[async_trait]
impl MessagingService for TelegramMessagingService {
    async fn send_text_message(&self, chat_id: ChatId, text: String) -> Result<()> {
        self.bot
            .send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        self.bot
            .send_chat_action(chat_id, action)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }

    async fn send_error_msg(&self, chat_id: ChatId, error: BotHandlerError) -> Result<()> {
        self.send_text_message(chat_id, Self::format_error_text(&error)).await
    }

    async fn send_start_msg(&self, chat_id: ChatId) -> Result<()> {
        self.send_text_message(chat_id, START_TEXT.to_string()).await
    }

    async fn send_help_msg(&self, chat_id: ChatId) -> Result<()> {
        self.send_text_message(chat_id, html::escape(&Command::descriptions().to_string())).await
    }

    async fn send_fetching_msg(&self, chat_id: ChatId) -> Result<()> {
        self.send_text_message(chat_id, "⏳ Fetching data...".to_string()).await
    }

    async fn send_no_data_msg(&self, chat_id: ChatId) -> Result<()> {
        self.send_text_message(chat_id, "⚠️ Not enough data to build a chart".to_string()).await
    }

    async fn send_chart_msg(
        &self,
        chat_id: ChatId,
        chart: Vec<u8>,
        caption: String,
    ) -> Result<()> {
        self.bot
            .send_photo(chat_id, InputFile::memory(chart).file_name(CHART_FILE_NAME))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }
}
