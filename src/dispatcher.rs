use std::sync::Arc;

use teloxide::{
    dispatching::{DefaultKey, UpdateHandler},
    dptree::{self, deps},
    prelude::*,
    types::Update,
};

use crate::bot_handler::{BotHandler, BotHandlerError, Command};

/// Encapsulates the dispatcher logic for the bot.
pub struct BotDispatcher {
    handler: Arc<BotHandler>,
}

impl BotDispatcher {
    /// Creates a new `BotDispatcher`.
    pub fn new(handler: Arc<BotHandler>) -> Self {
        Self { handler }
    }

    /// Builds the dispatcher using the provided `bot` instance.
    #[must_use = "This function returns a Dispatcher that should not be ignored"]
    pub fn build(&self, bot: Bot) -> Dispatcher<Bot, BotHandlerError, DefaultKey> {
        Dispatcher::builder(bot, schema())
            .dependencies(deps![self.handler.clone()])
            .enable_ctrlc_handler()
            .build()
    }
}

/// Commands are matched first; any other text is a channel request.
fn schema() -> UpdateHandler<BotHandlerError> {
    Update::filter_message().branch(build_commands_branch()).branch(build_text_branch())
}

/// Builds the branch for handling text commands.
fn build_commands_branch() -> UpdateHandler<BotHandlerError> {
    dptree::entry().filter_command::<Command>().endpoint(
        |msg: Message, cmd: Command, handler: Arc<BotHandler>| async move {
            handler.handle_commands(msg.chat.id, cmd).await
        },
    )
}

/// Builds the branch for handling channel username messages.
fn build_text_branch() -> UpdateHandler<BotHandlerError> {
    dptree::filter_map(|msg: Message| msg.text().map(str::to_owned)).endpoint(
        |msg: Message, text: String, handler: Arc<BotHandler>| async move {
            handler.handle_channel_request(msg.chat.id, &text).await
        },
    )
}
