mod handle;
#[cfg(test)]
mod tests;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::DateTime;
use grammers_client::{
    Client, Config as ClientConfig, InitParams, InvocationError, grammers_tl_types as tl,
    types::Chat,
};
use grammers_session::Session;
pub use handle::{ChannelHandle, HandleParseError};
use mockall::automock;
use thiserror::Error;

use crate::{config::Config, storage::ChannelStats};

const SESSION_FILE_NAME: &str = "channel_stats.session";

/// RPC error names Telegram uses for usernames that resolve to nothing.
const UNKNOWN_USERNAME_ERRORS: [&str; 2] = ["USERNAME_NOT_OCCUPIED", "USERNAME_INVALID"];

#[derive(Debug, Error)]
pub enum ChannelClientError {
    #[error("Channel {0} not found")]
    NotFound(String),
    #[error("Failed to fetch channel: {0}")]
    Fetch(String),
}

type Result<T> = std::result::Result<T, ChannelClientError>;

fn fetch_error(err: impl std::fmt::Display) -> ChannelClientError {
    ChannelClientError::Fetch(err.to_string())
}

/// Telegram omits the count when a channel hides it; recording a made-up
/// value would corrupt the history.
fn participant_count(count: Option<i32>) -> Result<i64> {
    count.map(i64::from).ok_or_else(|| fetch_error("participant count unavailable"))
}

fn is_unknown_username(rpc_error_name: &str) -> bool {
    UNKNOWN_USERNAME_ERRORS.contains(&rpc_error_name)
}

#[automock]
#[async_trait]
pub trait ChannelClient: Send + Sync {
    /// Resolve a handle and fetch the channel's full metadata.
    async fn fetch_channel(&self, handle: &ChannelHandle) -> Result<ChannelStats>;
}

/// Fetches channel metadata over MTProto, signed in as the bot.
pub struct MtprotoChannelClient {
    api_id: i32,
    api_hash: String,
    bot_token: String,
    session_path: PathBuf,
}

impl MtprotoChannelClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_id: config.telegram_api_id,
            api_hash: config.telegram_api_hash.clone(),
            bot_token: config.telegram_bot_token.clone(),
            session_path: config.session_dir.join(SESSION_FILE_NAME),
        }
    }

    /// Opens an authorized client, signing in and saving the session on
    /// first use.
    async fn connect(&self) -> Result<Client> {
        let session = Session::load_file_or_create(&self.session_path)
            .map_err(|e| fetch_error(format!("failed to load session: {e}")))?;

        let client = Client::connect(ClientConfig {
            session,
            api_id: self.api_id,
            api_hash: self.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(fetch_error)?;

        if !client.is_authorized().await.map_err(fetch_error)? {
            tracing::debug!("MTProto session is not authorized, signing in as bot");
            client.bot_sign_in(&self.bot_token).await.map_err(fetch_error)?;
            client
                .session()
                .save_to_file(&self.session_path)
                .map_err(|e| fetch_error(format!("failed to save session: {e}")))?;
        }

        Ok(client)
    }
}

#[async_trait]
impl ChannelClient for MtprotoChannelClient {
    async fn fetch_channel(&self, handle: &ChannelHandle) -> Result<ChannelStats> {
        tracing::debug!("Resolving channel {handle}");
        let client = self.connect().await?;

        let chat = match client.resolve_username(handle.username()).await {
            Ok(Some(chat)) => chat,
            Ok(None) => return Err(ChannelClientError::NotFound(handle.to_string())),
            Err(InvocationError::Rpc(rpc)) if is_unknown_username(&rpc.name) => {
                return Err(ChannelClientError::NotFound(handle.to_string()));
            }
            Err(e) => return Err(fetch_error(e)),
        };

        // Users and bots share the username namespace with channels.
        let Chat::Channel(channel) = chat else {
            tracing::debug!("{handle} resolved to a non-channel chat");
            return Err(ChannelClientError::NotFound(handle.to_string()));
        };
        let channel = channel.raw;

        let request = tl::functions::channels::GetFullChannel {
            channel: tl::enums::InputChannel::Channel(tl::types::InputChannel {
                channel_id: channel.id,
                access_hash: channel.access_hash.unwrap_or_default(),
            }),
        };
        let tl::enums::messages::ChatFull::Full(full) =
            client.invoke(&request).await.map_err(fetch_error)?;

        let tl::enums::ChatFull::ChannelFull(full_channel) = full.full_chat else {
            return Err(fetch_error(format!("{handle} returned non-channel full info")));
        };

        tracing::debug!(
            "Fetched channel {} with {:?} participants",
            channel.id,
            full_channel.participants_count
        );

        Ok(ChannelStats {
            id: channel.id,
            username: channel.username.unwrap_or_else(|| handle.username().to_string()),
            title: channel.title,
            description: full_channel.about,
            participants: participant_count(full_channel.participants_count)?,
            creation_date: DateTime::from_timestamp(i64::from(channel.date), 0)
                .unwrap_or_default(),
        })
    }
}
