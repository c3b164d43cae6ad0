
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::automock;
use thiserror::Error;

use crate::{
    storage::{ChannelStats, StatsStorage, StorageError},
    telegram::{ChannelClient, ChannelClientError, ChannelHandle},
};

#[derive(Debug, Error)]
pub enum StatsServiceError {
    #[error(transparent)]
    Client(#[from] ChannelClientError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

type Result<T> = std::result::Result<T, StatsServiceError>;

#[automock]
#[async_trait]
pub trait StatsService: Send + Sync {
    /// Fetch a channel's current stats and record them before returning.
    async fn fetch_and_record(&self, handle: &ChannelHandle) -> Result<ChannelStats>;
}

pub struct DefaultStatsService {
    channel_client: Arc<dyn ChannelClient>,
    storage: Arc<dyn StatsStorage>,
}

impl DefaultStatsService {
    pub fn new(channel_client: Arc<dyn ChannelClient>, storage: Arc<dyn StatsStorage>) -> Self {
        Self { channel_client, storage }
    }
}

#[async_trait]
impl StatsService for DefaultStatsService {
    async fn fetch_and_record(&self, handle: &ChannelHandle) -> Result<ChannelStats> {
        let stats = self.channel_client.fetch_channel(handle).await?;

        self.storage.upsert_channel_and_append_history(&stats, Utc::now()).await?;
        tracing::debug!("Recorded {} participants for {handle}", stats.participants);

        Ok(stats)
    }
}
