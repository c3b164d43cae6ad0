mod channel_entity;
pub mod sqlite;

use async_trait::async_trait;
pub use channel_entity::{
    ChannelRecord, ChannelStats, HistoryPoint, TIMESTAMP_FORMAT, format_timestamp,
    parse_timestamp,
};
use chrono::{DateTime, Utc};
use mockall::automock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
    #[error("Data integrity error: Stored value '{0}' is invalid: {1}")]
    DataIntegrityError(String, String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[automock]
#[async_trait]
pub trait StatsStorage: Send + Sync {
    /// Replace the channel snapshot and append one history point, both
    /// stamped with `observed_at`.
    async fn upsert_channel_and_append_history(
        &self,
        stats: &ChannelStats,
        observed_at: DateTime<Utc>,
    ) -> StorageResult<()>;

    /// Get up to `limit` history points for a channel, most recent first.
    async fn query_history(&self, channel_id: i64, limit: u32) -> StorageResult<Vec<HistoryPoint>>;

    /// Get the latest snapshot of a channel.
    async fn get_channel(&self, channel_id: i64) -> StorageResult<Option<ChannelRecord>>;
}
