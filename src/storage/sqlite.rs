use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::storage::{
    ChannelRecord, ChannelStats, HistoryPoint, StatsStorage, StorageError, StorageResult,
    format_timestamp, parse_timestamp,
};

const CREATE_CHANNELS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS channels (
    channel_id INTEGER PRIMARY KEY,
    username TEXT UNIQUE,
    title TEXT,
    description TEXT,
    participants INTEGER,
    creation_date TEXT,
    last_updated TEXT
)
"#;

const CREATE_STATS_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stats_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    channel_id INTEGER,
    date TEXT,
    participants INTEGER,
    FOREIGN KEY (channel_id) REFERENCES channels (channel_id)
)
"#;

pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    /// Opens the database, creating the file if needed, and makes sure both
    /// tables exist.
    pub async fn new(database_url: &str) -> StorageResult<Self> {
        tracing::debug!("Connecting to SQLite database: {database_url}");
        // History rows outlive a snapshot row replaced on a username conflict.
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(false);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let storage = Self { pool };
        storage.initialize().await?;
        tracing::debug!("SQLite schema initialized");

        Ok(storage)
    }

    async fn initialize(&self) -> StorageResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(CREATE_CHANNELS_TABLE).execute(&mut *conn).await?;
        sqlx::query(CREATE_STATS_HISTORY_TABLE).execute(&mut *conn).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

fn stored_timestamp(value: String) -> StorageResult<DateTime<Utc>> {
    parse_timestamp(&value).ok_or_else(|| {
        StorageError::DataIntegrityError(value, "expected 'YYYY-MM-DD HH:MM:SS'".to_string())
    })
}

#[async_trait]
impl StatsStorage for SqliteStorage {
    async fn upsert_channel_and_append_history(
        &self,
        stats: &ChannelStats,
        observed_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        tracing::debug!("Saving stats for channel {} (@{})", stats.id, stats.username);

        let now = format_timestamp(&observed_at);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT OR REPLACE INTO channels (channel_id, username, title, description, participants, creation_date, last_updated) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(stats.id)
        .bind(&stats.username)
        .bind(&stats.title)
        .bind(&stats.description)
        .bind(stats.participants)
        .bind(format_timestamp(&stats.creation_date))
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO stats_history (channel_id, date, participants) VALUES (?, ?, ?)")
            .bind(stats.id)
            .bind(&now)
            .bind(stats.participants)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn query_history(&self, channel_id: i64, limit: u32) -> StorageResult<Vec<HistoryPoint>> {
        tracing::debug!("Getting up to {limit} history points for channel {channel_id}");

        let rows: Vec<(i64, String, i64)> = sqlx::query_as(
            "SELECT id, date, participants FROM stats_history WHERE channel_id = ? ORDER BY date DESC, id DESC LIMIT ?",
        )
        .bind(channel_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, date, participants)| {
                Ok(HistoryPoint { id, date: stored_timestamp(date)?, participants })
            })
            .collect()
    }

    async fn get_channel(&self, channel_id: i64) -> StorageResult<Option<ChannelRecord>> {
        tracing::debug!("Getting snapshot for channel {channel_id}");

        let row: Option<(i64, String, String, String, i64, String, String)> = sqlx::query_as(
            "SELECT channel_id, username, title, description, participants, creation_date, last_updated FROM channels WHERE channel_id = ?",
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(
            |(channel_id, username, title, description, participants, created, updated)| {
                Ok(ChannelRecord {
                    channel_id,
                    username,
                    title,
                    description,
                    participants,
                    creation_date: stored_timestamp(created)?,
                    last_updated: stored_timestamp(updated)?,
                })
            },
        )
        .transpose()
    }
}
