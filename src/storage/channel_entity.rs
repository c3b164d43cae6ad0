use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp layout used for every date column in the database.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Channel metadata as fetched from Telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStats {
    pub id: i64,
    /// Public username, without the leading `@`.
    pub username: String,
    pub title: String,
    pub description: String,
    pub participants: i64,
    pub creation_date: DateTime<Utc>,
}

/// The latest stored snapshot of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub channel_id: i64,
    pub username: String,
    pub title: String,
    pub description: String,
    pub participants: i64,
    pub creation_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// One subscriber count observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPoint {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub participants: i64,
}

/// Formats a timestamp the way it is stored in the database.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. Stored values are always UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok().map(|dt| dt.and_utc())
}
