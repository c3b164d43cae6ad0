use std::{
    env::{self, VarError},
    path::PathBuf,
};

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite:telegram_stats.db";
const DEFAULT_SESSION_DIR: &str = "session";
const DEFAULT_HISTORY_LIMIT: u32 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {name} is required: {source}")]
    MissingVar {
        name: &'static str,
        #[source]
        source: VarError,
    },
    #[error("Environment variable {name} has invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

type Result<T> = std::result::Result<T, ConfigError>;

/// Represents the application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The Telegram bot token, used both by the Bot API and for MTProto
    /// sign-in.
    pub telegram_bot_token: String,
    /// The MTProto application id.
    pub telegram_api_id: i32,
    /// The MTProto application hash.
    pub telegram_api_hash: String,
    /// The URL of the database.
    pub database_url: String,
    /// The directory where the MTProto session file is kept.
    pub session_dir: PathBuf,
    /// The maximum number of history points drawn on a chart.
    pub history_limit: u32,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_id = required("TELEGRAM_API_ID")?;
        let telegram_api_id = api_id
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name: "TELEGRAM_API_ID", value: api_id })?;

        Ok(Self {
            telegram_bot_token: required("TELOXIDE_TOKEN")?,
            telegram_api_id,
            telegram_api_hash: required("TELEGRAM_API_HASH")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            session_dir: env::var("SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR)),
            history_limit: env::var("HISTORY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HISTORY_LIMIT),
        })
    }
}

fn required(name: &'static str) -> Result<String> {
    env::var(name).map_err(|source| ConfigError::MissingVar { name, source })
}
