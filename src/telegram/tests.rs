use std::path::PathBuf;

use super::*;

fn test_config() -> Config {
    Config {
        telegram_bot_token: "test telegram bot token".to_string(),
        telegram_api_id: 12345,
        telegram_api_hash: "test api hash".to_string(),
        database_url: "sqlite::memory:".to_string(),
        session_dir: PathBuf::from("test-session"),
        history_limit: 30,
    }
}

#[test]
fn test_new_channel_client() {
    let client = MtprotoChannelClient::new(&test_config());
    assert_eq!(client.api_id, 12345);
    assert_eq!(client.api_hash, "test api hash");
    assert_eq!(client.bot_token, "test telegram bot token");
    assert_eq!(client.session_path, PathBuf::from("test-session").join(SESSION_FILE_NAME));
}

#[test]
fn test_is_unknown_username() {
    assert!(is_unknown_username("USERNAME_NOT_OCCUPIED"));
    assert!(is_unknown_username("USERNAME_INVALID"));
}

#[test]
fn test_is_not_unknown_username() {
    assert!(!is_unknown_username("FLOOD_WAIT"));
    assert!(!is_unknown_username("CHANNEL_PRIVATE"));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ChannelClientError::NotFound("@missing".to_string()).to_string(),
        "Channel @missing not found"
    );
    assert_eq!(
        fetch_error("connection reset").to_string(),
        "Failed to fetch channel: connection reset"
    );
}

#[test]
fn test_participant_count_present() {
    assert_eq!(participant_count(Some(45000)).unwrap(), 45000);
    assert_eq!(participant_count(Some(0)).unwrap(), 0);
}

#[test]
fn test_participant_count_hidden() {
    let result = participant_count(None);
    assert!(matches!(
        result,
        Err(ChannelClientError::Fetch(message)) if message == "participant count unavailable"
    ));
}
