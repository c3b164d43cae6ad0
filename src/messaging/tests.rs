use super::{START_TEXT, TelegramMessagingService};
use crate::bot_handler::BotHandlerError;

#[test]
fn test_format_error_text_escapes_html() {
    let error = BotHandlerError::RequestFailed("unexpected <tag> & more".to_string());

    let text = TelegramMessagingService::format_error_text(&error);

    assert_eq!(text, "⚠️ An error occurred: unexpected &lt;tag&gt; &amp; more");
}

#[test]
fn test_format_channel_not_found_text() {
    let error = BotHandlerError::ChannelNotFound("@missing".to_string());

    let text = TelegramMessagingService::format_error_text(&error);

    assert_eq!(text, "❌ Channel @missing not found");
}

#[test]
fn test_start_text_mentions_handle_format() {
    assert!(START_TEXT.contains("@username"));
    assert!(START_TEXT.contains("chart"));
}
