use teloxide::utils::html;

use crate::{
    format::{format_thousands, truncate_with_ellipsis},
    storage::ChannelStats,
};

/// Longest description shown in a caption, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 300;

/// Returns the HTML caption sent along with the subscribers chart.
pub fn format_stats_caption(stats: &ChannelStats) -> String {
    format!(
        "📊 <b>Channel statistics: {}</b> (@{})\n\n\
         👥 <b>Subscribers:</b> {}\n\
         📅 <b>Created:</b> {}\n\
         📝 <b>Description:</b> {}",
        html::escape(&stats.title),
        html::escape(&stats.username),
        format_thousands(stats.participants),
        stats.creation_date.format("%Y-%m-%d"),
        html::escape(&truncate_with_ellipsis(&stats.description, MAX_DESCRIPTION_CHARS)),
    )
}
