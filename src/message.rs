use serde::{Deserialize, Serialize};

/// Preview width for list output (characters, not bytes).
pub const PREVIEW_CHARS: usize = 120;

/// Normalized Slack message, produced by the retrieval mappers.
/// Invariants: `text` is trimmed and non-empty, `channel_id` and `user_id`
/// are present, `thread_ts` falls back to `ts` for root messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlackMessage {
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    pub ts: String,
    pub permalink: Option<String>,
    pub thread_ts: String,
}

impl SlackMessage {
    /// Single-line preview for list output, truncated on a char boundary.
    pub fn preview(&self) -> String {
        let flat = self.text.replace('\n', " ");
        truncate_chars(&flat, PREVIEW_CHARS)
    }
}

/// Format a Slack ts token ("1717000000.123456") as UTC wall-clock time.
/// Unparsable tokens are returned verbatim.
pub fn format_ts(ts: &str) -> String {
    let Ok(epoch) = ts.parse::<f64>() else {
        return ts.to_string();
    };
    match chrono::DateTime::from_timestamp(epoch.trunc() as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

/// Render a thread as one line per message: `[time] author: text`.
pub fn format_thread(messages: &[SlackMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}] {}: {}", format_ts(&m.ts), m.user_name, m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate to `max` characters, appending "..." when anything was cut.
/// Counts chars rather than bytes so multibyte text never splits mid-char.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    format!("{}...", cut)
}
