//! Raw Slack Web API payloads. Envelope and message shapes only carry the
//! fields the mappers consume; everything else Slack sends is ignored.

use serde::Deserialize;

/// One raw message as returned by conversations.replies.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub bot_profile: Option<BotProfile>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BotProfile {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// conversations.replies envelope. `ok: false` carries the failure reason
/// in `error`; pagination state lives in `response_metadata`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepliesEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

impl RepliesEnvelope {
    /// Cursor for the next page. Slack signals exhaustion with either an
    /// absent metadata block or an empty cursor string.
    pub fn next_cursor(&self) -> Option<String> {
        self.response_metadata
            .as_ref()
            .and_then(|m| m.next_cursor.as_deref())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// search.messages envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Option<SearchMatches>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchMatches {
    #[serde(default)]
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchMatch {
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChannelRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
