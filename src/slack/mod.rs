//! Slack Web API retrieval — message search and full-thread fetching.
//!
//! Thread fetching is all-or-nothing: pages of conversations.replies are
//! walked until the cursor runs out, and any page failure abandons the
//! whole fetch. The page transport sits behind the [`ReplyPages`] trait so
//! pagination logic is testable without a network.

pub mod wire;

use crate::error::{TriageError, TriageResult};
use crate::message::SlackMessage;
use serde::de::DeserializeOwned;
use std::time::Duration;

const SLACK_API_BASE: &str = "https://slack.com/api";

/// HTTP timeout for Slack Web API requests.
const SLACK_TIMEOUT: Duration = Duration::from_secs(15);

/// conversations.replies page size.
pub const PAGE_LIMIT: u32 = 200;

// ============================================================================
// PAGE TRANSPORT
// ============================================================================

/// One page of thread replies: the raw messages plus the cursor for the
/// next page, if Slack reported one.
#[derive(Debug, Clone, Default)]
pub struct RepliesPage {
    pub messages: Vec<wire::RawMessage>,
    pub next_cursor: Option<String>,
}

/// Fetches one page of a thread. Implemented by [`SlackClient`] over HTTP
/// and by scripted stubs in tests.
pub trait ReplyPages {
    fn fetch_page(
        &self,
        channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> TriageResult<RepliesPage>;
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct SlackClient {
    token: String,
    base_url: String,
}

impl SlackClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, SLACK_API_BASE)
    }

    /// Client against a non-default API root (local stubs in tests).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn api_get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> TriageResult<T> {
        let url = format!("{}/{}", self.base_url, method);
        let mut request = ureq::get(&url)
            .header("Authorization", &format!("Bearer {}", self.token));
        for (key, value) in params {
            request = request.query(*key, *value);
        }
        let mut response = request
            .config()
            .timeout_global(Some(SLACK_TIMEOUT))
            .build()
            .call()
            .map_err(|e| {
                TriageError::Transport(format!("slack {}: request failed: {}", method, e))
            })?;
        response.body_mut().read_json::<T>().map_err(|e| {
            TriageError::ResponseFormat(format!("slack {}: invalid response: {}", method, e))
        })
    }

    /// Single-page search.messages, newest first. Requires a user token.
    pub fn search_messages(&self, query: &str, limit: u32) -> TriageResult<Vec<SlackMessage>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TriageError::Config("search query is empty".to_string()));
        }
        let count = limit.to_string();
        let envelope: wire::SearchEnvelope = self.api_get(
            "search.messages",
            &[("query", query), ("sort", "timestamp"), ("count", &count)],
        )?;
        if !envelope.ok {
            return Err(TriageError::Transport(format!(
                "slack search.messages: {}",
                envelope.error.as_deref().unwrap_or("unknown error")
            )));
        }
        let matches = envelope.messages.map(|m| m.matches).unwrap_or_default();
        let found = matches.len();
        let messages: Vec<SlackMessage> =
            matches.into_iter().filter_map(map_search_match).collect();
        tracing::debug!(query = %query, found, kept = messages.len(), "Search complete");
        Ok(messages)
    }

    /// Fetch every message of a thread, in page order. Any page failure
    /// abandons the fetch; no partial thread is ever returned.
    pub fn fetch_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        channel_name: &str,
    ) -> TriageResult<Vec<SlackMessage>> {
        collect_thread(self, channel_id, thread_ts, channel_name)
    }
}

impl ReplyPages for SlackClient {
    fn fetch_page(
        &self,
        channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> TriageResult<RepliesPage> {
        let limit = PAGE_LIMIT.to_string();
        let mut params = vec![
            ("channel", channel_id),
            ("ts", thread_ts),
            ("limit", limit.as_str()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }
        let envelope: wire::RepliesEnvelope = self
            .api_get("conversations.replies", &params)
            .map_err(|e| TriageError::Retrieval(e.diagnostic()))?;
        if !envelope.ok {
            return Err(TriageError::Retrieval(format!(
                "slack conversations.replies: {}",
                envelope.error.as_deref().unwrap_or("unknown error")
            )));
        }
        let page = RepliesPage {
            next_cursor: envelope.next_cursor(),
            messages: envelope.messages,
        };
        tracing::debug!(
            channel = %channel_id,
            raw = page.messages.len(),
            more = page.next_cursor.is_some(),
            "Fetched thread page"
        );
        Ok(page)
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Lazy walk over the pages of one thread. Each `next()` performs exactly
/// one transport call; the iterator is fused after the last page or the
/// first error and cannot be restarted.
pub struct ThreadPages<'a, T: ReplyPages + ?Sized> {
    transport: &'a T,
    channel_id: &'a str,
    thread_ts: &'a str,
    cursor: Option<String>,
    done: bool,
}

impl<'a, T: ReplyPages + ?Sized> ThreadPages<'a, T> {
    pub fn new(transport: &'a T, channel_id: &'a str, thread_ts: &'a str) -> Self {
        Self {
            transport,
            channel_id,
            thread_ts,
            cursor: None,
            done: false,
        }
    }
}

impl<T: ReplyPages + ?Sized> Iterator for ThreadPages<'_, T> {
    type Item = TriageResult<RepliesPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result =
            self.transport
                .fetch_page(self.channel_id, self.thread_ts, self.cursor.as_deref());
        match &result {
            Ok(page) => match &page.next_cursor {
                Some(cursor) => self.cursor = Some(cursor.clone()),
                None => self.done = true,
            },
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

/// Drain every page of a thread through `transport` and map the raw
/// messages into normalized records, preserving page order.
pub fn collect_thread<T: ReplyPages + ?Sized>(
    transport: &T,
    channel_id: &str,
    thread_ts: &str,
    channel_name: &str,
) -> TriageResult<Vec<SlackMessage>> {
    let mut collected = Vec::new();
    let mut pages = 0usize;
    for page in ThreadPages::new(transport, channel_id, thread_ts) {
        let page = page?;
        pages += 1;
        for raw in page.messages {
            if let Some(message) = map_thread_message(raw, channel_id, channel_name) {
                collected.push(message);
            }
        }
    }
    tracing::debug!(
        channel = %channel_id,
        ts = %thread_ts,
        pages,
        messages = collected.len(),
        "Thread fetched"
    );
    Ok(collected)
}

// ============================================================================
// MAPPING
// ============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Normalize one thread reply. Messages without text are dropped; author
/// identity falls back through bot fields before giving up.
pub fn map_thread_message(
    raw: wire::RawMessage,
    channel_id: &str,
    channel_name: &str,
) -> Option<SlackMessage> {
    let text = raw.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        return None;
    }
    let user_id = non_empty(raw.user)
        .or_else(|| non_empty(raw.bot_id))
        .unwrap_or_else(|| "unknown".to_string());
    let user_name = non_empty(raw.username)
        .or_else(|| raw.bot_profile.and_then(|b| non_empty(b.name)))
        .unwrap_or_else(|| user_id.clone());
    let ts = non_empty(raw.ts).unwrap_or_else(|| "0".to_string());
    let thread_ts = non_empty(raw.thread_ts).unwrap_or_else(|| ts.clone());
    Some(SlackMessage {
        channel_id: channel_id.to_string(),
        channel_name: channel_name.to_string(),
        user_id,
        user_name,
        text,
        ts,
        permalink: None,
        thread_ts,
    })
}

/// Normalize one search hit. Channel id, author, and text are required;
/// anything without them is noise (channel join lines, file stubs).
pub fn map_search_match(raw: wire::SearchMatch) -> Option<SlackMessage> {
    let channel = raw.channel?;
    let channel_id = non_empty(channel.id)?;
    let user_id = non_empty(raw.user)?;
    let text = raw.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        return None;
    }
    let channel_name = non_empty(channel.name).unwrap_or_else(|| channel_id.clone());
    let user_name = non_empty(raw.username).unwrap_or_else(|| user_id.clone());
    let ts = non_empty(raw.ts)
        .or_else(|| non_empty(raw.timestamp))
        .unwrap_or_else(|| "0".to_string());
    let thread_ts = non_empty(raw.thread_ts).unwrap_or_else(|| ts.clone());
    Some(SlackMessage {
        channel_id,
        channel_name,
        user_id,
        user_name,
        text,
        ts,
        permalink: non_empty(raw.permalink),
        thread_ts,
    })
}

// ============================================================================
// TESTS
// ============================================================================
