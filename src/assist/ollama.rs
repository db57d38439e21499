//! Ollama backend — blocking call against a local /api/chat endpoint.
//! No credential; the only precondition is a configured model name.

use crate::assist::prompt::ChatPrompt;
use crate::config::OllamaConfig;
use crate::error::{TriageError, TriageResult};
use serde::Deserialize;
use std::time::Duration;

/// HTTP timeout for Ollama requests. Local models are slow to first token,
/// so this is double the OpenAI timeout.
const OLLAMA_TIMEOUT: Duration = Duration::from_secs(30);

/// Precondition gate: a model name must be configured.
pub fn check(config: &OllamaConfig) -> TriageResult<()> {
    if config.model.trim().is_empty() {
        return Err(TriageError::Precondition(
            "ollama: model not configured".to_string(),
        ));
    }
    Ok(())
}

/// One generation attempt against the configured Ollama instance.
pub fn generate(prompt: &ChatPrompt, config: &OllamaConfig) -> TriageResult<String> {
    check(config)?;
    request(&chat_url(&config.base_url), config.model.trim(), prompt)
}

fn chat_url(base_url: &str) -> String {
    format!("{}/api/chat", base_url.trim_end_matches('/'))
}

fn request(url: &str, model: &str, prompt: &ChatPrompt) -> TriageResult<String> {
    let body = serde_json::json!({
        "model": model,
        "stream": false,
        "messages": prompt.messages(),
    });
    tracing::debug!(model = %model, url = %url, "Calling Ollama");

    let mut response = ureq::post(url)
        .header("content-type", "application/json")
        .config()
        .timeout_global(Some(OLLAMA_TIMEOUT))
        .build()
        .send(serde_json::to_vec(&body)?.as_slice())
        .map_err(|e| TriageError::Transport(format!("ollama: request failed: {}", e)))?;

    let parsed: ChatBody = response
        .body_mut()
        .read_json()
        .map_err(|e| TriageError::ResponseFormat(format!("ollama: response was malformed: {}", e)))?;

    let content = parsed.text();
    if content.is_empty() {
        return Err(TriageError::EmptyContent(
            "ollama: response was empty".to_string(),
        ));
    }
    Ok(content)
}

/// /api/chat body. Non-streaming chat puts the text under `message.content`;
/// older generate-style responses carry a top-level `response` field.
#[derive(Debug, Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: Option<ChatBodyMessage>,
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatBodyMessage {
    #[serde(default)]
    content: String,
}

impl ChatBody {
    fn text(&self) -> String {
        if let Some(message) = &self.message {
            if !message.content.trim().is_empty() {
                return message.content.trim().to_string();
            }
        }
        self.response.as_deref().unwrap_or("").trim().to_string()
    }
}
