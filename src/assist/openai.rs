//! OpenAI backend — blocking call against the Responses API.

use crate::assist::prompt::ChatPrompt;
use crate::config::OpenAiConfig;
use crate::error::{TriageError, TriageResult};
use serde::Deserialize;
use std::time::Duration;

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/responses";

/// HTTP timeout for OpenAI requests.
const OPENAI_TIMEOUT: Duration = Duration::from_secs(15);

/// Precondition gate: the API key must be configured.
pub fn check(config: &OpenAiConfig) -> TriageResult<()> {
    if config.api_key.trim().is_empty() {
        return Err(TriageError::Precondition(
            "openai: api key not configured".to_string(),
        ));
    }
    Ok(())
}

/// One generation attempt. Checks the credential before any network
/// traffic; every failure path carries an "openai:"-prefixed diagnostic.
pub fn generate(prompt: &ChatPrompt, config: &OpenAiConfig) -> TriageResult<String> {
    check(config)?;
    request(OPENAI_ENDPOINT, config.api_key.trim(), &config.model, prompt)
}

fn request(url: &str, api_key: &str, model: &str, prompt: &ChatPrompt) -> TriageResult<String> {
    let body = serde_json::json!({
        "model": model,
        "input": prompt.messages(),
    });
    tracing::debug!(model = %model, "Calling OpenAI");

    let mut response = ureq::post(url)
        .header("Authorization", &format!("Bearer {}", api_key))
        .header("content-type", "application/json")
        .config()
        .timeout_global(Some(OPENAI_TIMEOUT))
        .build()
        .send(serde_json::to_vec(&body)?.as_slice())
        .map_err(|e| TriageError::Transport(format!("openai: request failed: {}", e)))?;

    let parsed: ResponsesBody = response
        .body_mut()
        .read_json()
        .map_err(|e| TriageError::ResponseFormat(format!("openai: response was malformed: {}", e)))?;

    let content = parsed.text();
    if content.is_empty() {
        return Err(TriageError::EmptyContent(
            "openai: response was empty".to_string(),
        ));
    }
    Ok(content)
}

/// Responses API body. `output_text` is the convenience field; when absent
/// the text lives in `output[].content[]` items of type "output_text".
#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ResponsesBody {
    fn text(&self) -> String {
        if let Some(text) = &self.output_text {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
        let parts: Vec<&str> = self
            .output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|c| c.kind == "output_text" && !c.text.is_empty())
            .map(|c| c.text.as_str())
            .collect();
        parts.join("\n").trim().to_string()
    }
}
