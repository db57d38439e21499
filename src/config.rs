//! Application configuration — Slack credentials + generation backends.
//!
//! Loaded from config.json with one section per collaborator:
//!   - slack: tokens and the default search query
//!   - openai / ollama: per-backend credentials and model names
//!   - ai: the provider selector consumed by the assist engine
//!
//! Empty fields are backfilled from environment variables after load, so
//! the env surface stays here and never leaks into the core modules.

use crate::error::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// SECTIONS
// ============================================================================

/// Slack Web API access. `user_token` wins over `token` when both are set
/// (search.messages requires a user token; thread reads accept either).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub user_token: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_search_query")]
    pub search_query: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            user_token: String::new(),
            token: String::new(),
            search_query: default_search_query(),
        }
    }
}

fn default_search_query() -> String {
    "from:me".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: String::new(),
        }
    }
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

/// Backend selector. Empty means "not configured" — the assist engine
/// reports that instead of guessing a backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: String,
}

// ============================================================================
// TOP-LEVEL CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load from `path`. Missing file yields defaults (env backfill still
    /// applies); an unreadable or invalid file is an error.
    pub fn load(path: &Path) -> TriageResult<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                TriageError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            serde_json::from_str::<Self>(&content).map_err(|e| {
                TriageError::Config(format!("invalid config {}: {}", path.display(), e))
            })?
        } else {
            tracing::debug!(path = %path.display(), "Config file absent, using defaults");
            Self::default()
        };
        config.apply_env();
        tracing::debug!(
            provider = %config.ai.provider,
            has_slack_token = !config.slack_token().is_empty(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Backfill fields that are still empty from the environment.
    fn apply_env(&mut self) {
        backfill(&mut self.slack.user_token, "SLACK_USER_TOKEN");
        backfill(&mut self.slack.token, "SLACK_TOKEN");
        backfill(&mut self.slack.search_query, "SLACK_SEARCH_QUERY");
        backfill(&mut self.openai.api_key, "OPENAI_API_KEY");
        backfill(&mut self.openai.model, "OPENAI_MODEL");
        backfill(&mut self.ollama.base_url, "OLLAMA_BASE_URL");
        backfill(&mut self.ollama.model, "OLLAMA_MODEL");
        backfill(&mut self.ai.provider, "AI_PROVIDER");
    }

    /// Effective Slack token: user token first, bot token as fallback.
    pub fn slack_token(&self) -> &str {
        if self.slack.user_token.trim().is_empty() {
            &self.slack.token
        } else {
            &self.slack.user_token
        }
    }
}

fn backfill(field: &mut String, var: &str) {
    if field.trim().is_empty() {
        if let Ok(value) = std::env::var(var) {
            let value = value.trim();
            if !value.is_empty() {
                *field = value.to_string();
            }
        }
    }
}

// ============================================================================
// PATH RESOLUTION
// ============================================================================

/// Default config path: `SLACK_TRIAGE_CONFIG` env, then `./config/config.json`,
/// then the user config dir. The first existing candidate wins; if none
/// exists, the project-local path is returned so defaults apply.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("SLACK_TRIAGE_CONFIG") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    let local = PathBuf::from("config").join("config.json");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        let user = dir.join("slack-triage").join("config.json");
        if user.exists() {
            return user;
        }
    }
    local
}

// ============================================================================
// TESTS
// ============================================================================
