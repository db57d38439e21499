//! Assist engine — resolves the configured backend, builds the prompt,
//! invokes exactly one generator, and always hands back a tagged result.
//! Failures of any kind are absorbed into an error report; `generate`
//! never returns an error to its caller.

pub mod ollama;
pub mod openai;
pub mod prompt;

use crate::assist::prompt::ChatPrompt;
use crate::config::{AppConfig, OllamaConfig, OpenAiConfig};
use crate::prompts::PromptSet;

// ============================================================================
// MODES
// ============================================================================

/// What kind of assistance to produce for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistMode {
    Reply,
    Summary,
    Todo,
}

impl AssistMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::Summary => "summary",
            Self::Todo => "todo",
        }
    }
}

impl std::str::FromStr for AssistMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reply" => Ok(Self::Reply),
            "summary" => Ok(Self::Summary),
            "todo" => Ok(Self::Todo),
            other => Err(format!("Unknown assist mode: {}", other)),
        }
    }
}

// ============================================================================
// BACKENDS
// ============================================================================

/// The closed set of generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    OpenAi,
    Ollama,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// Resolve a free-form selector string. Surrounding whitespace and
    /// case are forgiven; anything else is not a backend.
    pub fn resolve(selector: &str) -> Option<Self> {
        match selector.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

/// Provenance tag on every assist result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendTag {
    OpenAi,
    Ollama,
    Error,
}

impl BackendTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Error => "error",
        }
    }
}

impl From<BackendKind> for BackendTag {
    fn from(kind: BackendKind) -> Self {
        match kind {
            BackendKind::OpenAi => Self::OpenAi,
            BackendKind::Ollama => Self::Ollama,
        }
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Outcome of one generation request. `content` is never empty: either
/// the generated text or a readable error report. The failure detail is
/// present exactly when the result is error-tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistResult {
    content: String,
    backend: BackendTag,
    error_detail: Option<String>,
}

impl AssistResult {
    fn success(content: String, kind: BackendKind) -> Self {
        Self {
            content,
            backend: kind.into(),
            error_detail: None,
        }
    }

    fn failure(diagnostics: &[String]) -> Self {
        Self {
            content: error_report(diagnostics),
            backend: BackendTag::Error,
            error_detail: Some(diagnostics.join("; ")),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn backend(&self) -> BackendTag {
        self.backend
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.backend == BackendTag::Error
    }
}

/// Render failure diagnostics as a report the user can read in place of
/// the generated text: a fixed header plus one bullet per diagnostic.
fn error_report(diagnostics: &[String]) -> String {
    let mut report = String::from("assistance generation failed");
    for diagnostic in diagnostics {
        report.push_str("\n- ");
        report.push_str(diagnostic);
    }
    report
}

// ============================================================================
// ENGINE
// ============================================================================

/// Owns the backend configuration and prompt table for the lifetime of
/// the process. Built once at startup from the loaded [`AppConfig`].
pub struct AssistEngine {
    provider: String,
    openai: OpenAiConfig,
    ollama: OllamaConfig,
    prompts: PromptSet,
}

impl AssistEngine {
    pub fn new(config: &AppConfig, prompts: PromptSet) -> Self {
        Self {
            provider: config.ai.provider.clone(),
            openai: config.openai.clone(),
            ollama: config.ollama.clone(),
            prompts,
        }
    }

    /// Produce assistance for `text`. Total: every failure, from an
    /// unresolvable selector to an empty backend response, comes back as
    /// an error-tagged result instead of an error.
    pub fn generate(&self, text: &str, mode: AssistMode, context: Option<&str>) -> AssistResult {
        let mut diagnostics = Vec::new();

        let backend = match BackendKind::resolve(&self.provider) {
            Some(kind) => kind,
            None => {
                tracing::warn!(selector = %self.provider, "No valid backend configured");
                diagnostics.push("no valid backend configured".to_string());
                return AssistResult::failure(&diagnostics);
            }
        };

        // A dead credential is diagnosed before the prompt table is consulted.
        let ready = match backend {
            BackendKind::OpenAi => openai::check(&self.openai),
            BackendKind::Ollama => ollama::check(&self.ollama),
        };
        if let Err(e) = ready {
            tracing::warn!(backend = backend.as_str(), error = %e, "Backend precondition failed");
            diagnostics.push(e.diagnostic());
            return AssistResult::failure(&diagnostics);
        }

        let prompt = match self.build_prompt(text, mode, context) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(error = %e, "Prompt assembly failed");
                diagnostics.push(e.diagnostic());
                return AssistResult::failure(&diagnostics);
            }
        };

        tracing::info!(
            backend = backend.as_str(),
            mode = mode.as_str(),
            "Generating assistance"
        );
        let outcome = match backend {
            BackendKind::OpenAi => openai::generate(&prompt, &self.openai),
            BackendKind::Ollama => ollama::generate(&prompt, &self.ollama),
        };

        match outcome {
            Ok(content) => {
                tracing::info!(
                    backend = backend.as_str(),
                    chars = content.len(),
                    "Assistance generated"
                );
                AssistResult::success(content, backend)
            }
            Err(e) => {
                tracing::warn!(backend = backend.as_str(), error = %e, "Generation failed");
                diagnostics.push(e.diagnostic());
                AssistResult::failure(&diagnostics)
            }
        }
    }

    fn build_prompt(
        &self,
        text: &str,
        mode: AssistMode,
        context: Option<&str>,
    ) -> crate::error::TriageResult<ChatPrompt> {
        let system = self.prompts.system_prompt()?;
        let instruction = self.prompts.instruction_for(mode.as_str())?;
        Ok(ChatPrompt::new(
            system,
            instruction,
            context.unwrap_or(""),
            text,
        ))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;
    use std::collections::HashMap;

    fn prompt_set() -> PromptSet {
        let mut map = HashMap::new();
        map.insert("system".to_string(), "You are terse.".to_string());
        map.insert("reply".to_string(), "Draft a reply.".to_string());
        map.insert("summary".to_string(), "Summarize the thread.".to_string());
        PromptSet::from_map(map)
    }

    fn engine(provider: &str, ollama_url: &str, openai_key: &str) -> AssistEngine {
        let mut config = AppConfig::default();
        config.ai.provider = provider.to_string();
        config.openai.api_key = openai_key.to_string();
        config.ollama.base_url = ollama_url.to_string();
        config.ollama.model = "llama3".to_string();
        AssistEngine::new(&config, prompt_set())
    }

    // ── selector resolution ──

    #[test]
    fn test_resolve_known_backends() {
        assert_eq!(BackendKind::resolve("openai"), Some(BackendKind::OpenAi));
        assert_eq!(BackendKind::resolve("ollama"), Some(BackendKind::Ollama));
        assert_eq!(BackendKind::resolve("  OpenAI "), Some(BackendKind::OpenAi));
        assert_eq!(BackendKind::resolve("\tOLLAMA\n"), Some(BackendKind::Ollama));
    }

    #[test]
    fn test_resolve_rejects_everything_else() {
        for selector in ["", "  ", "auto", "gpt", "claude", "openai ollama"] {
            assert_eq!(BackendKind::resolve(selector), None, "selector {:?}", selector);
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("reply".parse::<AssistMode>().unwrap(), AssistMode::Reply);
        assert_eq!(" SUMMARY ".parse::<AssistMode>().unwrap(), AssistMode::Summary);
        assert_eq!("Todo".parse::<AssistMode>().unwrap(), AssistMode::Todo);
        assert!("fixit".parse::<AssistMode>().is_err());
    }

    // ── result shape ──

    #[test]
    fn test_error_report_layout() {
        let report = error_report(&[
            "ollama: request failed: connection refused".to_string(),
        ]);
        assert_eq!(
            report,
            "assistance generation failed\n- ollama: request failed: connection refused"
        );
    }

    #[test]
    fn test_failure_result_invariant() {
        let result = AssistResult::failure(&["boom".to_string()]);
        assert!(result.is_error());
        assert_eq!(result.backend().as_str(), "error");
        assert_eq!(result.error_detail(), Some("boom"));
        assert!(!result.content().is_empty());
    }

    #[test]
    fn test_success_result_invariant() {
        let result = AssistResult::success("text".to_string(), BackendKind::Ollama);
        assert!(!result.is_error());
        assert_eq!(result.backend().as_str(), "ollama");
        assert_eq!(result.error_detail(), None);
    }

    // ── engine dispatch ──

    #[test]
    fn test_unknown_selector_reports_without_network() {
        let server = StubServer::start(vec![(200, r#"{"message":{"content":"x"}}"#.to_string())]);
        let result = engine("claude", &server.url(), "").generate("hi", AssistMode::Reply, None);
        assert!(result.is_error());
        assert!(result.content().contains("no valid backend configured"));
        assert_eq!(server.hits(), 0);
    }

    #[test]
    fn test_openai_selected_never_touches_ollama() {
        // openai key missing: the precondition fails before any request,
        // and the ollama stub must stay cold because there is no fallback.
        let server = StubServer::start(vec![(200, r#"{"message":{"content":"x"}}"#.to_string())]);
        let result = engine("openai", &server.url(), "").generate("hi", AssistMode::Reply, None);
        assert!(result.is_error());
        assert!(result.content().contains("openai: api key not configured"));
        assert_eq!(server.hits(), 0);
    }

    #[test]
    fn test_ollama_missing_model_reports_precondition() {
        let server = StubServer::start(vec![(200, r#"{"message":{"content":"x"}}"#.to_string())]);
        let mut config = AppConfig::default();
        config.ai.provider = "ollama".to_string();
        config.ollama.base_url = server.url();
        let result =
            AssistEngine::new(&config, prompt_set()).generate("hi", AssistMode::Reply, None);
        assert!(result.is_error());
        assert!(result.content().contains("ollama: model not configured"));
        assert_eq!(server.hits(), 0);
    }

    #[test]
    fn test_missing_instruction_is_a_config_diagnostic() {
        let server = StubServer::start(vec![(200, r#"{"message":{"content":"x"}}"#.to_string())]);
        let result = engine("ollama", &server.url(), "").generate("hi", AssistMode::Todo, None);
        assert!(result.is_error());
        assert!(result.content().contains("prompt file for 'todo' not found"));
        assert_eq!(server.hits(), 0);
    }

    #[test]
    fn test_precondition_reported_before_instruction_lookup() {
        // Both the credential and the instruction are missing; the backend
        // precondition is checked first, so only its diagnostic surfaces.
        let mut config = AppConfig::default();
        config.ai.provider = "openai".to_string();
        let result = AssistEngine::new(&config, PromptSet::from_map(HashMap::new()))
            .generate("hi", AssistMode::Reply, None);
        assert!(result.is_error());
        assert!(result.content().contains("openai: api key not configured"));
        assert!(!result.content().contains("prompt file"));
    }

    #[test]
    fn test_ollama_end_to_end_summary() {
        let server = StubServer::start(vec![(
            200,
            r#"{"message":{"content":"Summary: Q1 report due Friday; needs finance sign-off."}}"#
                .to_string(),
        )]);
        let result = engine("ollama", &server.url(), "").generate(
            "The Q1 report is due Friday and finance still has to sign off.",
            AssistMode::Summary,
            Some("ayla / general"),
        );
        assert!(!result.is_error());
        assert_eq!(result.backend().as_str(), "ollama");
        assert_eq!(
            result.content(),
            "Summary: Q1 report due Friday; needs finance sign-off."
        );
        assert_eq!(result.error_detail(), None);

        let sent: serde_json::Value =
            serde_json::from_str(&server.request_bodies()[0]).unwrap();
        let user = sent["messages"][1]["content"].as_str().unwrap();
        assert!(user.starts_with("Summarize the thread."));
        assert!(user.contains("[Context]\nayla / general"));
        assert!(user.contains("[Message]\nThe Q1 report is due Friday"));
    }

    #[test]
    fn test_generate_is_idempotent_per_call() {
        let body = r#"{"message":{"content":"stable"}}"#.to_string();
        let server = StubServer::start(vec![(200, body.clone()), (200, body)]);
        let eng = engine("ollama", &server.url(), "");
        let first = eng.generate("hi", AssistMode::Reply, None);
        let second = eng.generate("hi", AssistMode::Reply, None);
        assert_eq!(first, second);
        assert_eq!(server.hits(), 2);
    }

    #[test]
    fn test_backend_failure_becomes_error_report() {
        let result =
            engine("ollama", &StubServer::dead_url(), "").generate("hi", AssistMode::Reply, None);
        assert!(result.is_error());
        assert!(result.content().starts_with("assistance generation failed\n- "));
        assert!(result.content().contains("ollama: request failed"));
    }
}
