//! Prompt instruction files — one markdown file per assist mode plus the
//! shared system prompt.
//!
//! Files are read once at startup and trimmed. A file missing on disk is
//! skipped at load time (the directory may legitimately ship a subset);
//! asking for a missing key later is a configuration error, caught before
//! any backend call is made.

use crate::error::{TriageError, TriageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Keys and their on-disk file names.
const PROMPT_FILES: &[(&str, &str)] = &[
    ("system", "system.md"),
    ("reply", "reply.md"),
    ("summary", "summary.md"),
    ("todo", "todo.md"),
];

#[derive(Debug, Clone, Default)]
pub struct PromptSet {
    prompts: HashMap<String, String>,
}

impl PromptSet {
    /// Read every known prompt file under `dir`. Unreadable or absent files
    /// are skipped; their keys surface as errors only when requested.
    pub fn load(dir: &Path) -> Self {
        let mut prompts = HashMap::new();
        for (key, file_name) in PROMPT_FILES {
            let path = dir.join(file_name);
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let trimmed = content.trim();
                    if !trimmed.is_empty() {
                        prompts.insert(key.to_string(), trimmed.to_string());
                    }
                }
                Err(_) => {
                    tracing::debug!(path = %path.display(), "Prompt file absent, skipping");
                }
            }
        }
        tracing::debug!(dir = %dir.display(), loaded = prompts.len(), "Prompts loaded");
        Self { prompts }
    }

    #[cfg(test)]
    pub fn from_map(prompts: HashMap<String, String>) -> Self {
        Self { prompts }
    }

    /// Instruction text for an assist mode key ("reply", "summary", "todo").
    pub fn instruction_for(&self, key: &str) -> TriageResult<&str> {
        self.prompts
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TriageError::Config(format!("prompt file for '{}' not found", key)))
    }

    /// The shared system prompt.
    pub fn system_prompt(&self) -> TriageResult<&str> {
        self.instruction_for("system")
    }
}

/// Default prompt directory: `SLACK_TRIAGE_PROMPTS` env, then `./prompts`,
/// then a `prompts/` directory next to the executable.
pub fn default_prompt_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SLACK_TRIAGE_PROMPTS") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    let local = PathBuf::from("prompts");
    if local.exists() {
        return local;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let beside = parent.join("prompts");
            if beside.exists() {
                return beside;
            }
        }
    }
    local
}
