//! Chat prompt assembly. Both backends receive the same fixed layout:
//! a system message, then one user message holding the mode instruction,
//! a labeled context section, and a labeled message section.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The two-message prompt. Construction is the only way to build one, so
/// the message count and ordering cannot drift per backend.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    messages: [ChatMessage; 2],
}

impl ChatPrompt {
    pub fn new(system: &str, instruction: &str, context: &str, text: &str) -> Self {
        let user = format!("{instruction}\n\n[Context]\n{context}\n\n[Message]\n{text}");
        Self {
            messages: [ChatMessage::system(system), ChatMessage::user(user)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
