//! Slack Triage — search your Slack messages, fetch full threads, and
//! draft replies, summaries, or todo lists with a configured AI backend.
//!
//! Single-crate library: retrieval (Slack Web API), generation (OpenAI or
//! a local Ollama), and the assist engine that ties them together.

// Core types
pub mod config;
pub mod error;
pub mod message;
pub mod prompts;

// Sub-systems
pub mod assist;
pub mod slack;
pub mod tracing_init;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use error::{TriageError, TriageResult};
