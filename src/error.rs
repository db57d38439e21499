use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    /// Missing or invalid configuration (provider selector, prompt files, config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A backend was selected but lacks a required credential or model name
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Connection, DNS, timeout, or non-success HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be parsed or lacked the expected fields
    #[error("Response format error: {0}")]
    ResponseFormat(String),

    /// Well-formed response carrying no usable content
    #[error("Empty content: {0}")]
    EmptyContent(String),

    /// A thread page request failed; the whole fetch is abandoned
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TriageError {
    /// Short message suitable for a bulleted error report, without the
    /// variant prefix that `Display` adds.
    pub fn diagnostic(&self) -> String {
        match self {
            TriageError::Config(msg)
            | TriageError::Precondition(msg)
            | TriageError::Transport(msg)
            | TriageError::ResponseFormat(msg)
            | TriageError::EmptyContent(msg)
            | TriageError::Retrieval(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type TriageResult<T> = Result<T, TriageError>;
