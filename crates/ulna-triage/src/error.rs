//! Error types for the triage pipeline

use thiserror::Error;

/// Errors that can occur on the model path
///
/// None of these reach a caller: the advisor logs them and falls back to
/// the rule path.
#[derive(Error, Debug)]
pub enum TriageError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model call exceeded the configured timeout
    #[error("Model call timed out")]
    Timeout,

    /// Model output was not the expected report shape
    #[error("Invalid report format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for TriageError {
    fn from(e: serde_json::Error) -> Self {
        TriageError::JsonParse(e.to_string())
    }
}
