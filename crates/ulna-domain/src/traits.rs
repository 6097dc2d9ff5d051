//! Trait definitions for external interactions
//!
//! These traits define the boundary between the derivation pipeline and
//! infrastructure. Implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (ulna-llm). The trait is
/// synchronous; async providers wrap their calls, and callers bridge with
/// `spawn_blocking` where needed.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion for a prompt
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}
