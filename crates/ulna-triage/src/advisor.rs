//! Core Advisor implementation

use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::parser::parse_model_response;
use crate::prompt::PromptBuilder;
use crate::rules;
use crate::types::Derivation;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use ulna_domain::traits::LlmProvider;

/// The Advisor derives a recommendation from a problem description
///
/// With a provider configured it tries the model path first; without one,
/// or on any model failure, it uses the ordered rule table. Derivation
/// never fails.
pub struct Advisor<L>
where
    L: LlmProvider,
{
    provider: Option<Arc<L>>,
    config: TriageConfig,
}

impl<L> Advisor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Advisor; `provider` is `None` when no credential is set
    pub fn new(provider: Option<L>, config: TriageConfig) -> Self {
        Self {
            provider: provider.map(Arc::new),
            config,
        }
    }

    /// True when a model provider is configured
    pub fn model_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// The pipeline configuration
    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Derive a recommendation for a non-empty problem description
    ///
    /// Input validation (empty/whitespace, length caps) happens upstream;
    /// this method assumes a usable problem string.
    pub async fn derive(&self, problem: &str, context: Option<&str>) -> Derivation {
        if let Some(provider) = &self.provider {
            match self.try_model(provider, problem, context).await {
                Ok(derivation) => {
                    info!("Derivation from model path");
                    return derivation;
                }
                Err(e) => {
                    warn!("Model path failed, falling back to rules: {}", e);
                }
            }
        }

        debug!("Derivation from rule path");
        rules::evaluate(problem)
    }

    /// Model path: prompt, call with timeout, parse
    async fn try_model(
        &self,
        provider: &Arc<L>,
        problem: &str,
        context: Option<&str>,
    ) -> Result<Derivation, TriageError> {
        let prompt = PromptBuilder::new(problem).with_context(context).build();

        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(self.config.model_timeout(), call_provider(provider, prompt))
            .await
            .map_err(|_| TriageError::Timeout)??;

        debug!("Model response length: {} chars", response.len());

        parse_model_response(&response)
    }
}

/// Call the synchronous provider on a blocking task
async fn call_provider<L>(provider: &Arc<L>, prompt: String) -> Result<String, TriageError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let provider = Arc::clone(provider);

    tokio::task::spawn_blocking(move || {
        provider
            .generate(&prompt)
            .map_err(|e| TriageError::Llm(e.to_string()))
    })
    .await
    .map_err(|e| TriageError::Llm(format!("Task join error: {}", e)))?
}
