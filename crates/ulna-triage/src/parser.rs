//! Parse model output into a report candidate

use crate::error::TriageError;
use crate::types::{Derivation, DerivationSource};
use serde::Deserialize;
use ulna_domain::{ConfidenceLevel, SplintRecommendation};

/// Raw report shape as the model emits it
///
/// Confidence arrives as a string so lenient casing can be handled during
/// validation rather than rejected by serde.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReportCandidate {
    diagnosis_summary: String,

    #[serde(default)]
    suggested_diagnosis: Option<String>,

    recommended_splint: SplintCandidate,

    #[serde(default)]
    other_recommendations: Vec<String>,

    confidence: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SplintCandidate {
    splint_name: String,

    #[serde(default)]
    rationale: String,

    #[serde(default)]
    alternatives: Vec<String>,

    #[serde(default)]
    precautions: Option<String>,
}

/// Parse a model response into a derivation
///
/// Handles markdown-fenced and bare JSON. Any missing required field,
/// unparseable confidence, or empty splint name is an error; the caller
/// treats every error as total fallback to the rule path.
pub fn parse_model_response(response: &str) -> Result<Derivation, TriageError> {
    let json_str = extract_json(response)?;

    let candidate: ReportCandidate = serde_json::from_str(&json_str)?;
    candidate.into_derivation()
}

/// Extract JSON from a response, handling markdown code blocks
///
/// LLMs sometimes wrap JSON in fences despite instructions.
fn extract_json(response: &str) -> Result<String, TriageError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(TriageError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

impl ReportCandidate {
    fn into_derivation(self) -> Result<Derivation, TriageError> {
        if self.diagnosis_summary.trim().is_empty() {
            return Err(TriageError::InvalidFormat(
                "diagnosis_summary is empty".to_string(),
            ));
        }
        if self.recommended_splint.splint_name.trim().is_empty() {
            return Err(TriageError::InvalidFormat(
                "splint_name is empty".to_string(),
            ));
        }

        let confidence: ConfidenceLevel = self
            .confidence
            .parse()
            .map_err(TriageError::InvalidFormat)?;

        Ok(Derivation {
            diagnosis_summary: self.diagnosis_summary,
            suggested_diagnosis: self.suggested_diagnosis,
            recommended_splint: SplintRecommendation {
                splint_name: self.recommended_splint.splint_name,
                rationale: self.recommended_splint.rationale,
                alternatives: self.recommended_splint.alternatives,
                precautions: self.recommended_splint.precautions,
            },
            other_recommendations: self.other_recommendations,
            confidence,
            source: DerivationSource::Model,
        })
    }
}
