//! Report module - the advisor's output shapes

use crate::confidence::ConfidenceLevel;
use serde::{Deserialize, Serialize};

/// The primary splint suggestion for a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplintRecommendation {
    /// Splint name, e.g. "Volar wrist splint (neutral position)"
    pub splint_name: String,

    /// Why this splint fits the described problem
    pub rationale: String,

    /// Alternative splint names, most relevant first
    #[serde(default)]
    pub alternatives: Vec<String>,

    /// Precautions for the caller, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precautions: Option<String>,
}

/// A literature reference from the PubMed lookup
///
/// Ephemeral: fetched per request and embedded in the response and log,
/// never cached across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// PubMed identifier
    pub pmid: String,

    /// Article title
    pub title: String,

    /// Canonical PubMed URL for the article
    pub url: String,
}

/// An alternative splint with a fused evidence score
///
/// Produced by fuzzy fusion of the clinical alternatives list with
/// literature-derived suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAlternative {
    /// Splint name
    pub splint_name: String,

    /// Which agent proposed it: "clinical" or "nih"
    pub source: String,

    /// Membership in "supported" [0, 1]; clinical alternatives score 1.0
    pub membership: f64,
}

/// A diagnosis term with its fusion weight
///
/// Combines the clinical suggested diagnosis with literature-derived terms
/// into one ranked view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTerm {
    /// Term text
    pub term: String,

    /// Which agent contributed it: "clinical" or "nih"
    pub source: String,

    /// Fusion weight in [0, 1]
    pub weight: f64,
}

/// A recommendation with a fused priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    /// Recommendation text
    pub recommendation: String,

    /// Which agent contributed it: "clinical" or "nih"
    pub source: String,

    /// Priority in [0, 1]; clinical recommendations carry 1.0
    pub priority: f64,
}

/// The assembled advisory output for one case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Short summary of the assessment (1-2 sentences)
    pub diagnosis_summary: String,

    /// Likely problem/differential from an urgent-care perspective
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_diagnosis: Option<String>,

    /// The primary splint suggestion
    pub recommended_splint: SplintRecommendation,

    /// Actions beyond splinting, e.g. X-ray, ortho referral, wound care
    #[serde(default)]
    pub other_recommendations: Vec<String>,

    /// Clinical confidence in the suggestion
    pub confidence: ConfidenceLevel,

    /// Literature references from the PubMed lookup (empty on lookup failure)
    #[serde(default)]
    pub nih_articles: Vec<Article>,

    /// Splint types surfaced from literature titles
    #[serde(default)]
    pub additional_splints_from_nih: Vec<String>,

    /// Diagnosis-like terms surfaced from literature titles
    #[serde(default)]
    pub suggested_diagnosis_terms_from_nih: Vec<String>,

    /// Confidence fused with literature evidence strength
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fused_confidence: Option<ConfidenceLevel>,

    /// Fused confidence as a 0-100 percentage for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fused_confidence_numeric: Option<u8>,

    /// Alternatives ranked by fused evidence
    #[serde(default)]
    pub alternatives_with_scores: Vec<ScoredAlternative>,

    /// Clinical diagnosis and literature terms in one weighted list
    #[serde(default)]
    pub aggregated_diagnosis_terms: Vec<WeightedTerm>,

    /// Clinical and literature recommendations ranked by priority
    #[serde(default)]
    pub fused_recommendations: Vec<ScoredRecommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CaseReport {
        CaseReport {
            diagnosis_summary: "Likely carpal tunnel syndrome.".to_string(),
            suggested_diagnosis: Some("Carpal tunnel syndrome".to_string()),
            recommended_splint: SplintRecommendation {
                splint_name: "Volar wrist splint (neutral position)".to_string(),
                rationale: "Immobilizes the wrist in neutral.".to_string(),
                alternatives: vec!["Cock-up wrist splint".to_string()],
                precautions: Some("Confirm with clinical exam.".to_string()),
            },
            other_recommendations: vec![],
            confidence: ConfidenceLevel::Medium,
            nih_articles: vec![],
            additional_splints_from_nih: vec![],
            suggested_diagnosis_terms_from_nih: vec![],
            fused_confidence: None,
            fused_confidence_numeric: None,
            alternatives_with_scores: vec![],
            aggregated_diagnosis_terms: vec![],
            fused_recommendations: vec![],
        }
    }

    #[test]
    fn test_report_json_roundtrip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: CaseReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_report_optional_fields_default() {
        // A minimal report, as the model path might produce before assembly
        let json = r#"{
            "diagnosis_summary": "Wrist sprain.",
            "recommended_splint": {
                "splint_name": "Volar wrist splint",
                "rationale": "First-line immobilization."
            },
            "confidence": "low"
        }"#;

        let report: CaseReport = serde_json::from_str(json).unwrap();
        assert!(report.suggested_diagnosis.is_none());
        assert!(report.other_recommendations.is_empty());
        assert!(report.nih_articles.is_empty());
        assert!(report.recommended_splint.alternatives.is_empty());
        assert_eq!(report.confidence, ConfidenceLevel::Low);
        assert!(report.fused_confidence_numeric.is_none());
        assert!(report.aggregated_diagnosis_terms.is_empty());
        assert!(report.fused_recommendations.is_empty());
    }
}
