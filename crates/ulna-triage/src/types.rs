//! Derivation output types

use ulna_domain::{ConfidenceLevel, SplintRecommendation};

/// Which path produced a derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationSource {
    /// Parsed from a successful model call
    Model,
    /// Produced by the ordered rule table
    Rules,
}

/// The clinical half of a case report, before literature lookup and fusion
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Short assessment summary
    pub diagnosis_summary: String,

    /// Likely problem/differential
    pub suggested_diagnosis: Option<String>,

    /// Primary splint suggestion
    pub recommended_splint: SplintRecommendation,

    /// Actions beyond splinting
    pub other_recommendations: Vec<String>,

    /// Clinical confidence
    pub confidence: ConfidenceLevel,

    /// Path that produced this derivation
    pub source: DerivationSource,
}
