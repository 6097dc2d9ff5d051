//! Ulna Domain Layer
//!
//! Core value objects and trait seams for the splint advisor.
//!
//! ## Key Concepts
//!
//! - **Case**: one advisory interaction - input, derived report, identity
//! - **Confidence Level**: low/medium/high, with a numeric mapping for fusion
//! - **Splint Recommendation**: the primary orthopedic device suggestion
//! - **Article**: a literature reference fetched per request, never cached
//!
//! ## Architecture
//!
//! Infrastructure implementations (LLM providers, the JSONL case log, the
//! PubMed client) live in other crates; this crate defines the shapes they
//! exchange and the `LlmProvider` trait boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod case;
pub mod confidence;
pub mod report;
pub mod traits;

// Re-exports for convenience
pub use case::{CaseId, CaseInput, CaseRecord};
pub use confidence::ConfidenceLevel;
pub use report::{
    Article, CaseReport, ScoredAlternative, ScoredRecommendation, SplintRecommendation,
    WeightedTerm,
};
