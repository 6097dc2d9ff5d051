//! Ordered rule table for the fallback derivation path
//!
//! The table is an explicit list of (predicate, result) pairs evaluated
//! top-to-bottom; the first matching rule wins, so specific presentations
//! (nocturnal numbness, thumb-base pain) sit above the broad body-region
//! rules. No match yields a generic wrist-sprain default with low confidence.

use crate::types::{Derivation, DerivationSource};
use ulna_domain::{ConfidenceLevel, SplintRecommendation};

/// One entry in the rule table
///
/// A rule matches when every keyword in `all` appears in the lowercased
/// problem text and, if `any` is non-empty, at least one of its keywords
/// appears too.
struct Rule {
    /// Diagnosis suggested on match
    diagnosis: &'static str,
    /// Keywords that must all be present
    all: &'static [&'static str],
    /// Keywords of which at least one must be present (empty = no constraint)
    any: &'static [&'static str],
    /// Splint name for the recommendation
    splint: &'static str,
    /// Rationale text
    rationale: &'static str,
    /// Alternative splints
    alternatives: &'static [&'static str],
    /// Confidence on match
    confidence: ConfidenceLevel,
}

const PRECAUTIONS: &str = "Confirm with imaging and clinical exam as needed.";

/// The rule table, most specific first
const RULES: &[Rule] = &[
    Rule {
        diagnosis: "Carpal tunnel syndrome",
        all: &["numbness", "night"],
        any: &[],
        splint: "Volar wrist splint (neutral position)",
        rationale: "Nocturnal numbness suggests median nerve compression; a neutral wrist splint worn at night relieves carpal tunnel pressure.",
        alternatives: &["Cock-up wrist splint"],
        confidence: ConfidenceLevel::Medium,
    },
    Rule {
        diagnosis: "Carpal tunnel syndrome",
        all: &[],
        any: &["carpal tunnel"],
        splint: "Volar wrist splint (neutral position)",
        rationale: "Neutral wrist splinting is first-line for carpal tunnel syndrome, worn at night.",
        alternatives: &["Cock-up wrist splint"],
        confidence: ConfidenceLevel::High,
    },
    Rule {
        diagnosis: "De Quervain's tenosynovitis",
        all: &["thumb", "base"],
        any: &[],
        splint: "Thumb spica splint",
        rationale: "Pain at the thumb base points to the first dorsal compartment; a thumb spica immobilizes the thumb and CMC joint.",
        alternatives: &["Long opponens splint"],
        confidence: ConfidenceLevel::Medium,
    },
    Rule {
        diagnosis: "De Quervain's tenosynovitis",
        all: &[],
        any: &["de quervain", "dequervain"],
        splint: "Thumb spica splint",
        rationale: "Immobilizes the thumb and first dorsal compartment tendons.",
        alternatives: &["Long opponens splint"],
        confidence: ConfidenceLevel::High,
    },
    Rule {
        diagnosis: "Thumb ligament or CMC injury",
        all: &[],
        any: &["thumb", "cmc", "basal joint", "skier", "gamekeeper", "ulnar collateral"],
        splint: "Thumb spica splint",
        rationale: "Immobilizes thumb and CMC joint; used for ligament injuries, De Quervain's, and thumb fractures.",
        alternatives: &["Hand-based thumb spica"],
        confidence: ConfidenceLevel::Medium,
    },
    Rule {
        diagnosis: "Finger tendon or joint injury",
        all: &[],
        any: &["finger", "mallet", "boutonniere", "jersey finger", "trigger finger", "pip joint", "dip joint"],
        splint: "Finger splint (joint-specific: mallet, PIP extension, etc.)",
        rationale: "Joint-specific immobilization; mallet needs DIP extension, boutonniere needs PIP extension.",
        alternatives: &["Buddy taping for stable sprains"],
        confidence: ConfidenceLevel::Medium,
    },
    Rule {
        diagnosis: "Elbow fracture or dislocation",
        all: &[],
        any: &["elbow", "olecranon", "radial head", "supracondylar"],
        splint: "Long arm splint or sugar-tong / Muenster-type",
        rationale: "Immobilizes elbow and forearm; used for fractures and dislocations.",
        alternatives: &["Posterior long arm splint"],
        confidence: ConfidenceLevel::Medium,
    },
    Rule {
        diagnosis: "Forearm fracture",
        all: &[],
        any: &["forearm", "radius fracture", "ulna", "both bones", "galeazzi", "monteggia"],
        splint: "Sugar-tong or long arm splint",
        rationale: "Controls rotation and supports forearm fractures.",
        alternatives: &["Muenster splint"],
        confidence: ConfidenceLevel::Medium,
    },
    Rule {
        diagnosis: "Inflammatory or neuromuscular hand condition",
        all: &[],
        any: &["arthritis", "rheumatoid", "resting", "intrinsic plus", "burn", "spasticity"],
        splint: "Resting hand splint (intrinsic plus position)",
        rationale: "Maintains the safe position for arthritis, burns, or spasticity.",
        alternatives: &["Volar wrist splint for isolated wrist involvement"],
        confidence: ConfidenceLevel::Medium,
    },
    Rule {
        diagnosis: "Wrist sprain or carpal pathology",
        all: &[],
        any: &["wrist", "carpal", "distal radius", "colles"],
        splint: "Volar wrist splint (neutral position)",
        rationale: "Immobilizes wrist in neutral; used for carpal tunnel, wrist sprains, and distal radius fractures.",
        alternatives: &["Cock-up wrist splint"],
        confidence: ConfidenceLevel::Medium,
    },
];

/// Keywords that trigger an imaging recommendation
const IMAGING_TRIGGERS: &[&str] = &[
    "fracture", "fall", "fell", "deformity", "trauma", "crush", "snap", "pop",
];

/// Keywords that trigger a referral / wound-care recommendation
const REFERRAL_TRIGGERS: &[&str] = &[
    "open wound", "laceration", "bleeding", "cannot move", "can't move",
    "compartment", "severe swelling", "pale", "pulseless",
];

/// Derive a recommendation from the rule table
///
/// Deterministic: identical input text always matches the same rule, and
/// the table order is fixed.
pub fn evaluate(problem: &str) -> Derivation {
    let text = problem.to_lowercase();

    let matched = RULES.iter().find(|rule| rule_matches(rule, &text));

    let mut derivation = match matched {
        Some(rule) => Derivation {
            diagnosis_summary: format!(
                "Based on description: {}.",
                truncate(problem.trim(), 200)
            ),
            suggested_diagnosis: Some(rule.diagnosis.to_string()),
            recommended_splint: SplintRecommendation {
                splint_name: rule.splint.to_string(),
                rationale: rule.rationale.to_string(),
                alternatives: rule.alternatives.iter().map(|s| s.to_string()).collect(),
                precautions: Some(PRECAUTIONS.to_string()),
            },
            other_recommendations: Vec::new(),
            confidence: rule.confidence,
            source: DerivationSource::Rules,
        },
        None => default_derivation(problem),
    };

    derivation
        .other_recommendations
        .extend(ancillary_recommendations(&text));

    derivation
}

fn rule_matches(rule: &Rule, text: &str) -> bool {
    let all_ok = rule.all.iter().all(|k| text.contains(k));
    let any_ok = rule.any.is_empty() || rule.any.iter().any(|k| text.contains(k));
    all_ok && any_ok
}

/// Generic default when no rule matches
fn default_derivation(problem: &str) -> Derivation {
    Derivation {
        diagnosis_summary: format!(
            "Based on description: {}.",
            truncate(problem.trim(), 200)
        ),
        suggested_diagnosis: Some("Nonspecific wrist sprain".to_string()),
        recommended_splint: SplintRecommendation {
            splint_name: "Volar wrist splint (initial assessment)".to_string(),
            rationale: "General upper extremity complaint; a volar wrist splint is a common first-line option until a specific diagnosis is made.".to_string(),
            alternatives: vec![
                "Thumb spica if thumb involved".to_string(),
                "Sugar-tong if forearm/elbow involved".to_string(),
            ],
            precautions: Some(
                "Clinical and possibly radiographic evaluation recommended.".to_string(),
            ),
        },
        other_recommendations: Vec::new(),
        confidence: ConfidenceLevel::Low,
        source: DerivationSource::Rules,
    }
}

/// Recommendations beyond splinting, triggered independently of the rule match
fn ancillary_recommendations(text: &str) -> Vec<String> {
    let mut extras = Vec::new();

    if IMAGING_TRIGGERS.iter().any(|k| text.contains(k)) {
        extras.push("X-ray to rule out fracture.".to_string());
    }
    if REFERRAL_TRIGGERS.iter().any(|k| text.contains(k)) {
        extras.push("Orthopedic referral; assess for wound care and compartment compromise.".to_string());
    }

    extras
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nocturnal_numbness_is_carpal_tunnel() {
        let d = evaluate("wrist pain and numbness at night");
        assert_eq!(d.suggested_diagnosis.as_deref(), Some("Carpal tunnel syndrome"));
        assert!(d.recommended_splint.splint_name.to_lowercase().contains("wrist"));
        assert_eq!(d.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_named_carpal_tunnel_is_high_confidence() {
        let d = evaluate("diagnosed with carpal tunnel last year, flaring again");
        assert_eq!(d.suggested_diagnosis.as_deref(), Some("Carpal tunnel syndrome"));
        assert_eq!(d.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_thumb_base_is_de_quervain() {
        let d = evaluate("thumb pain at base");
        let diagnosis = d.suggested_diagnosis.unwrap();
        assert!(diagnosis.contains("De Quervain"));
        assert!(d.recommended_splint.splint_name.contains("Thumb spica"));
    }

    #[test]
    fn test_no_match_yields_low_confidence_default() {
        let d = evaluate("general soreness after gardening");
        assert_eq!(d.confidence, ConfidenceLevel::Low);
        assert!(d.recommended_splint.splint_name.contains("initial assessment"));
        assert!(!d.recommended_splint.alternatives.is_empty());
    }

    #[test]
    fn test_first_match_wins_over_region_rules() {
        // Mentions both the nocturnal pattern and the generic wrist keyword;
        // the more specific carpal tunnel rule sits first
        let d = evaluate("numbness in my wrist every night");
        assert_eq!(d.suggested_diagnosis.as_deref(), Some("Carpal tunnel syndrome"));
    }

    #[test]
    fn test_deterministic() {
        let a = evaluate("elbow pain after a fall");
        let b = evaluate("elbow pain after a fall");
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_insensitive() {
        let d = evaluate("ELBOW pain");
        assert!(d.recommended_splint.splint_name.contains("Long arm"));
    }

    #[test]
    fn test_fracture_keywords_trigger_imaging() {
        let d = evaluate("wrist pain after a fall");
        assert!(d
            .other_recommendations
            .iter()
            .any(|r| r.contains("X-ray")));
    }

    #[test]
    fn test_red_flags_trigger_referral() {
        let d = evaluate("forearm laceration with severe swelling");
        assert!(d
            .other_recommendations
            .iter()
            .any(|r| r.contains("referral")));
    }

    #[test]
    fn test_no_triggers_no_extras() {
        let d = evaluate("mild wrist ache");
        assert!(d.other_recommendations.is_empty());
    }

    #[test]
    fn test_resting_hand_rule() {
        let d = evaluate("rheumatoid arthritis flare in both hands");
        assert!(d.recommended_splint.splint_name.contains("Resting hand"));
    }

    #[test]
    fn test_summary_truncates_long_input() {
        let long = "wrist ".repeat(100);
        let d = evaluate(&long);
        assert!(d.diagnosis_summary.len() < 250);
    }

    #[test]
    fn test_every_rule_emits_enumerated_confidence() {
        for rule in RULES {
            assert!(matches!(
                rule.confidence,
                ConfidenceLevel::Low | ConfidenceLevel::Medium | ConfidenceLevel::High
            ));
            assert!(!rule.splint.is_empty());
        }
    }
}
