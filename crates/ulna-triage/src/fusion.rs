//! Fuzzy fusion of clinical output with literature evidence
//!
//! Two agents contribute to a case: the clinical derivation (model or rules)
//! and the literature lookup. Simple fuzzy sets combine them: membership
//! functions, weighted fusion, and defuzzification back to the confidence
//! enumeration. The fused values are additive response fields; the headline
//! clinical confidence is never altered by a literature outage.

use ulna_domain::{
    Article, ConfidenceLevel, ScoredAlternative, ScoredRecommendation, SplintRecommendation,
    WeightedTerm,
};
use ulna_pubmed::Evidence;

/// Clinical weight when aggregating diagnosis terms
const TERM_CLINICAL_WEIGHT: f64 = 0.6;

/// Priority of the literature-review pointer appended when articles came back
const NIH_PRIORITY_BONUS: f64 = 0.3;

/// Triangular membership: peak at `b`, zero outside `(a, c)`
pub fn membership_triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x <= a || x >= c {
        return 0.0;
    }
    if x <= b {
        if a == b {
            1.0
        } else {
            (x - a) / (b - a)
        }
    } else if b == c {
        1.0
    } else {
        (c - x) / (c - b)
    }
}

/// Fuzzy strength of literature evidence in [0, 1]
///
/// More articles and more extracted terms/splints increase membership in
/// "strong evidence"; article count peaks at 3.
pub fn evidence_strength(n_articles: usize, n_terms: usize, n_splints: usize) -> f64 {
    let article_mu = membership_triangular(n_articles as f64, 0.0, 3.0, 6.0);
    let term_mu = (((n_terms + n_splints) as f64) / 6.0).min(1.0);
    0.6 * article_mu + 0.4 * term_mu
}

/// Fuse clinical confidence with literature evidence strength
///
/// `clinical_weight` weights the clinical agent; the remainder goes to the
/// literature agent. The fused value is clamped and defuzzified.
pub fn fuse_confidence(
    clinical: ConfidenceLevel,
    evidence: &Evidence,
    clinical_weight: f64,
) -> ConfidenceLevel {
    let strength = evidence_strength(
        evidence.nih_articles.len(),
        evidence.diagnosis_terms.len(),
        evidence.additional_splints.len(),
    );
    let fused = clinical_weight * clinical.as_numeric() + (1.0 - clinical_weight) * strength;
    ConfidenceLevel::from_numeric(fused.clamp(0.0, 1.0))
}

/// Fused confidence as a 0-100 percentage for display
pub fn confidence_percent(level: ConfidenceLevel) -> u8 {
    (level.as_numeric() * 100.0).round() as u8
}

/// Combine the clinical diagnosis with literature terms into one weighted list
///
/// The clinical diagnosis carries the clinical weight, each literature term
/// the remainder. Blank entries are dropped; the clinical entry stays first.
pub fn fuse_diagnosis_terms(
    suggested_diagnosis: Option<&str>,
    nih_terms: &[String],
) -> Vec<WeightedTerm> {
    let mut terms = Vec::new();

    if let Some(diagnosis) = suggested_diagnosis.map(str::trim).filter(|d| !d.is_empty()) {
        terms.push(WeightedTerm {
            term: diagnosis.to_string(),
            source: "clinical".to_string(),
            weight: TERM_CLINICAL_WEIGHT,
        });
    }

    for term in nih_terms {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        terms.push(WeightedTerm {
            term: term.to_string(),
            source: "nih".to_string(),
            weight: ((1.0 - TERM_CLINICAL_WEIGHT) * 100.0).round() / 100.0,
        });
    }

    terms
}

/// Merge clinical recommendations with the literature-review pointer
///
/// Clinical entries carry priority 1.0; when any articles came back, a
/// pointer to the attached literature is appended at a lower priority.
/// Sorted by priority descending then text for a stable order.
pub fn fuse_recommendations(
    other_recommendations: &[String],
    articles: &[Article],
) -> Vec<ScoredRecommendation> {
    let mut out: Vec<ScoredRecommendation> = other_recommendations
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(|r| ScoredRecommendation {
            recommendation: r.to_string(),
            source: "clinical".to_string(),
            priority: 1.0,
        })
        .collect();

    if !articles.is_empty() {
        out.push(ScoredRecommendation {
            recommendation: "Consider literature review (PubMed results attached).".to_string(),
            source: "nih".to_string(),
            priority: NIH_PRIORITY_BONUS,
        });
    }

    out.sort_by(|a, b| {
        b.priority
            .partial_cmp(&a.priority)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.recommendation.cmp(&b.recommendation))
    });

    out
}

/// Membership of a splint in "supported by literature"
///
/// Counts article titles mentioning the splint type, normalized so a single
/// mention already gives some support.
pub fn splint_membership(splint_name: &str, articles: &[Article]) -> f64 {
    if articles.is_empty() {
        return 0.0;
    }
    let key = splint_name.to_lowercase();
    let count = articles
        .iter()
        .filter(|a| a.title.to_lowercase().contains(&key))
        .count();
    membership_triangular(count as f64, 0.0, 1.0, 4.0)
}

/// Aggregate the primary splint's alternatives with literature suggestions
///
/// Clinical alternatives come first with membership 1.0; literature
/// suggestions carry their title-mention membership. Deduplicated against
/// the primary splint and each other, sorted by membership descending then
/// name for a stable order.
pub fn score_alternatives(
    primary: &SplintRecommendation,
    evidence: &Evidence,
) -> Vec<ScoredAlternative> {
    let mut seen = vec![primary.splint_name.to_lowercase()];
    let mut scored = Vec::new();

    for alt in &primary.alternatives {
        let key = alt.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        scored.push(ScoredAlternative {
            splint_name: alt.clone(),
            source: "clinical".to_string(),
            membership: 1.0,
        });
    }

    for splint in &evidence.additional_splints {
        let key = splint.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        let mu = splint_membership(splint, &evidence.nih_articles);
        scored.push(ScoredAlternative {
            splint_name: splint.clone(),
            source: "nih".to_string(),
            membership: (mu * 100.0).round() / 100.0,
        });
    }

    scored.sort_by(|a, b| {
        b.membership
            .partial_cmp(&a.membership)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.splint_name.cmp(&b.splint_name))
    });

    scored
}
