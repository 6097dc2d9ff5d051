//! Orthopedic term extraction from article titles

use ulna_domain::Article;

/// Splint types worth surfacing from titles
const SPLINT_TERMS: &[&str] = &[
    "volar",
    "thumb spica",
    "sugar-tong",
    "muenster",
    "mallet",
    "resting hand",
    "wrist splint",
    "finger splint",
    "long arm",
    "cock-up",
    "dorsal",
    "orthosis",
];

/// Diagnosis-like words worth surfacing from titles
const DIAGNOSIS_TERMS: &[&str] = &[
    "fracture",
    "sprain",
    "tendon",
    "ligament",
    "carpal",
    "arthritis",
    "tunnel",
    "tendinitis",
    "tenosynovitis",
];

/// Cap on surfaced splint suggestions
const MAX_SPLINTS: usize = 5;

/// Cap on surfaced diagnosis terms
const MAX_DIAGNOSIS_TERMS: usize = 6;

/// Scan article titles for splint types, excluding the primary splint
///
/// Matches are title-cased, deduplicated, and capped. Ordering follows the
/// term table so results are deterministic for a given article list.
pub fn extract_splint_terms(articles: &[Article], primary_splint: &str) -> Vec<String> {
    let primary = primary_splint.to_lowercase();
    let mut found = Vec::new();

    for term in SPLINT_TERMS {
        if primary.contains(term) {
            continue;
        }
        let mentioned = articles
            .iter()
            .any(|a| a.title.to_lowercase().contains(term));
        if mentioned {
            found.push(title_case(term));
            if found.len() == MAX_SPLINTS {
                break;
            }
        }
    }

    found
}

/// Scan article titles for diagnosis-like terms
pub fn extract_diagnosis_terms(articles: &[Article]) -> Vec<String> {
    let mut found = Vec::new();

    for term in DIAGNOSIS_TERMS {
        let mentioned = articles
            .iter()
            .any(|a| a.title.to_lowercase().contains(term));
        if mentioned {
            found.push(term.to_string());
            if found.len() == MAX_DIAGNOSIS_TERMS {
                break;
            }
        }
    }

    found
}

/// Title-case each whitespace-separated word of a term
fn title_case(term: &str) -> String {
    term.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
