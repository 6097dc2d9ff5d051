//! Ulna PubMed Layer
//!
//! NCBI E-utilities search for orthopedic/splint literature. Used to suggest
//! additional splints and diagnosis terms from published evidence.
//!
//! Lookup failures are never fatal: the convenience entry point
//! [`PubMedClient::suggest`] degrades to an empty [`Evidence`] on any
//! network, API, or parse error.

#![warn(missing_docs)]

pub mod terms;

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use ulna_domain::Article;

pub use terms::{extract_diagnosis_terms, extract_splint_terms};

/// Default E-utilities endpoint
pub const DEFAULT_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default timeout for E-utilities requests (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Articles fetched per diagnose call
pub const SUGGEST_RETMAX: usize = 5;

/// Errors that can occur talking to the E-utilities API
#[derive(Error, Debug)]
pub enum PubMedError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response did not parse as expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Literature-derived suggestions for one case
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    /// Matching articles, up to [`SUGGEST_RETMAX`]
    pub nih_articles: Vec<Article>,

    /// Splint types mentioned in article titles, primary splint excluded
    pub additional_splints: Vec<String>,

    /// Diagnosis-like terms mentioned in article titles
    pub diagnosis_terms: Vec<String>,
}

/// Client for the NCBI E-utilities API
pub struct PubMedClient {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct EsearchResponse {
    esearchresult: EsearchResult,
}

#[derive(Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl PubMedClient {
    /// Create a client against the given E-utilities endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent("ulna/0.1")
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Search PubMed and return up to `retmax` articles with titles and URLs
    ///
    /// Two round trips: `esearch` for the id list, `esummary` for titles.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an unexpected response shape.
    pub async fn search(&self, query: &str, retmax: usize) -> Result<Vec<Article>, PubMedError> {
        let search_url = format!("{}/esearch.fcgi", self.endpoint);
        let retmax_str = retmax.to_string();

        let response = self
            .client
            .get(&search_url)
            .query(&[
                ("db", "pubmed"),
                ("term", query),
                ("retmax", retmax_str.as_str()),
                ("retmode", "json"),
                ("tool", "ulna"),
            ])
            .send()
            .await
            .map_err(|e| PubMedError::Communication(format!("esearch failed: {}", e)))?;

        let search: EsearchResponse = response
            .json()
            .await
            .map_err(|e| PubMedError::InvalidResponse(format!("esearch parse: {}", e)))?;

        let id_list = search.esearchresult.idlist;
        if id_list.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_summaries(&id_list).await
    }

    /// Fetch titles for a list of PMIDs via `esummary`
    async fn fetch_summaries(&self, id_list: &[String]) -> Result<Vec<Article>, PubMedError> {
        let summary_url = format!("{}/esummary.fcgi", self.endpoint);
        let ids = id_list.join(",");

        let response = self
            .client
            .get(&summary_url)
            .query(&[("db", "pubmed"), ("id", ids.as_str()), ("retmode", "json")])
            .send()
            .await
            .map_err(|e| PubMedError::Communication(format!("esummary failed: {}", e)))?;

        // The esummary result object is keyed by PMID, so parse dynamically
        let summary: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PubMedError::InvalidResponse(format!("esummary parse: {}", e)))?;

        let result = summary
            .get("result")
            .and_then(|v| v.as_object())
            .ok_or_else(|| PubMedError::InvalidResponse("missing result object".to_string()))?;

        let mut articles = Vec::new();
        for pmid in id_list {
            let title = result
                .get(pmid)
                .and_then(|doc| doc.get("title"))
                .and_then(|t| t.as_str())
                .unwrap_or("")
                .to_string();

            articles.push(Article {
                pmid: pmid.clone(),
                title,
                url: format!("https://pubmed.ncbi.nlm.nih.gov/{}/", pmid),
            });
        }

        Ok(articles)
    }

    /// Literature-derived suggestions for a problem and its primary splint
    ///
    /// Builds an orthopedic-scoped query from the problem text, searches,
    /// then scans titles for splint types and diagnosis terms. Never fails:
    /// any error degrades to an empty [`Evidence`] with a warning.
    pub async fn suggest(&self, problem: &str, primary_splint: &str) -> Evidence {
        let query = build_query(problem);
        debug!("PubMed query: {}", query);

        let articles = match self.search(&query, SUGGEST_RETMAX).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("PubMed lookup degraded to empty: {}", e);
                return Evidence::default();
            }
        };

        let additional_splints = extract_splint_terms(&articles, primary_splint);
        let diagnosis_terms = extract_diagnosis_terms(&articles);

        Evidence {
            nih_articles: articles,
            additional_splints,
            diagnosis_terms,
        }
    }
}

/// Build the orthopedic-scoped PubMed query for a problem description
///
/// The problem text is stripped of punctuation and capped at 80 characters
/// before being AND-ed with the anatomy and splint scoping terms.
pub fn build_query(problem: &str) -> String {
    let safe: String = problem
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .take(80)
        .collect();

    format!(
        "({}) AND (upper extremity OR hand OR wrist OR orthopaedic) AND (splint OR immobilization)",
        safe.trim()
    )
}
