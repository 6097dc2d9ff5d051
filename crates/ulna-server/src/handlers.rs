//! HTTP request handlers for the advisory service.
//!
//! Implements the diagnose pipeline and the thin read-only endpoints using
//! axum. Upstream failures (model, literature) never surface as request
//! failures; only input validation produces client errors.

use crate::config::ServerConfig;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;
use ulna_domain::{
    traits::LlmProvider, CaseId, CaseInput, CaseRecord, CaseReport,
};
use ulna_pubmed::PubMedClient;
use ulna_store::{CaseLog, LogKind};
use ulna_triage::{fusion, Advisor};

/// Fixed disclaimer attached to every diagnose response
pub const DISCLAIMER: &str =
    "This is an advisory tool only. Always confirm with a qualified clinician.";

/// Header carrying the optional caller identity
pub const CALLER_IDENTITY_HEADER: &str = "x-caller-identity";

/// Default number of entries returned by the case-listing endpoints
const DEFAULT_LIST_LIMIT: usize = 50;

/// Articles returned by the standalone literature search
const NIH_SEARCH_RETMAX: usize = 10;

/// Shared application state
pub struct AppState<L>
where
    L: LlmProvider,
{
    /// Derivation pipeline (model path + rule fallback)
    pub advisor: Arc<Advisor<L>>,
    /// Literature search client
    pub pubmed: Arc<PubMedClient>,
    /// Append-only JSONL case log
    pub log: Arc<CaseLog>,
    /// Process-wide configuration
    pub config: Arc<ServerConfig>,
}

impl<L: LlmProvider> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            advisor: Arc::clone(&self.advisor),
            pubmed: Arc::clone(&self.pubmed),
            log: Arc::clone(&self.log),
            config: Arc::clone(&self.config),
        }
    }
}

/// Diagnose request body
#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    /// Free-text problem description (required, non-empty)
    pub problem: String,

    /// Optional free-text context, e.g. "post-surgery"
    #[serde(default)]
    pub optional_context: Option<String>,
}

/// Diagnose response: the assembled case report plus id and disclaimer
#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    /// Case identifier, also the key into the logs
    pub case_id: CaseId,

    /// The assembled report
    #[serde(flatten)]
    pub report: CaseReport,

    /// Fixed advisory disclaimer
    pub disclaimer: &'static str,
}

/// Case-listing response
#[derive(Debug, Serialize)]
pub struct CasesResponse {
    /// Most recent entries, newest first
    pub cases: Vec<serde_json::Value>,
}

/// Standalone literature search response
#[derive(Debug, Serialize)]
pub struct NihSearchResponse {
    /// The orthopedic-scoped query that was executed
    pub query: String,
    /// Matching articles (empty on lookup failure)
    pub articles: Vec<ulna_domain::Article>,
}

/// Manufacturing locator response
#[derive(Debug, Serialize)]
pub struct ManufacturingUrlResponse {
    /// URL to open
    pub url: String,
    /// Hint for the caller
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Whether a model credential is configured
    pub model_configured: bool,
}

#[derive(Debug, Deserialize)]
struct LimitParams {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct NihSearchParams {
    q: String,
}

#[derive(Debug, Deserialize)]
struct ManufacturingParams {
    ip: Option<String>,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Invalid request input
    Validation(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ulna_store::StoreError> for AppError {
    fn from(e: ulna_store::StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// POST /diagnose - derive, look up literature, fuse, log, respond
async fn diagnose<L>(
    State(state): State<AppState<L>>,
    headers: HeaderMap,
    Json(request): Json<DiagnoseRequest>,
) -> Result<Json<DiagnoseResponse>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let problem = request.problem.trim().to_string();
    if problem.is_empty() {
        return Err(AppError::Validation(
            "Please provide a problem description.".to_string(),
        ));
    }
    let problem_chars = problem.chars().count();
    if problem_chars > state.config.max_problem_length {
        return Err(AppError::Validation(format!(
            "Problem description too long ({} chars, max {}).",
            problem_chars, state.config.max_problem_length
        )));
    }

    let context = request.optional_context.as_deref().filter(|c| !c.trim().is_empty());

    let derivation = state.advisor.derive(&problem, context).await;

    let evidence = state
        .pubmed
        .suggest(&problem, &derivation.recommended_splint.splint_name)
        .await;

    let clinical_weight = state.advisor.config().clinical_weight;
    let fused_confidence = fusion::fuse_confidence(derivation.confidence, &evidence, clinical_weight);
    let alternatives_with_scores =
        fusion::score_alternatives(&derivation.recommended_splint, &evidence);
    let aggregated_diagnosis_terms = fusion::fuse_diagnosis_terms(
        derivation.suggested_diagnosis.as_deref(),
        &evidence.diagnosis_terms,
    );
    let fused_recommendations =
        fusion::fuse_recommendations(&derivation.other_recommendations, &evidence.nih_articles);

    let report = CaseReport {
        diagnosis_summary: derivation.diagnosis_summary,
        suggested_diagnosis: derivation.suggested_diagnosis,
        recommended_splint: derivation.recommended_splint,
        other_recommendations: derivation.other_recommendations,
        confidence: derivation.confidence,
        nih_articles: evidence.nih_articles,
        additional_splints_from_nih: evidence.additional_splints,
        suggested_diagnosis_terms_from_nih: evidence.diagnosis_terms,
        fused_confidence: Some(fused_confidence),
        fused_confidence_numeric: Some(fusion::confidence_percent(fused_confidence)),
        alternatives_with_scores,
        aggregated_diagnosis_terms,
        fused_recommendations,
    };

    let case_id = CaseId::new();
    let caller = caller_identity(&headers);
    let source = caller_source(&state.config, caller.as_deref());

    let record = CaseRecord {
        case_id,
        timestamp: unix_now(),
        source: source.to_string(),
        input: CaseInput {
            problem,
            optional_context: context.map(|c| c.to_string()),
            caller,
        },
        output: report.clone(),
    };

    // Logging is best-effort: a failed append never blocks the response
    if let Err(e) = state.log.append_case(&record) {
        warn!("Failed to append case record: {}", e);
    }
    if let Err(e) = state.log.append_fine_tune(&record.input, &record.output) {
        warn!("Failed to append fine-tune record: {}", e);
    }
    if let Err(e) = state.log.append_urgent_care(&record) {
        warn!("Failed to append urgent-care record: {}", e);
    }

    Ok(Json(DiagnoseResponse {
        case_id,
        report,
        disclaimer: DISCLAIMER,
    }))
}

/// GET /cases - recent full case records
async fn list_cases<L: LlmProvider>(
    State(state): State<AppState<L>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<CasesResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let cases = state.log.recent(LogKind::Cases, limit)?;
    Ok(Json(CasesResponse { cases }))
}

/// GET /cases/urgent-care - recent urgent-care subset records
async fn list_urgent_care_cases<L: LlmProvider>(
    State(state): State<AppState<L>>,
    Query(params): Query<LimitParams>,
) -> Result<Json<CasesResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let cases = state.log.recent(LogKind::UrgentCare, limit)?;
    Ok(Json(CasesResponse { cases }))
}

/// GET /export/fine-tune - fine-tuning dataset metadata
async fn export_fine_tune<L: LlmProvider>(
    State(state): State<AppState<L>>,
) -> Result<Json<ulna_store::ExportInfo>, AppError> {
    Ok(Json(state.log.export_info(LogKind::FineTune)?))
}

/// GET /export/urgent-care - urgent-care dataset metadata
async fn export_urgent_care<L: LlmProvider>(
    State(state): State<AppState<L>>,
) -> Result<Json<ulna_store::ExportInfo>, AppError> {
    Ok(Json(state.log.export_info(LogKind::UrgentCare)?))
}

/// GET /nih-search - standalone literature lookup
async fn nih_search<L: LlmProvider>(
    State(state): State<AppState<L>>,
    Query(params): Query<NihSearchParams>,
) -> Result<Json<NihSearchResponse>, AppError> {
    let q = params.q.trim();
    if q.chars().count() < 2 {
        return Err(AppError::Validation(
            "Query must be at least 2 characters.".to_string(),
        ));
    }

    let query = ulna_pubmed::build_query(q);
    let articles = match state.pubmed.search(&query, NIH_SEARCH_RETMAX).await {
        Ok(articles) => articles,
        Err(e) => {
            warn!("Literature search degraded to empty: {}", e);
            Vec::new()
        }
    };

    Ok(Json(NihSearchResponse { query, articles }))
}

/// GET /manufacturing-url - locator URL for 3D-printing services
async fn manufacturing_url<L: LlmProvider>(
    State(state): State<AppState<L>>,
    Query(params): Query<ManufacturingParams>,
) -> Json<ManufacturingUrlResponse> {
    let base = &state.config.manufacturing_site_url;

    let (url, message) = match params.ip.as_deref().filter(|ip| !ip.trim().is_empty()) {
        Some(ip) => (
            format!("{}?ip={}", base, ip),
            "Open in new tab to locate printer / manufacturing by IP or location.".to_string(),
        ),
        None => (
            base.clone(),
            "Open in new tab to locate printer / manufacturing.".to_string(),
        ),
    };

    Json(ManufacturingUrlResponse { url, message })
}

/// GET /health - liveness and model configuration
async fn health<L>(State(state): State<AppState<L>>) -> Json<HealthResponse>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    Json(HealthResponse {
        status: "ok".to_string(),
        model_configured: state.advisor.model_configured(),
    })
}

/// Caller identity from the optional request header
fn caller_identity(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CALLER_IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .filter(|v| !v.is_empty())
}

/// Tag the record source; the bot key check is advisory, never a rejection
fn caller_source(config: &ServerConfig, caller: Option<&str>) -> &'static str {
    match (caller, config.bot_verify_key.as_deref()) {
        (Some(caller), Some(key)) if caller == key => "bot",
        _ => "api",
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Create the axum router with all routes
pub fn create_router<L>(state: AppState<L>) -> AxumRouter
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    AxumRouter::new()
        .route("/diagnose", post(diagnose::<L>))
        .route("/cases", get(list_cases::<L>))
        .route("/cases/urgent-care", get(list_urgent_care_cases::<L>))
        .route("/export/fine-tune", get(export_fine_tune::<L>))
        .route("/export/urgent-care", get(export_urgent_care::<L>))
        .route("/nih-search", get(nih_search::<L>))
        .route("/manufacturing-url", get(manufacturing_url::<L>))
        .route("/health", get(health::<L>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_source_matching_key_is_bot() {
        let config = ServerConfig {
            bot_verify_key: Some("bot-secret".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(caller_source(&config, Some("bot-secret")), "bot");
    }

    #[test]
    fn test_caller_source_mismatch_is_api() {
        let config = ServerConfig {
            bot_verify_key: Some("bot-secret".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(caller_source(&config, Some("other")), "api");
        assert_eq!(caller_source(&config, None), "api");
    }

    #[test]
    fn test_caller_source_without_key_is_api() {
        let config = ServerConfig::default();
        assert_eq!(caller_source(&config, Some("anything")), "api");
    }

    #[test]
    fn test_caller_identity_reads_header() {
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_IDENTITY_HEADER, "clinic-bot".parse().unwrap());
        assert_eq!(caller_identity(&headers).as_deref(), Some("clinic-bot"));

        let empty = HeaderMap::new();
        assert!(caller_identity(&empty).is_none());
    }
}
