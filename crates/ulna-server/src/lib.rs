//! Ulna Server
//!
//! HTTP surface of the splint advisory service. Wires the derivation
//! pipeline, literature client, and case log into an axum application and
//! serves the advisory endpoints.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

pub use config::{ConfigError, ServerConfig};
pub use handlers::{create_router, AppState};

use axum::http::HeaderValue;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use ulna_llm::OpenAiProvider;
use ulna_pubmed::PubMedClient;
use ulna_store::CaseLog;
use ulna_triage::{Advisor, TriageConfig};

/// Server startup error
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Case log error
    #[error("Case log error: {0}")]
    Store(#[from] ulna_store::StoreError),

    /// Failed to bind or serve
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the CORS layer from the configured origins
///
/// Origins that fail to parse as header values are skipped with a warning
/// rather than aborting startup.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Skipping unparseable CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Assemble application state from configuration
pub fn build_state(config: ServerConfig) -> Result<AppState<OpenAiProvider>, ServerError> {
    let provider = config
        .openai_api_key
        .as_deref()
        .map(|key| OpenAiProvider::new(key, config.openai_model.clone()));

    if provider.is_some() {
        info!("Model derivation enabled ({})", config.openai_model);
    } else {
        info!("No model credential configured; using rule-based derivation");
    }

    let triage_config = TriageConfig {
        model_timeout_secs: config.model_timeout_secs,
        ..TriageConfig::default()
    };
    let advisor = Advisor::new(provider, triage_config);

    let log = CaseLog::new(&config.data_dir)?;

    Ok(AppState {
        advisor: Arc::new(advisor),
        pubmed: Arc::new(PubMedClient::default()),
        log: Arc::new(log),
        config: Arc::new(config),
    })
}

/// Start the HTTP server and run until shutdown
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    let bind_addr = config.bind_addr();
    let cors = cors_layer(&config.cors_origins);

    let state = build_state(config)?;
    let app = create_router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skips_bad_origins() {
        // Embedded newline cannot become a header value
        let origins = vec![
            "http://localhost:5173".to_string(),
            "bad\norigin".to_string(),
        ];
        // Construction must not panic
        let _ = cors_layer(&origins);
    }

    #[test]
    fn test_build_state_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            data_dir: dir.path().display().to_string(),
            ..ServerConfig::default()
        };

        let state = build_state(config).unwrap();
        assert!(!state.advisor.model_configured());
    }
}
